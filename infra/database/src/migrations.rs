use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

/// A schema script owned by one feature slice.
#[derive(Debug)]
struct Migration {
    slice: &'static str,
    version: &'static str,
    script: &'static str,
}

macro_rules! migration {
    ($slice:literal, $version:literal, $file:literal) => {
        Migration {
            slice: $slice,
            version: $version,
            script: include_str!(concat!("../migrations/", $file)),
        }
    };
}

/// Applied in this order; slices referencing other tables come later.
const MIGRATIONS: &[Migration] = &[
    migration!("identity", "0001", "0001_identity.surql"),
    migration!("settings", "0001", "0002_settings.surql"),
    migration!("period", "0001", "0003_period.surql"),
    migration!("topic", "0001", "0004_topic.surql"),
    migration!("group", "0001", "0005_group.surql"),
    migration!("council", "0001", "0006_council.surql"),
    migration!("meeting", "0001", "0007_meeting.surql"),
    migration!("decision", "0001", "0008_decision.surql"),
];

impl Migration {
    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    fn to_applied(&self) -> AppliedMigration {
        AppliedMigration {
            slice: self.slice.to_owned(),
            version: self.version.to_owned(),
            checksum: self.checksum(),
        }
    }
}

/// Outcome of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedMigration {
    pub slice: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        let mut report = MigrationReport::default();
        let applied = self.applied_migrations().await?;

        for migration in MIGRATIONS {
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &existing.checksum)?;
                report.skipped.push(migration.to_applied());
                continue;
            }

            self.apply(migration).await?;
            report.applied.push(migration.to_applied());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum, applied_at: time::now() }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .and_then(surrealdb::Response::check)
            .context(format!("SQL execution failed at {}", migration.key()))?;

        Ok(())
    }

    async fn applied_migrations(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;")
            .query("SELECT slice, version, checksum FROM migration;")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(1)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let expected = migration.checksum();
    if existing != expected {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {existing}, embedded {expected})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}
