use crate::model::SettingRecord;
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};

const LIST: &str = "SELECT * OMIT id FROM system_config ORDER BY key ASC";
const FIND: &str = "SELECT * OMIT id FROM system_config WHERE key = $key";
const UPSERT: &str = "UPSERT type::thing('system_config', $key) CONTENT $record";
const DELETE: &str = "DELETE system_config WHERE key = $key RETURN BEFORE";

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: Database,
}

impl SettingsRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<SettingRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .await
            .context("Listing system configuration")?
            .take(0)
            .context("Decoding system configuration")
    }

    pub async fn find(&self, key: &str) -> Result<Option<SettingRecord>, DatabaseError> {
        let rows: Vec<SettingRecord> = self
            .db
            .query(FIND)
            .bind(("key", key.to_owned()))
            .await
            .context("Loading system configuration")?
            .take(0)
            .context("Decoding system configuration")?;
        Ok(rows.into_iter().next())
    }

    pub async fn upsert(&self, record: &SettingRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPSERT)
            .bind(("key", record.key.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Saving system configuration")?;
        Ok(())
    }

    /// Returns `true` when a row was removed.
    pub async fn delete(&self, key: &str) -> Result<bool, DatabaseError> {
        let removed: Vec<SettingRecord> = self
            .db
            .query(DELETE)
            .bind(("key", key.to_owned()))
            .await
            .context("Deleting system configuration")?
            .take(0)
            .context("Decoding deleted configuration")?;
        Ok(!removed.is_empty())
    }
}
