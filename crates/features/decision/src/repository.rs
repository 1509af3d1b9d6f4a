use crate::model::DecisionRecord;
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};
use thesis_kernel::prelude::DecisionKind;

const INSERT: &str = "CREATE decision CONTENT $record";
const FIND: &str = "SELECT * OMIT id FROM decision WHERE uid = $uid AND is_deleted = false";
const LIST: &str = "SELECT * OMIT id FROM decision
    WHERE is_deleted = false
        AND ($semester = NONE OR semester = $semester)
        AND ($kind = NONE OR kind = $kind)
    ORDER BY signed_date DESC, number ASC";
const NUMBER_TAKEN: &str = "SELECT count() AS total FROM decision
    WHERE number_key = $key AND uid != $exclude AND is_deleted = false GROUP ALL";
const UPDATE: &str = "UPDATE decision CONTENT $record WHERE uid = $uid AND is_deleted = false";
const SOFT_DELETE: &str = "UPDATE decision SET is_deleted = true, deleted_at = $now
    WHERE uid = $uid AND is_deleted = false";

#[derive(Debug, Clone)]
pub struct DecisionRepository {
    db: Database,
}

impl DecisionRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, record: &DecisionRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT)
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Creating decision")?;
        Ok(())
    }

    pub async fn find(&self, uid: &str) -> Result<Option<DecisionRecord>, DatabaseError> {
        let rows: Vec<DecisionRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading decision")?
            .take(0)
            .context("Decoding decision")?;
        Ok(rows.into_iter().next())
    }

    pub async fn list(
        &self,
        semester: Option<String>,
        kind: Option<DecisionKind>,
    ) -> Result<Vec<DecisionRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("semester", semester))
            .bind(("kind", kind))
            .await
            .context("Listing decisions")?
            .take(0)
            .context("Decoding decisions")
    }

    pub async fn number_taken(&self, key: &str, exclude: Option<&str>) -> Result<bool, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(NUMBER_TAKEN)
            .bind(("key", key.to_owned()))
            .bind(("exclude", exclude.unwrap_or_default().to_owned()))
            .await
            .context("Checking decision number")?
            .take((0, "total"))
            .context("Decoding decision count")?;
        Ok(total.unwrap_or(0) > 0)
    }

    pub async fn update(&self, record: &DecisionRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPDATE)
            .bind(("uid", record.uid.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Updating decision")?;
        Ok(())
    }

    pub async fn soft_delete(&self, uid: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(SOFT_DELETE)
            .bind(("uid", uid.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Deleting decision")?;
        Ok(())
    }
}
