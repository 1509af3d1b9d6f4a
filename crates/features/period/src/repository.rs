use crate::model::PeriodRecord;
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};

const INSERT: &str = "CREATE submission_period CONTENT $record";
const FIND: &str =
    "SELECT * OMIT id FROM submission_period WHERE uid = $uid AND is_deleted = false";
const LIST: &str = "SELECT * OMIT id FROM submission_period
    WHERE is_deleted = false AND ($semester = NONE OR semester = $semester)
    ORDER BY semester DESC, round_number ASC";
const ACTIVE_AT: &str = "SELECT * OMIT id FROM submission_period
    WHERE is_deleted = false AND start_date <= $now AND end_date >= $now
    ORDER BY start_date ASC";
const SIBLINGS: &str = "SELECT * OMIT id FROM submission_period
    WHERE is_deleted = false AND semester = $semester AND uid != $exclude";
const UPDATE: &str =
    "UPDATE submission_period CONTENT $record WHERE uid = $uid AND is_deleted = false";
const SOFT_DELETE: &str = "UPDATE submission_period SET is_deleted = true, deleted_at = $now
    WHERE uid = $uid AND is_deleted = false";
const COUNT_TOPICS: &str = "SELECT count() AS total FROM topic
    WHERE period_id = $uid AND is_deleted = false GROUP ALL";

#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: Database,
}

impl PeriodRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, record: &PeriodRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT)
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Creating submission period")?;
        Ok(())
    }

    pub async fn find(&self, uid: &str) -> Result<Option<PeriodRecord>, DatabaseError> {
        let rows: Vec<PeriodRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading submission period")?
            .take(0)
            .context("Decoding submission period")?;
        Ok(rows.into_iter().next())
    }

    pub async fn list(&self, semester: Option<String>) -> Result<Vec<PeriodRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("semester", semester))
            .await
            .context("Listing submission periods")?
            .take(0)
            .context("Decoding submission periods")
    }

    pub async fn active_at(&self, now: String) -> Result<Vec<PeriodRecord>, DatabaseError> {
        self.db
            .query(ACTIVE_AT)
            .bind(("now", now))
            .await
            .context("Listing active submission periods")?
            .take(0)
            .context("Decoding submission periods")
    }

    /// Active periods of `semester` other than `exclude`.
    pub async fn siblings(
        &self,
        semester: &str,
        exclude: &str,
    ) -> Result<Vec<PeriodRecord>, DatabaseError> {
        self.db
            .query(SIBLINGS)
            .bind(("semester", semester.to_owned()))
            .bind(("exclude", exclude.to_owned()))
            .await
            .context("Loading sibling periods")?
            .take(0)
            .context("Decoding submission periods")
    }

    pub async fn update(&self, record: &PeriodRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPDATE)
            .bind(("uid", record.uid.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Updating submission period")?;
        Ok(())
    }

    pub async fn soft_delete(&self, uid: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(SOFT_DELETE)
            .bind(("uid", uid.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Deleting submission period")?;
        Ok(())
    }

    pub async fn count_topics(&self, uid: &str) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(COUNT_TOPICS)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Counting topics of period")?
            .take((0, "total"))
            .context("Decoding topic count")?;
        Ok(total.unwrap_or(0))
    }
}
