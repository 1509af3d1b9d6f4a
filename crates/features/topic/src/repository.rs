use crate::model::TopicRecord;
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};
use thesis_kernel::prelude::TopicStatus;

const INSERT: &str = "CREATE topic CONTENT $record";
const FIND: &str = "SELECT * OMIT id FROM topic WHERE uid = $uid AND is_deleted = false";
const LIST: &str = "SELECT * OMIT id FROM topic
    WHERE is_deleted = false
        AND ($semester = NONE OR semester = $semester)
        AND ($period = NONE OR period_id = $period)
        AND ($status = NONE OR status = $status)
        AND ($mentor = NONE OR main_mentor_id = $mentor OR sub_mentor_id = $mentor)
    ORDER BY code ASC";
const SEQUENCE: &str = "SELECT count() AS total FROM topic WHERE semester = $semester GROUP ALL";
const MENTOR_LOAD: &str = "SELECT count() AS total FROM topic
    WHERE is_deleted = false AND semester = $semester AND main_mentor_id = $mentor
        AND status != 'REJECTED' AND uid != $exclude
    GROUP ALL";
const TITLE_TAKEN: &str = "SELECT count() AS total FROM topic
    WHERE is_deleted = false AND semester = $semester AND title_key = $key AND uid != $exclude
    GROUP ALL";
const UPDATE: &str = "UPDATE topic CONTENT $record WHERE uid = $uid AND is_deleted = false";
const SOFT_DELETE: &str =
    "UPDATE topic SET is_deleted = true, deleted_at = $now WHERE uid = $uid AND is_deleted = false";

/// Optional list predicates; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct TopicQuery {
    pub semester: Option<String>,
    pub period_id: Option<String>,
    pub status: Option<TopicStatus>,
    pub mentor_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TopicRepository {
    db: Database,
}

impl TopicRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, record: &TopicRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT)
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Creating topic")?;
        Ok(())
    }

    pub async fn find(&self, uid: &str) -> Result<Option<TopicRecord>, DatabaseError> {
        let rows: Vec<TopicRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading topic")?
            .take(0)
            .context("Decoding topic")?;
        Ok(rows.into_iter().next())
    }

    pub async fn list(&self, query: TopicQuery) -> Result<Vec<TopicRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("semester", query.semester))
            .bind(("period", query.period_id))
            .bind(("status", query.status))
            .bind(("mentor", query.mentor_id))
            .await
            .context("Listing topics")?
            .take(0)
            .context("Decoding topics")
    }

    /// Next code number of `semester`; deleted topics keep their numbers.
    pub async fn next_sequence(&self, semester: &str) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(SEQUENCE)
            .bind(("semester", semester.to_owned()))
            .await
            .context("Counting topics of semester")?
            .take((0, "total"))
            .context("Decoding topic count")?;
        Ok(total.unwrap_or(0) + 1)
    }

    /// Live, non-rejected topics `mentor` leads in `semester`, except `exclude`.
    pub async fn mentor_load(
        &self,
        semester: &str,
        mentor: &str,
        exclude: &str,
    ) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(MENTOR_LOAD)
            .bind(("semester", semester.to_owned()))
            .bind(("mentor", mentor.to_owned()))
            .bind(("exclude", exclude.to_owned()))
            .await
            .context("Counting mentor topics")?
            .take((0, "total"))
            .context("Decoding topic count")?;
        Ok(total.unwrap_or(0))
    }

    pub async fn title_taken(
        &self,
        semester: &str,
        key: &str,
        exclude: &str,
    ) -> Result<bool, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(TITLE_TAKEN)
            .bind(("semester", semester.to_owned()))
            .bind(("key", key.to_owned()))
            .bind(("exclude", exclude.to_owned()))
            .await
            .context("Checking topic title")?
            .take((0, "total"))
            .context("Decoding topic count")?;
        Ok(total.unwrap_or(0) > 0)
    }

    pub async fn update(&self, record: &TopicRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPDATE)
            .bind(("uid", record.uid.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Updating topic")?;
        Ok(())
    }

    pub async fn soft_delete(&self, uid: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(SOFT_DELETE)
            .bind(("uid", uid.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Deleting topic")?;
        Ok(())
    }
}
