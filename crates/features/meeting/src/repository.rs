use crate::model::MeetingRecord;
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};

const INSERT: &str = "CREATE meeting_schedule CONTENT $record";
const FIND: &str = "SELECT * OMIT id FROM meeting_schedule WHERE uid = $uid AND is_deleted = false";
const LIST: &str = "SELECT * OMIT id FROM meeting_schedule
    WHERE is_deleted = false
        AND ($group = NONE OR group_id = $group)
        AND ($mentor = NONE OR mentor_id = $mentor)
        AND ($groups = NONE OR group_id INSIDE $groups)
    ORDER BY start_time ASC";
// Timestamps share one canonical format, so text comparison orders them.
const OVERLAPPING: &str = "SELECT * OMIT id FROM meeting_schedule
    WHERE is_deleted = false
        AND uid != $exclude
        AND (group_id = $group OR mentor_id = $mentor)
        AND start_time < $end AND end_time > $start";
const UPDATE: &str = "UPDATE meeting_schedule CONTENT $record WHERE uid = $uid AND is_deleted = false";
const SOFT_DELETE: &str = "UPDATE meeting_schedule SET is_deleted = true, deleted_at = $now
    WHERE uid = $uid AND is_deleted = false";

/// Narrowing applied by [`MeetingRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct MeetingQuery {
    pub group: Option<String>,
    pub mentor: Option<String>,
    /// Restricts the result to these groups (a student's own groups).
    pub groups: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct MeetingRepository {
    db: Database,
}

impl MeetingRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, record: &MeetingRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT)
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Creating meeting")?;
        Ok(())
    }

    pub async fn find(&self, uid: &str) -> Result<Option<MeetingRecord>, DatabaseError> {
        let rows: Vec<MeetingRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading meeting")?
            .take(0)
            .context("Decoding meeting")?;
        Ok(rows.into_iter().next())
    }

    pub async fn list(&self, query: MeetingQuery) -> Result<Vec<MeetingRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("group", query.group))
            .bind(("mentor", query.mentor))
            .bind(("groups", query.groups))
            .await
            .context("Listing meetings")?
            .take(0)
            .context("Decoding meetings")
    }

    /// Live meetings of `group` or `mentor` intersecting `[start, end)`.
    pub async fn overlapping(
        &self,
        group: &str,
        mentor: &str,
        start: String,
        end: String,
        exclude: Option<&str>,
    ) -> Result<Vec<MeetingRecord>, DatabaseError> {
        self.db
            .query(OVERLAPPING)
            .bind(("group", group.to_owned()))
            .bind(("mentor", mentor.to_owned()))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("exclude", exclude.unwrap_or_default().to_owned()))
            .await
            .context("Checking meeting overlaps")?
            .take(0)
            .context("Decoding meetings")
    }

    pub async fn update(&self, record: &MeetingRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPDATE)
            .bind(("uid", record.uid.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Updating meeting")?;
        Ok(())
    }

    pub async fn soft_delete(&self, uid: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(SOFT_DELETE)
            .bind(("uid", uid.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Deleting meeting")?;
        Ok(())
    }
}
