use crate::model::{AssignmentRecord, CouncilMemberRecord, CouncilRecord};
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};
use thesis_kernel::prelude::CouncilKind;

const INSERT: &str = "CREATE council CONTENT $record";
const FIND: &str = "SELECT * OMIT id FROM council WHERE uid = $uid AND is_deleted = false";
const LIST: &str = "SELECT * OMIT id FROM council
    WHERE is_deleted = false
        AND ($semester = NONE OR semester = $semester)
        AND ($kind = NONE OR kind = $kind)
        AND ($period = NONE OR period_id = $period)
        AND ($lecturer = NONE OR uid INSIDE (
            SELECT VALUE council_id FROM council_member WHERE lecturer_id = $lecturer AND is_deleted = false))
    ORDER BY start_time ASC, code ASC";
const SEQUENCE: &str = "SELECT count() AS total FROM council WHERE semester = $semester GROUP ALL";
const UPDATE: &str = "UPDATE council CONTENT $record WHERE uid = $uid AND is_deleted = false";
const MEMBERS: &str = "SELECT * OMIT id FROM council_member
    WHERE council_id INSIDE $councils AND is_deleted = false ORDER BY added_at ASC";
const ASSIGNMENTS: &str = "SELECT * OMIT id FROM council_assignment
    WHERE council_id INSIDE $councils AND is_deleted = false ORDER BY defense_at ASC";
const LECTURER_LOAD: &str = "SELECT count() AS total FROM council_member
    WHERE lecturer_id = $lecturer AND semester = $semester AND is_deleted = false GROUP ALL";
const GROUP_COUNCIL: &str = "SELECT VALUE council_id FROM council_assignment
    WHERE group_id = $group AND kind = $kind AND is_deleted = false LIMIT 1";
const INSERT_MEMBER: &str = "CREATE council_member CONTENT $member";
const INSERT_ASSIGNMENT: &str = "CREATE council_assignment CONTENT $assignment";
const SOFT_DELETE_MEMBER: &str = "UPDATE council_member SET is_deleted = true, deleted_at = $now
    WHERE uid = $uid AND is_deleted = false";
const SOFT_DELETE_ASSIGNMENT: &str = "UPDATE council_assignment SET is_deleted = true, deleted_at = $now
    WHERE uid = $uid AND is_deleted = false";
const DELETE_COUNCIL: &str = "BEGIN TRANSACTION;
    UPDATE council_member SET is_deleted = true, deleted_at = $now
        WHERE council_id = $council AND is_deleted = false;
    UPDATE council_assignment SET is_deleted = true, deleted_at = $now
        WHERE council_id = $council AND is_deleted = false;
    UPDATE council SET is_deleted = true, deleted_at = $now
        WHERE uid = $council AND is_deleted = false;
    COMMIT TRANSACTION;";

#[derive(Debug, Clone)]
pub struct CouncilRepository {
    db: Database,
}

impl CouncilRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn insert(&self, record: &CouncilRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT)
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Creating council")?;
        Ok(())
    }

    pub async fn find(&self, uid: &str) -> Result<Option<CouncilRecord>, DatabaseError> {
        let rows: Vec<CouncilRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading council")?
            .take(0)
            .context("Decoding council")?;
        Ok(rows.into_iter().next())
    }

    pub async fn list(
        &self,
        semester: Option<String>,
        kind: Option<CouncilKind>,
        period: Option<String>,
        lecturer: Option<String>,
    ) -> Result<Vec<CouncilRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("semester", semester))
            .bind(("kind", kind))
            .bind(("period", period))
            .bind(("lecturer", lecturer))
            .await
            .context("Listing councils")?
            .take(0)
            .context("Decoding councils")
    }

    pub async fn next_sequence(&self, semester: &str) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(SEQUENCE)
            .bind(("semester", semester.to_owned()))
            .await
            .context("Counting councils of semester")?
            .take((0, "total"))
            .context("Decoding council count")?;
        Ok(total.unwrap_or(0) + 1)
    }

    pub async fn update(&self, record: &CouncilRecord) -> Result<(), DatabaseError> {
        self.db
            .query(UPDATE)
            .bind(("uid", record.uid.clone()))
            .bind(("record", record.clone()))
            .await
            .and_then(Response::check)
            .context("Updating council")?;
        Ok(())
    }

    pub async fn members(
        &self,
        councils: Vec<String>,
    ) -> Result<Vec<CouncilMemberRecord>, DatabaseError> {
        self.db
            .query(MEMBERS)
            .bind(("councils", councils))
            .await
            .context("Loading council members")?
            .take(0)
            .context("Decoding council members")
    }

    pub async fn assignments(
        &self,
        councils: Vec<String>,
    ) -> Result<Vec<AssignmentRecord>, DatabaseError> {
        self.db
            .query(ASSIGNMENTS)
            .bind(("councils", councils))
            .await
            .context("Loading council assignments")?
            .take(0)
            .context("Decoding council assignments")
    }

    /// Councils `lecturer` sits on in `semester`.
    pub async fn lecturer_load(&self, lecturer: &str, semester: &str) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(LECTURER_LOAD)
            .bind(("lecturer", lecturer.to_owned()))
            .bind(("semester", semester.to_owned()))
            .await
            .context("Counting lecturer councils")?
            .take((0, "total"))
            .context("Decoding council count")?;
        Ok(total.unwrap_or(0))
    }

    /// The live council of `kind` that `group` is assigned to.
    pub async fn council_of_group(
        &self,
        group: &str,
        kind: CouncilKind,
    ) -> Result<Option<String>, DatabaseError> {
        let rows: Vec<String> = self
            .db
            .query(GROUP_COUNCIL)
            .bind(("group", group.to_owned()))
            .bind(("kind", kind))
            .await
            .context("Looking up group council")?
            .take(0)
            .context("Decoding group council")?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_member(&self, member: &CouncilMemberRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT_MEMBER)
            .bind(("member", member.clone()))
            .await
            .and_then(Response::check)
            .context("Adding council member")?;
        Ok(())
    }

    pub async fn remove_member(&self, uid: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(SOFT_DELETE_MEMBER)
            .bind(("uid", uid.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Removing council member")?;
        Ok(())
    }

    pub async fn insert_assignment(&self, assignment: &AssignmentRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT_ASSIGNMENT)
            .bind(("assignment", assignment.clone()))
            .await
            .and_then(Response::check)
            .context("Assigning group to council")?;
        Ok(())
    }

    pub async fn remove_assignment(&self, uid: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(SOFT_DELETE_ASSIGNMENT)
            .bind(("uid", uid.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Removing council assignment")?;
        Ok(())
    }

    pub async fn delete(&self, council: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(DELETE_COUNCIL)
            .bind(("council", council.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Deleting council")?;
        Ok(())
    }
}
