use crate::model::{GroupRecord, MemberRecord, MentorRecord};
use surrealdb::Response;
use thesis_database::{Database, DatabaseError, DatabaseErrorExt};

const FIND: &str = "SELECT * OMIT id FROM student_group WHERE uid = $uid AND is_deleted = false";
const LIST: &str = "SELECT * OMIT id FROM student_group
    WHERE is_deleted = false
        AND ($semester = NONE OR semester = $semester)
        AND ($student = NONE OR uid INSIDE (
            SELECT VALUE group_id FROM group_member WHERE student_id = $student AND is_deleted = false))
        AND ($mentor = NONE OR uid INSIDE (
            SELECT VALUE group_id FROM group_mentor WHERE lecturer_id = $mentor AND is_deleted = false))
    ORDER BY code ASC";
const SEQUENCE: &str =
    "SELECT count() AS total FROM student_group WHERE semester = $semester GROUP ALL";
const MEMBERS: &str = "SELECT * OMIT id FROM group_member
    WHERE group_id INSIDE $groups AND is_deleted = false ORDER BY joined_at ASC, seq ASC";
const MENTORS: &str = "SELECT * OMIT id FROM group_mentor
    WHERE group_id INSIDE $groups AND is_deleted = false ORDER BY assigned_at ASC";
const MEMBER_SEQUENCE: &str =
    "SELECT count() AS total FROM group_member WHERE group_id = $group GROUP ALL";
const STUDENT_GROUP: &str = "SELECT VALUE group_id FROM group_member
    WHERE student_id = $student AND semester = $semester AND is_deleted = false LIMIT 1";
const MENTOR_LOAD: &str = "SELECT count() AS total FROM group_mentor
    WHERE lecturer_id = $lecturer AND semester = $semester AND is_deleted = false GROUP ALL";

// Councils the group is assigned to on which `lecturer` holds a seat.
const COUNCIL_SEAT: &str = "SELECT VALUE council_id FROM council_member
    WHERE lecturer_id = $lecturer AND is_deleted = false
        AND council_id INSIDE (SELECT VALUE council_id FROM council_assignment
            WHERE group_id = $group AND is_deleted = false)
    LIMIT 1";
const CREATE_GROUP: &str = "BEGIN TRANSACTION;
    CREATE student_group CONTENT $group;
    FOR $member IN $members { CREATE group_member CONTENT $member; };
    COMMIT TRANSACTION;";
const INSERT_MEMBER: &str = "CREATE group_member CONTENT $member";
const REMOVE_MEMBER: &str = "BEGIN TRANSACTION;
    UPDATE group_member SET is_deleted = true, is_leader = false, deleted_at = $now
        WHERE uid = $member AND is_deleted = false;
    IF $successor != NONE {
        UPDATE group_member SET is_leader = true WHERE uid = $successor AND is_deleted = false;
    };
    UPDATE student_group SET updated_at = $now WHERE uid = $group;
    COMMIT TRANSACTION;";
const CHANGE_LEADER: &str = "BEGIN TRANSACTION;
    UPDATE group_member SET is_leader = false WHERE group_id = $group AND is_deleted = false;
    UPDATE group_member SET is_leader = true WHERE uid = $member AND is_deleted = false;
    UPDATE student_group SET updated_at = $now WHERE uid = $group;
    COMMIT TRANSACTION;";
const INSERT_MENTOR: &str = "CREATE group_mentor CONTENT $mentor";
const REMOVE_MENTOR: &str = "UPDATE group_mentor SET is_deleted = true, deleted_at = $now
    WHERE uid = $mentor AND is_deleted = false";
const ASSIGN_TOPIC: &str = "BEGIN TRANSACTION;
    IF $previous != NONE {
        UPDATE topic SET group_id = NONE, updated_at = $now WHERE uid = $previous;
    };
    UPDATE topic SET group_id = $group, updated_at = $now WHERE uid = $topic AND is_deleted = false;
    UPDATE student_group SET topic_id = $topic, updated_at = $now WHERE uid = $group;
    FOR $mentor IN $mentors { CREATE group_mentor CONTENT $mentor; };
    COMMIT TRANSACTION;";
const DELETE_GROUP: &str = "BEGIN TRANSACTION;
    UPDATE group_member SET is_deleted = true, deleted_at = $now
        WHERE group_id = $group AND is_deleted = false;
    UPDATE group_mentor SET is_deleted = true, deleted_at = $now
        WHERE group_id = $group AND is_deleted = false;
    UPDATE meeting_schedule SET is_deleted = true, deleted_at = $now
        WHERE group_id = $group AND is_deleted = false;
    UPDATE council_assignment SET is_deleted = true, deleted_at = $now
        WHERE group_id = $group AND is_deleted = false;
    UPDATE topic SET group_id = NONE, updated_at = $now WHERE group_id = $group;
    UPDATE student_group SET is_deleted = true, deleted_at = $now
        WHERE uid = $group AND is_deleted = false;
    COMMIT TRANSACTION;";

#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: Database,
}

impl GroupRepository {
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find(&self, uid: &str) -> Result<Option<GroupRecord>, DatabaseError> {
        let rows: Vec<GroupRecord> = self
            .db
            .query(FIND)
            .bind(("uid", uid.to_owned()))
            .await
            .context("Loading group")?
            .take(0)
            .context("Decoding group")?;
        Ok(rows.into_iter().next())
    }

    pub async fn list(
        &self,
        semester: Option<String>,
        student: Option<String>,
        mentor: Option<String>,
    ) -> Result<Vec<GroupRecord>, DatabaseError> {
        self.db
            .query(LIST)
            .bind(("semester", semester))
            .bind(("student", student))
            .bind(("mentor", mentor))
            .await
            .context("Listing groups")?
            .take(0)
            .context("Decoding groups")
    }

    pub async fn next_sequence(&self, semester: &str) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(SEQUENCE)
            .bind(("semester", semester.to_owned()))
            .await
            .context("Counting groups of semester")?
            .take((0, "total"))
            .context("Decoding group count")?;
        Ok(total.unwrap_or(0) + 1)
    }

    /// Live members of `groups`, in join order.
    pub async fn members(&self, groups: Vec<String>) -> Result<Vec<MemberRecord>, DatabaseError> {
        self.db
            .query(MEMBERS)
            .bind(("groups", groups))
            .await
            .context("Loading group members")?
            .take(0)
            .context("Decoding group members")
    }

    pub async fn mentors(&self, groups: Vec<String>) -> Result<Vec<MentorRecord>, DatabaseError> {
        self.db
            .query(MENTORS)
            .bind(("groups", groups))
            .await
            .context("Loading group mentors")?
            .take(0)
            .context("Decoding group mentors")
    }

    pub async fn next_member_seq(&self, group: &str) -> Result<u32, DatabaseError> {
        let total: Option<u32> = self
            .db
            .query(MEMBER_SEQUENCE)
            .bind(("group", group.to_owned()))
            .await
            .context("Counting group members")?
            .take((0, "total"))
            .context("Decoding member count")?;
        Ok(total.unwrap_or(0) + 1)
    }

    /// The live group `student` belongs to in `semester`.
    pub async fn group_of_student(
        &self,
        student: &str,
        semester: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let rows: Vec<String> = self
            .db
            .query(STUDENT_GROUP)
            .bind(("student", student.to_owned()))
            .bind(("semester", semester.to_owned()))
            .await
            .context("Looking up student group")?
            .take(0)
            .context("Decoding student group")?;
        Ok(rows.into_iter().next())
    }

    pub async fn mentor_load(&self, lecturer: &str, semester: &str) -> Result<i64, DatabaseError> {
        let total: Option<i64> = self
            .db
            .query(MENTOR_LOAD)
            .bind(("lecturer", lecturer.to_owned()))
            .bind(("semester", semester.to_owned()))
            .await
            .context("Counting mentor load")?
            .take((0, "total"))
            .context("Decoding mentor load")?;
        Ok(total.unwrap_or(0))
    }

    /// A council judging `group` that seats `lecturer`, if any.
    pub async fn council_seat(&self, group: &str, lecturer: &str) -> Result<Option<String>, DatabaseError> {
        let rows: Vec<String> = self
            .db
            .query(COUNCIL_SEAT)
            .bind(("group", group.to_owned()))
            .bind(("lecturer", lecturer.to_owned()))
            .await
            .context("Looking up council seat")?
            .take(0)
            .context("Decoding council seat")?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(
        &self,
        group: &GroupRecord,
        members: Vec<MemberRecord>,
    ) -> Result<(), DatabaseError> {
        self.db
            .query(CREATE_GROUP)
            .bind(("group", group.clone()))
            .bind(("members", members))
            .await
            .and_then(Response::check)
            .context("Creating group")?;
        Ok(())
    }

    pub async fn insert_member(&self, member: &MemberRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT_MEMBER)
            .bind(("member", member.clone()))
            .await
            .and_then(Response::check)
            .context("Adding group member")?;
        Ok(())
    }

    /// Removes `member` and hands leadership to `successor` in one transaction.
    pub async fn remove_member(
        &self,
        group: &str,
        member: &str,
        successor: Option<String>,
        now: String,
    ) -> Result<(), DatabaseError> {
        self.db
            .query(REMOVE_MEMBER)
            .bind(("group", group.to_owned()))
            .bind(("member", member.to_owned()))
            .bind(("successor", successor))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Removing group member")?;
        Ok(())
    }

    pub async fn change_leader(
        &self,
        group: &str,
        member: &str,
        now: String,
    ) -> Result<(), DatabaseError> {
        self.db
            .query(CHANGE_LEADER)
            .bind(("group", group.to_owned()))
            .bind(("member", member.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Changing group leader")?;
        Ok(())
    }

    pub async fn insert_mentor(&self, mentor: &MentorRecord) -> Result<(), DatabaseError> {
        self.db
            .query(INSERT_MENTOR)
            .bind(("mentor", mentor.clone()))
            .await
            .and_then(Response::check)
            .context("Adding group mentor")?;
        Ok(())
    }

    pub async fn remove_mentor(&self, mentor: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(REMOVE_MENTOR)
            .bind(("mentor", mentor.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Removing group mentor")?;
        Ok(())
    }

    /// Links `topic` to `group`, releasing `previous` and attaching `mentors`.
    pub async fn assign_topic(
        &self,
        group: &str,
        topic: &str,
        previous: Option<String>,
        mentors: Vec<MentorRecord>,
        now: String,
    ) -> Result<(), DatabaseError> {
        self.db
            .query(ASSIGN_TOPIC)
            .bind(("group", group.to_owned()))
            .bind(("topic", topic.to_owned()))
            .bind(("previous", previous))
            .bind(("mentors", mentors))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Assigning topic to group")?;
        Ok(())
    }

    /// Soft-deletes the group with its members, mentors, meetings and
    /// council slots, and frees its topic.
    pub async fn delete(&self, group: &str, now: String) -> Result<(), DatabaseError> {
        self.db
            .query(DELETE_GROUP)
            .bind(("group", group.to_owned()))
            .bind(("now", now))
            .await
            .and_then(Response::check)
            .context("Deleting group")?;
        Ok(())
    }
}
