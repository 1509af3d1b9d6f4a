//! Events published on the bus after a write commits.
//!
//! Identifiers are bare record keys; timestamps are RFC 3339 strings.

use crate::status::{CouncilRole, MentorRole, TopicStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMemberAdded {
    pub group_id: String,
    pub group_code: String,
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentorAssigned {
    pub group_id: String,
    pub group_code: String,
    pub lecturer_id: String,
    pub role: MentorRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicReviewed {
    pub topic_id: String,
    pub topic_code: String,
    pub title: String,
    pub status: TopicStatus,
    pub note: Option<String>,
    /// Creator and main mentor, deduplicated.
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouncilMemberAdded {
    pub council_id: String,
    pub council_name: String,
    pub lecturer_id: String,
    pub role: CouncilRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignedToCouncil {
    pub council_id: String,
    pub council_name: String,
    pub group_id: String,
    pub group_code: String,
    pub defense_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingScheduled {
    pub meeting_id: String,
    pub group_id: String,
    pub mentor_id: String,
    pub start_time: String,
    pub location: Option<String>,
}
