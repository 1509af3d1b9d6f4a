use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::{CouncilKind, CouncilRole, TimelineStatus};
use utoipa::IntoParams;

/// Row of the `council` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilRecord {
    pub uid: String,
    pub code: String,
    pub name: String,
    pub kind: CouncilKind,
    pub semester: String,
    pub period_id: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

/// Row of the `council_member` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilMemberRecord {
    pub uid: String,
    pub council_id: String,
    pub lecturer_id: String,
    pub semester: String,
    pub role: CouncilRole,
    pub added_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

/// Row of the `council_assignment` table: one defense slot of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub uid: String,
    pub council_id: String,
    pub group_id: String,
    pub kind: CouncilKind,
    pub semester: String,
    pub defense_at: String,
    pub created_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouncilDetails {
    pub council: CouncilRecord,
    pub members: Vec<CouncilMemberRecord>,
    pub assignments: Vec<AssignmentRecord>,
}

impl CouncilDetails {
    #[must_use]
    pub fn member(&self, lecturer_id: &str) -> Option<&CouncilMemberRecord> {
        self.members.iter().find(|m| m.lecturer_id == lecturer_id)
    }

    #[must_use]
    pub fn assignment(&self, group_id: &str) -> Option<&AssignmentRecord> {
        self.assignments.iter().find(|a| a.group_id == group_id)
    }

    #[must_use]
    pub fn has_role(&self, role: CouncilRole) -> bool {
        self.members.iter().any(|m| m.role == role)
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct CouncilMemberView {
    pub lecturer_id: String,
    pub role: CouncilRole,
    pub added_at: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct AssignmentView {
    pub group_id: String,
    pub defense_at: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct CouncilView {
    pub id: String,
    pub code: String,
    pub name: String,
    pub kind: CouncilKind,
    pub semester: String,
    pub period_id: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub status: TimelineStatus,
    pub members: Vec<CouncilMemberView>,
    pub assignments: Vec<AssignmentView>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[api_model]
#[derive(Clone)]
pub struct CreateCouncilRequest {
    pub name: String,
    pub kind: CouncilKind,
    pub period_id: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateCouncilRequest {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
}

#[api_model]
#[derive(Clone)]
pub struct AddCouncilMemberRequest {
    pub lecturer_id: String,
    pub role: CouncilRole,
}

#[api_model]
#[derive(Clone)]
pub struct AssignGroupRequest {
    pub group_id: String,
    /// Start of the 60-minute defense slot.
    pub defense_at: String,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CouncilFilter {
    pub semester: Option<String>,
    pub kind: Option<CouncilKind>,
    pub period_id: Option<String>,
    pub lecturer_id: Option<String>,
}
