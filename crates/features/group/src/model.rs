use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::MentorRole;
use utoipa::IntoParams;

/// Row of the `student_group` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub uid: String,
    pub code: String,
    pub name: String,
    pub semester: String,
    pub topic_id: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

/// Row of the `group_member` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub uid: String,
    pub group_id: String,
    pub student_id: String,
    pub semester: String,
    pub is_leader: bool,
    /// Join order inside the group; breaks ties between equal timestamps.
    pub seq: u32,
    pub joined_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

/// Row of the `group_mentor` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorRecord {
    pub uid: String,
    pub group_id: String,
    pub lecturer_id: String,
    pub semester: String,
    pub role: MentorRole,
    pub assigned_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

/// A group with its live members (join order) and mentors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetails {
    pub group: GroupRecord,
    pub members: Vec<MemberRecord>,
    pub mentors: Vec<MentorRecord>,
}

impl GroupDetails {
    #[must_use]
    pub fn leader(&self) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.is_leader)
    }

    #[must_use]
    pub fn member(&self, student_id: &str) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.student_id == student_id)
    }

    #[must_use]
    pub fn mentor(&self, lecturer_id: &str) -> Option<&MentorRecord> {
        self.mentors.iter().find(|m| m.lecturer_id == lecturer_id)
    }

    #[must_use]
    pub fn mentor_with_role(&self, role: MentorRole) -> Option<&MentorRecord> {
        self.mentors.iter().find(|m| m.role == role)
    }

    #[must_use]
    pub fn is_mentor(&self, lecturer_id: &str) -> bool {
        self.mentor(lecturer_id).is_some()
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct MemberView {
    pub student_id: String,
    pub is_leader: bool,
    pub joined_at: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct MentorView {
    pub lecturer_id: String,
    pub role: MentorRole,
    pub assigned_at: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: String,
    pub code: String,
    pub name: String,
    pub semester: String,
    pub topic_id: Option<String>,
    pub leader_id: Option<String>,
    pub members: Vec<MemberView>,
    pub mentors: Vec<MentorView>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GroupDetails> for GroupView {
    fn from(details: GroupDetails) -> Self {
        let leader_id = details.leader().map(|m| m.student_id.clone());
        let GroupDetails { group, members, mentors } = details;
        Self {
            id: group.uid,
            code: group.code,
            name: group.name,
            semester: group.semester,
            topic_id: group.topic_id,
            leader_id,
            members: members
                .into_iter()
                .map(|m| MemberView {
                    student_id: m.student_id,
                    is_leader: m.is_leader,
                    joined_at: m.joined_at,
                })
                .collect(),
            mentors: mentors
                .into_iter()
                .map(|m| MentorView {
                    lecturer_id: m.lecturer_id,
                    role: m.role,
                    assigned_at: m.assigned_at,
                })
                .collect(),
            created_by: group.created_by,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[api_model]
#[derive(Clone)]
pub struct CreateGroupRequest {
    pub semester: String,
    /// Defaults to the generated code.
    pub name: Option<String>,
}

#[api_model]
#[derive(Clone)]
pub struct AddMemberRequest {
    pub student_id: String,
}

#[api_model]
#[derive(Clone)]
pub struct ChangeLeaderRequest {
    pub student_id: String,
}

#[api_model]
#[derive(Clone)]
pub struct AddMentorRequest {
    pub lecturer_id: String,
    pub role: MentorRole,
}

#[api_model]
#[derive(Clone)]
pub struct AssignTopicRequest {
    pub topic_id: String,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupFilter {
    pub semester: Option<String>,
    pub student_id: Option<String>,
    pub mentor_id: Option<String>,
}
