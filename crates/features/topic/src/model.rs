use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::TopicStatus;
use utoipa::IntoParams;

/// Row of the `topic` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub uid: String,
    pub code: String,
    pub title_vi: String,
    pub title_en: String,
    /// Lowercased, space-collapsed Vietnamese title used for uniqueness.
    pub title_key: String,
    pub description: Option<String>,
    pub semester: String,
    pub period_id: String,
    pub main_mentor_id: String,
    pub sub_mentor_id: Option<String>,
    pub max_students: u32,
    pub status: TopicStatus,
    pub review_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub group_id: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct TopicView {
    pub id: String,
    pub code: String,
    pub title_vi: String,
    pub title_en: String,
    pub description: Option<String>,
    pub semester: String,
    pub period_id: String,
    pub main_mentor_id: String,
    pub sub_mentor_id: Option<String>,
    pub max_students: u32,
    pub status: TopicStatus,
    pub review_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub group_id: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TopicRecord> for TopicView {
    fn from(record: TopicRecord) -> Self {
        Self {
            id: record.uid,
            code: record.code,
            title_vi: record.title_vi,
            title_en: record.title_en,
            description: record.description,
            semester: record.semester,
            period_id: record.period_id,
            main_mentor_id: record.main_mentor_id,
            sub_mentor_id: record.sub_mentor_id,
            max_students: record.max_students,
            status: record.status,
            review_note: record.review_note,
            reviewed_by: record.reviewed_by,
            reviewed_at: record.reviewed_at,
            group_id: record.group_id,
            created_by: record.created_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[api_model]
#[derive(Clone)]
pub struct CreateTopicRequest {
    pub title_vi: String,
    pub title_en: String,
    pub description: Option<String>,
    pub period_id: String,
    /// Required for staff; a lecturer is always the main mentor of their topics.
    pub main_mentor_id: Option<String>,
    pub sub_mentor_id: Option<String>,
    /// Defaults to `MAX_GROUP_MEMBERS`.
    pub max_students: Option<u32>,
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateTopicRequest {
    pub title_vi: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    /// Staff only.
    pub main_mentor_id: Option<String>,
    pub sub_mentor_id: Option<String>,
    pub max_students: Option<u32>,
}

#[api_model]
#[derive(Clone)]
pub struct ReviewTopicRequest {
    pub status: TopicStatus,
    pub note: Option<String>,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopicFilter {
    pub semester: Option<String>,
    pub period_id: Option<String>,
    pub status: Option<TopicStatus>,
    /// Main or sub mentor.
    pub mentor_id: Option<String>,
}

#[api_model]
#[derive(Clone)]
pub struct ValidateTopicRequest {
    pub title_vi: String,
    pub title_en: Option<String>,
    pub description: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq)]
pub struct TopicValidation {
    pub is_valid: bool,
    pub similarity_score: f64,
    pub similar_topics: Vec<String>,
    pub suggestions: Vec<String>,
}
