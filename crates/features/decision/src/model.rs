use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::DecisionKind;
use utoipa::IntoParams;

/// Row of the `decision` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub uid: String,
    pub number: String,
    /// Lowercased number, unique among live decisions.
    pub number_key: String,
    pub title: String,
    pub kind: DecisionKind,
    pub semester: String,
    pub signed_date: String,
    pub signer: String,
    pub file_url: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct DecisionView {
    pub id: String,
    pub number: String,
    pub title: String,
    pub kind: DecisionKind,
    pub semester: String,
    pub signed_date: String,
    pub signer: String,
    pub file_url: Option<String>,
    pub note: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DecisionRecord> for DecisionView {
    fn from(record: DecisionRecord) -> Self {
        Self {
            id: record.uid,
            number: record.number,
            title: record.title,
            kind: record.kind,
            semester: record.semester,
            signed_date: record.signed_date,
            signer: record.signer,
            file_url: record.file_url,
            note: record.note,
            created_by: record.created_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[api_model]
#[derive(Clone)]
pub struct CreateDecisionRequest {
    pub number: String,
    pub title: String,
    pub kind: DecisionKind,
    pub semester: String,
    /// `YYYY-MM-DD` or RFC 3339; not in the future.
    pub signed_date: String,
    pub signer: String,
    pub file_url: Option<String>,
    pub note: Option<String>,
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateDecisionRequest {
    pub number: Option<String>,
    pub title: Option<String>,
    pub kind: Option<DecisionKind>,
    pub semester: Option<String>,
    pub signed_date: Option<String>,
    pub signer: Option<String>,
    /// An empty string removes the attachment.
    pub file_url: Option<String>,
    pub note: Option<String>,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DecisionFilter {
    pub semester: Option<String>,
    pub kind: Option<DecisionKind>,
}
