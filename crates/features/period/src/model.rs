use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::TimelineStatus;
use utoipa::IntoParams;

/// Row of the `submission_period` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub uid: String,
    pub semester: String,
    pub round_number: u32,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct PeriodView {
    pub id: String,
    pub semester: String,
    pub round_number: u32,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub status: TimelineStatus,
    pub created_at: String,
}

#[api_model]
#[derive(Clone)]
pub struct CreatePeriodRequest {
    pub semester: String,
    pub round_number: u32,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub start_date: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD` (inclusive day).
    pub end_date: String,
    pub description: Option<String>,
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdatePeriodRequest {
    pub semester: Option<String>,
    pub round_number: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodFilter {
    pub semester: Option<String>,
    pub status: Option<TimelineStatus>,
}
