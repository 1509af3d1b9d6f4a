use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::TimelineStatus;
use utoipa::IntoParams;

/// Row of the `meeting_schedule` table. `end_time` is kept next to the
/// duration so overlap checks need no arithmetic in queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub uid: String,
    pub group_id: String,
    pub mentor_id: String,
    pub semester: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct MeetingView {
    pub id: String,
    pub group_id: String,
    pub mentor_id: String,
    pub semester: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    pub status: TimelineStatus,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[api_model]
#[derive(Clone)]
pub struct CreateMeetingRequest {
    pub group_id: String,
    /// Defaults to the calling lecturer.
    pub mentor_id: Option<String>,
    pub start_time: String,
    /// 15 to 240 minutes, 60 when omitted.
    pub duration_minutes: Option<i64>,
    pub location: Option<String>,
    pub agenda: Option<String>,
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateMeetingRequest {
    pub start_time: Option<String>,
    pub duration_minutes: Option<i64>,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
}

impl UpdateMeetingRequest {
    /// `true` when nothing but the notes is touched.
    #[must_use]
    pub const fn notes_only(&self) -> bool {
        self.start_time.is_none()
            && self.duration_minutes.is_none()
            && self.location.is_none()
            && self.agenda.is_none()
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeetingFilter {
    pub group_id: Option<String>,
    pub mentor_id: Option<String>,
    pub status: Option<TimelineStatus>,
}
