//! Mentor and group meetings. A meeting blocks both its group and its
//! mentor for `duration_minutes`; once it starts only the notes stay editable.

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;

pub use error::{MeetingError, MeetingErrorExt};
pub use model::{
    CreateMeetingRequest, MeetingFilter, MeetingRecord, MeetingView, UpdateMeetingRequest,
};
pub use repository::{MeetingQuery, MeetingRepository};
pub use service::MeetingService;

use thesis_database::Database;
use thesis_event_bus::EventBus;
use thesis_group::GroupService;
use thesis_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[thesis_derive::thesis_slice]
pub struct Meetings {
    pub service: MeetingService,
}

pub fn init(db: &Database, events: &EventBus, groups: GroupService) -> Meetings {
    let service = MeetingService::new(MeetingRepository::new(db.clone()), groups, events.clone());
    tracing::info!("Meeting slice initialized");
    Meetings::new(MeetingsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_meetings, handlers::create_meeting))
        .routes(routes!(handlers::get_meeting, handlers::update_meeting, handlers::delete_meeting))
}
