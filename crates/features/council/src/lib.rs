//! Review and defense councils: lecturer seats (one chairman, one secretary),
//! per-semester load limits and 60-minute group slots inside the council's
//! working window.

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;

pub use error::{CouncilError, CouncilErrorExt};
pub use model::{
    AddCouncilMemberRequest, AssignGroupRequest, AssignmentRecord, AssignmentView, CouncilDetails,
    CouncilFilter, CouncilMemberRecord, CouncilMemberView, CouncilRecord, CouncilView,
    CreateCouncilRequest, UpdateCouncilRequest,
};
pub use repository::CouncilRepository;
pub use service::CouncilService;

use thesis_database::Database;
use thesis_event_bus::EventBus;
use thesis_group::GroupService;
use thesis_identity::UserService;
use thesis_kernel::prelude::ApiState;
use thesis_period::PeriodService;
use thesis_settings::SettingsService;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[thesis_derive::thesis_slice]
pub struct Councils {
    pub service: CouncilService,
}

pub fn init(
    db: &Database,
    events: &EventBus,
    users: UserService,
    settings: SettingsService,
    periods: PeriodService,
    groups: GroupService,
) -> Councils {
    let service = CouncilService::new(
        CouncilRepository::new(db.clone()),
        users,
        settings,
        periods,
        groups,
        events.clone(),
    );
    tracing::info!("Council slice initialized");
    Councils::new(CouncilsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_councils, handlers::create_council))
        .routes(routes!(handlers::get_council, handlers::update_council, handlers::delete_council))
        .routes(routes!(handlers::add_council_member))
        .routes(routes!(handlers::remove_council_member))
        .routes(routes!(handlers::assign_group))
        .routes(routes!(handlers::unassign_group))
}
