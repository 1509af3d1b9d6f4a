//! Student groups of a semester: membership with a single leader, MAIN/SUB
//! mentors and the approved topic the group works on.

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;

pub use error::{GroupError, GroupErrorExt};
pub use model::{
    AddMemberRequest, AddMentorRequest, AssignTopicRequest, ChangeLeaderRequest,
    CreateGroupRequest, GroupDetails, GroupFilter, GroupRecord, GroupView, MemberRecord,
    MemberView, MentorRecord, MentorView,
};
pub use repository::GroupRepository;
pub use service::GroupService;

use thesis_database::Database;
use thesis_event_bus::EventBus;
use thesis_identity::UserService;
use thesis_kernel::prelude::ApiState;
use thesis_settings::SettingsService;
use thesis_topic::TopicService;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[thesis_derive::thesis_slice]
pub struct Groups {
    pub service: GroupService,
}

pub fn init(
    db: &Database,
    events: &EventBus,
    users: UserService,
    settings: SettingsService,
    topics: TopicService,
) -> Groups {
    let service =
        GroupService::new(GroupRepository::new(db.clone()), users, settings, topics, events.clone());
    tracing::info!("Group slice initialized");
    Groups::new(GroupsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_groups, handlers::create_group))
        .routes(routes!(handlers::get_group, handlers::delete_group))
        .routes(routes!(handlers::add_member))
        .routes(routes!(handlers::remove_member))
        .routes(routes!(handlers::change_leader))
        .routes(routes!(handlers::add_mentor))
        .routes(routes!(handlers::remove_mentor))
        .routes(routes!(handlers::assign_topic))
}
