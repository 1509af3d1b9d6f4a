//! Thesis topics: registration by lecturers or staff inside an active
//! submission period, the review workflow, and the similarity-check stub.

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;
mod validator;

pub use error::{TopicError, TopicErrorExt};
pub use model::{
    CreateTopicRequest, ReviewTopicRequest, TopicFilter, TopicRecord, TopicValidation, TopicView,
    UpdateTopicRequest, ValidateTopicRequest,
};
pub use repository::{TopicQuery, TopicRepository};
pub use service::TopicService;
pub use validator::{StubTopicValidator, TopicValidator};

use std::sync::Arc;
use thesis_database::Database;
use thesis_event_bus::EventBus;
use thesis_identity::UserService;
use thesis_kernel::prelude::ApiState;
use thesis_period::PeriodService;
use thesis_settings::SettingsService;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[thesis_derive::thesis_slice]
pub struct Topics {
    pub service: TopicService,
}

pub fn init(
    db: &Database,
    events: &EventBus,
    users: UserService,
    settings: SettingsService,
    periods: PeriodService,
) -> Topics {
    let service = TopicService::new(
        TopicRepository::new(db.clone()),
        users,
        settings,
        periods,
        events.clone(),
        Arc::new(StubTopicValidator),
    );
    tracing::info!("Topic slice initialized");
    Topics::new(TopicsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_topics, handlers::create_topic))
        .routes(routes!(handlers::validate_topic))
        .routes(routes!(handlers::get_topic, handlers::update_topic, handlers::delete_topic))
        .routes(routes!(handlers::review_topic))
}
