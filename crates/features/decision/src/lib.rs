//! Faculty decisions (topic assignment, council establishment, defense
//! results) with their signing metadata.

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;

pub use error::{DecisionError, DecisionErrorExt};
pub use model::{
    CreateDecisionRequest, DecisionFilter, DecisionRecord, DecisionView, UpdateDecisionRequest,
};
pub use repository::DecisionRepository;
pub use service::DecisionService;

use thesis_database::Database;
use thesis_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[thesis_derive::thesis_slice]
pub struct Decisions {
    pub service: DecisionService,
}

pub fn init(db: &Database) -> Decisions {
    let service = DecisionService::new(DecisionRepository::new(db.clone()));
    tracing::info!("Decision slice initialized");
    Decisions::new(DecisionsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_decisions, handlers::create_decision))
        .routes(routes!(handlers::get_decision, handlers::update_decision, handlers::delete_decision))
}
