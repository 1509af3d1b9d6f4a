//! Submission periods: dated rounds of a semester during which topics can be
//! registered. Status is derived from the clock, never stored.

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;

pub use error::{PeriodError, PeriodErrorExt};
pub use model::{CreatePeriodRequest, PeriodFilter, PeriodRecord, PeriodView, UpdatePeriodRequest};
pub use repository::PeriodRepository;
pub use service::PeriodService;

use thesis_database::Database;
use thesis_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[thesis_derive::thesis_slice]
pub struct Periods {
    pub service: PeriodService,
}

pub fn init(db: &Database) -> Periods {
    let service = PeriodService::new(PeriodRepository::new(db.clone()));
    tracing::info!("Period slice initialized");
    Periods::new(PeriodsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_periods, handlers::create_period))
        .routes(routes!(handlers::active_periods))
        .routes(routes!(handlers::get_period, handlers::update_period, handlers::delete_period))
}
