//! System configuration slice.
//!
//! Quotas used by the other slices (`MAX_GROUP_MEMBERS`, ...) live here with
//! built-in defaults; administrators override them through the API and
//! services read them through [`SettingsService::limit`].

mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;

pub use error::{SettingsError, SettingsErrorExt};
pub use model::{SettingRecord, SettingView, UpsertSettingRequest};
pub use repository::SettingsRepository;
pub use service::SettingsService;

use thesis_database::Database;
use thesis_kernel::domain::config::ApiConfig;
use thesis_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Settings feature state.
#[thesis_derive::thesis_slice]
pub struct Settings {
    pub service: SettingsService,
}

pub fn init(config: &ApiConfig, db: &Database) -> Settings {
    let service = SettingsService::new(SettingsRepository::new(db.clone()), &config.settings);
    tracing::info!("Settings slice initialized");
    Settings::new(SettingsInner { service })
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(handlers::list_settings)).routes(routes!(
        handlers::get_setting,
        handlers::upsert_setting,
        handlers::reset_setting
    ))
}
