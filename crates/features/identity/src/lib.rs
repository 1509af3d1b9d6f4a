//! Identity feature slice: the user directory, HS256 bearer tokens and the
//! authentication middleware guarding every `/api` route.

mod auth;
mod error;
mod handlers;
mod model;
mod repository;
mod rules;
mod service;
mod token;

pub use auth::{CurrentUser, FORBIDDEN, INVALID_TOKEN, MISSING_TOKEN, require_auth};
pub use error::{IdentityError, IdentityErrorExt};
pub use model::{CreateUserRequest, UpdateUserRequest, UserFilter, UserRecord, UserView};
pub use repository::UserRepository;
pub use rules::role_label;
pub use service::UserService;
pub use token::{Claims, TokenService};

use thesis_database::Database;
use thesis_kernel::domain::config::ApiConfig;
use thesis_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Identity feature state.
#[thesis_derive::thesis_slice]
pub struct Identity {
    pub tokens: TokenService,
    pub users: UserService,
}

/// Builds the identity services and creates the bootstrap administrator
/// when configured.
pub async fn init(config: &ApiConfig, db: &Database) -> Result<Identity, IdentityError> {
    let tokens = TokenService::new(&config.security.jwt)?;
    let users = UserService::new(UserRepository::new(db.clone()));

    if let Some(admin) = &config.security.bootstrap_admin {
        users.ensure_bootstrap_admin(admin).await?;
    }

    tracing::info!("Identity slice initialized");
    Ok(Identity::new(IdentityInner { tokens, users }))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::me))
        .routes(routes!(handlers::list_users, handlers::create_user))
        .routes(routes!(handlers::get_user, handlers::update_user, handlers::deactivate_user))
}
