//! Facade crate for ThesisHub.
//! Re-exports the shared crates and wires the feature slices together in
//! dependency order. Keep it thin: composition only, no business rules.
//!
//! ## Usage
//! ```rust,ignore
//! let platform = thesis::init(&config, &database, &events).await?;
//! let state = ApiState::builder()
//!     .config(config)
//!     .db(database)
//!     .events(events)
//!     .register_slices(platform.slices)
//!     .build()?;
//! let router = thesis::api_router().with_state(state);
//! ```

use std::borrow::Cow;
use thesis_database::Database;
use thesis_domain::config::ApiConfig;
use thesis_domain::registry::InitializedSlice;
use thesis_event_bus::EventBus;
use thesis_kernel::prelude::ApiState;
use utoipa_axum::router::OpenApiRouter;

pub use thesis_domain as domain;
pub use thesis_kernel as kernel;

pub mod server {
    pub mod router {
        pub use thesis_kernel::server::router::system_router;
    }
}

/// Feature slices, in initialization order.
pub mod features {
    pub use thesis_council as council;
    pub use thesis_decision as decision;
    pub use thesis_group as group;
    pub use thesis_identity as identity;
    pub use thesis_meeting as meeting;
    pub use thesis_notification as notification;
    pub use thesis_period as period;
    pub use thesis_settings as settings;
    pub use thesis_topic as topic;

    pub const ENABLED: &[&str] = &[
        "identity",
        "settings",
        "period",
        "topic",
        "group",
        "council",
        "meeting",
        "decision",
        "notification",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[thesis_derive::thesis_error]
pub enum PlatformError {
    #[error("Identity initialization failed{}: {source}", format_context(.context))]
    Identity {
        #[source]
        source: thesis_identity::IdentityError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Notification initialization failed{}: {source}", format_context(.context))]
    Notification {
        #[source]
        source: thesis_notification::NotificationError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal platform error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Everything [`init`] produced: slices for the API state plus the
/// notification listeners running in the background.
#[derive(Debug)]
pub struct Platform {
    pub slices: Vec<InitializedSlice>,
    pub notifications: features::notification::Notifications,
}

/// Initializes every slice. Must run inside the Tokio runtime because the
/// notification listeners are spawned here.
///
/// # Errors
/// Returns an error if the identity slice or the listeners fail to start.
pub async fn init(
    config: &ApiConfig,
    database: &Database,
    events: &EventBus,
) -> Result<Platform, PlatformError> {
    use features::{council, decision, group, identity, meeting, notification, period, settings, topic};

    let identity = identity::init(config, database).await?;
    let settings = settings::init(config, database);
    let periods = period::init(database);
    let topics = topic::init(
        database,
        events,
        identity.users.clone(),
        settings.service.clone(),
        periods.service.clone(),
    );
    let groups = group::init(
        database,
        events,
        identity.users.clone(),
        settings.service.clone(),
        topics.service.clone(),
    );
    let councils = council::init(
        database,
        events,
        identity.users.clone(),
        settings.service.clone(),
        periods.service.clone(),
        groups.service.clone(),
    );
    let meetings = meeting::init(database, events, groups.service.clone());
    let decisions = decision::init(database);
    let notifications =
        notification::init(events, &config.mail, identity.users.clone(), groups.service.clone())?;

    let slices = vec![
        InitializedSlice::new(identity),
        InitializedSlice::new(settings),
        InitializedSlice::new(periods),
        InitializedSlice::new(topics),
        InitializedSlice::new(groups),
        InitializedSlice::new(councils),
        InitializedSlice::new(meetings),
        InitializedSlice::new(decisions),
    ];
    tracing::info!(slices = slices.len(), listeners = notifications.listeners(), "Platform initialized");

    Ok(Platform { slices, notifications })
}

/// Every authenticated `/api` route of the enabled slices.
pub fn api_router() -> OpenApiRouter<ApiState> {
    use features::{council, decision, group, identity, meeting, period, settings, topic};

    OpenApiRouter::new()
        .merge(identity::router())
        .merge(settings::router())
        .merge(period::router())
        .merge(topic::router())
        .merge(group::router())
        .merge(council::router())
        .merge(meeting::router())
        .merge(decision::router())
}
