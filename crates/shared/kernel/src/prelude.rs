//! Items nearly every slice imports.

pub use crate::domain::constants::*;
pub use crate::domain::registry::InitializedSlice;
pub use crate::domain::roles::{Role, RoleSet};
pub use crate::domain::settings::SettingKey;
pub use crate::domain::status::{
    CouncilKind, CouncilRole, DecisionKind, MentorRole, TimelineStatus, TopicStatus,
};
pub use crate::safe_nanoid;
pub use crate::security::resource::ResourceGuard;
#[cfg(feature = "server")]
pub use crate::server::{
    ApiError, ApiErrorExt, ApiJson, ApiQuery, ApiResponse, ApiState, DeletedResource,
};
pub use crate::timeline::{self, Window};
