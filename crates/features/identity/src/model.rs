use serde::{Deserialize, Serialize};
use thesis_derive::api_model;
use thesis_kernel::prelude::Role;
use utoipa::IntoParams;

/// Row of the `user` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.uid,
            email: record.email,
            full_name: record.full_name,
            role: record.role,
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }
}

#[api_model]
#[derive(Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

#[api_model]
#[derive(Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Only users with this role.
    pub role: Option<Role>,
    /// Include deactivated accounts.
    pub include_inactive: Option<bool>,
}
