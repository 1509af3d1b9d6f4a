use serde::{Deserialize, Serialize};
use thesis_derive::api_model;

/// Row of the `system_config` table; only overrides are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRecord {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: String,
    pub updated_by: Option<String>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SettingView {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    /// Built-in value of a known key.
    pub default_value: Option<String>,
    /// `true` while a known key has no stored override.
    pub is_default: bool,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

#[api_model]
#[derive(Clone)]
pub struct UpsertSettingRequest {
    pub value: String,
    pub description: Option<String>,
}
