use crate::error::SettingsError;
use crate::model::{SettingRecord, SettingView, UpsertSettingRequest};
use crate::repository::SettingsRepository;
use crate::rules::{ensure_bounds, parse_quota, validate_key};
use moka::sync::Cache;
use std::str::FromStr;
use std::time::Duration;
use strum::IntoEnumIterator;
use thesis_identity::CurrentUser;
use thesis_kernel::domain::config::SettingsConfig;
use thesis_kernel::prelude::{SettingKey, timeline};
use tracing::{info, instrument, warn};

const NOT_FOUND: &str = "Không tìm thấy cấu hình hệ thống";

/// Stored overrides on top of the built-in quota defaults.
#[derive(Debug, Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    cache: Cache<SettingKey, i64>,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, config: &SettingsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();
        Self { repo, cache }
    }

    /// Effective value of a quota. Stored values that no longer parse fall
    /// back to the default.
    pub async fn limit(&self, key: SettingKey) -> Result<i64, SettingsError> {
        if let Some(value) = self.cache.get(&key) {
            return Ok(value);
        }

        let value = match self.repo.find(key.as_ref()).await? {
            Some(record) => parse_quota(key, &record.value).unwrap_or_else(|_| {
                warn!(%key, value = %record.value, "Ignoring malformed stored quota");
                key.default_value()
            }),
            None => key.default_value(),
        };
        self.cache.insert(key, value);
        Ok(value)
    }

    /// Every known key (default or overridden) plus any custom entries.
    pub async fn list(&self) -> Result<Vec<SettingView>, SettingsError> {
        let mut stored = self.repo.list().await?;
        let mut views = Vec::with_capacity(stored.len());

        for key in SettingKey::iter() {
            let position = stored.iter().position(|record| record.key == key.as_ref());
            views.push(known_view(key, position.map(|index| stored.remove(index))));
        }
        views.extend(stored.into_iter().map(custom_view));
        Ok(views)
    }

    pub async fn get(&self, key: &str) -> Result<SettingView, SettingsError> {
        let record = self.repo.find(key).await?;
        match SettingKey::from_str(key) {
            Ok(known) => Ok(known_view(known, record)),
            Err(_) => record.map(custom_view).ok_or_else(|| not_found(key)),
        }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn upsert(
        &self,
        actor: &CurrentUser,
        key: &str,
        request: UpsertSettingRequest,
    ) -> Result<SettingView, SettingsError> {
        validate_key(key)?;
        let value = request.value.trim().to_owned();

        if let Ok(known) = SettingKey::from_str(key) {
            let quota = parse_quota(known, &value)?;
            self.check_bounds(known, quota).await?;
        } else if value.is_empty() {
            return Err(SettingsError::Validation {
                message: "Giá trị cấu hình không được để trống".into(),
                context: Some(key.to_owned().into()),
            });
        }

        let record = SettingRecord {
            key: key.to_owned(),
            value,
            description: request.description.map(|d| d.trim().to_owned()).filter(|d| !d.is_empty()),
            updated_at: timeline::format(timeline::now()),
            updated_by: Some(actor.id.clone()),
        };
        self.repo.upsert(&record).await?;
        self.invalidate(key);

        info!(%key, value = %record.value, "System configuration updated");
        self.get(key).await
    }

    /// Drops the override; custom keys disappear entirely.
    #[instrument(skip(self))]
    pub async fn reset(&self, key: &str) -> Result<SettingView, SettingsError> {
        if let Ok(known) = SettingKey::from_str(key) {
            self.check_bounds(known, known.default_value()).await?;
        }
        let removed = self.repo.delete(key).await?;
        self.invalidate(key);

        match SettingKey::from_str(key) {
            Ok(known) => {
                info!(%key, "System configuration reset to default");
                Ok(known_view(known, None))
            },
            Err(_) if removed => {
                info!(%key, "Custom system configuration removed");
                Ok(SettingView {
                    key: key.to_owned(),
                    value: String::new(),
                    description: None,
                    default_value: None,
                    is_default: false,
                    updated_at: None,
                    updated_by: None,
                })
            },
            Err(_) => Err(not_found(key)),
        }
    }

    /// `MIN_*` <= `MAX_*` must still hold once `key` takes `value`.
    async fn check_bounds(&self, key: SettingKey, value: i64) -> Result<(), SettingsError> {
        let mut current = Vec::new();
        for other in SettingKey::iter() {
            current.push((other, self.limit(other).await?));
        }
        ensure_bounds(key, value, |other| {
            current.iter().find(|(k, _)| *k == other).map_or(other.default_value(), |(_, v)| *v)
        })
    }

    fn invalidate(&self, key: &str) {
        if let Ok(known) = SettingKey::from_str(key) {
            self.cache.invalidate(&known);
        }
    }
}

fn known_view(key: SettingKey, record: Option<SettingRecord>) -> SettingView {
    let default_value = key.default_value().to_string();
    match record {
        Some(record) => SettingView {
            key: record.key,
            value: record.value,
            description: record.description.or_else(|| Some(key.description().to_owned())),
            default_value: Some(default_value),
            is_default: false,
            updated_at: Some(record.updated_at),
            updated_by: record.updated_by,
        },
        None => SettingView {
            key: key.as_ref().to_owned(),
            value: default_value.clone(),
            description: Some(key.description().to_owned()),
            default_value: Some(default_value),
            is_default: true,
            updated_at: None,
            updated_by: None,
        },
    }
}

fn custom_view(record: SettingRecord) -> SettingView {
    SettingView {
        key: record.key,
        value: record.value,
        description: record.description,
        default_value: None,
        is_default: false,
        updated_at: Some(record.updated_at),
        updated_by: record.updated_by,
    }
}

fn not_found(key: &str) -> SettingsError {
    SettingsError::NotFound { message: NOT_FOUND.into(), context: Some(key.to_owned().into()) }
}
