use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `THESIS__DATABASE__URL`.
pub const ENV_PREFIX: &str = "THESIS";
/// Base file name looked up when no path is given (`server.toml`, `server.yaml`, ...).
pub const DEFAULT_CONFIG: &str = "server";

#[thesis_derive::thesis_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a base file overlaid with `THESIS__*` environment variables.
///
/// Nested keys use a double underscore: `THESIS__SECURITY__JWT__SECRET`
/// maps to `security.jwt.secret`. The base file is optional; every section
/// of the API config has defaults.
///
/// # Example
/// ```rust
/// use thesis_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ApiConfig;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg: ApiConfig = load_config(Some("does/not/exist")).unwrap();
        assert_eq!(cfg.server.port, 4583);
        assert_eq!(cfg.database.url, "mem://");
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 9100\n\n[security.jwt]\nissuer = \"uni\"").unwrap();

        let cfg: ApiConfig = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.security.jwt.issuer, "uni");
        assert_eq!(cfg.security.jwt.ttl_seconds, 3600);
    }

    #[test]
    fn malformed_values_are_reported() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = \"not-a-port\"").unwrap();

        let err = load_config::<ApiConfig>(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize config"));
    }
}
