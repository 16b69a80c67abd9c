use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AppError;

/// Runtime configuration.
///
/// Sources, later ones winning:
/// - built-in defaults
/// - `betteh.toml` in the working directory (optional)
/// - environment variables prefixed with `BETTEH_` (e.g. `BETTEH_PORT`)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Secret the session cookie signing key is derived from.
    /// When unset a random key is used and sessions end on restart.
    #[serde(default)]
    pub session_secret: Option<String>,
    pub session_ttl_hours: i64,
    /// Bootstrap admin, consumed only while no admin exists.
    #[serde(default)]
    pub admin_username: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            session_secret: None,
            session_ttl_hours: 24,
            admin_username: None,
            admin_password: None,
            data_file: PathBuf::from("db.json"),
            upload_dir: PathBuf::from("public/uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, `betteh.toml` and the environment.
    pub fn load() -> Result<Self, AppError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("host", defaults.host)
            .and_then(|b| b.set_default("port", i64::from(defaults.port)))
            .and_then(|b| b.set_default("session_ttl_hours", defaults.session_ttl_hours))
            .and_then(|b| b.set_default("data_file", defaults.data_file.to_string_lossy().to_string()))
            .and_then(|b| b.set_default("upload_dir", defaults.upload_dir.to_string_lossy().to_string()))
            .and_then(|b| b.set_default("max_upload_bytes", defaults.max_upload_bytes as i64))
            .map_err(config_error)?
            .add_source(config::File::with_name("betteh").required(false))
            .add_source(config::Environment::with_prefix("BETTEH"))
            .build()
            .map_err(config_error)?;

        let config: Self = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.session_ttl_hours <= 0 {
            return Err(AppError::Internal(
                "session_ttl_hours must be positive".into(),
            ));
        }
        if self.admin_username.is_some() != self.admin_password.is_some() {
            tracing::warn!(
                "Only one of admin_username/admin_password is set; bootstrap admin will be skipped"
            );
        }
        Ok(())
    }

    /// Bootstrap credentials, if both halves are configured and non-empty.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_error(err: config::ConfigError) -> AppError {
    AppError::Internal(format!("Configuration error: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.data_file, PathBuf::from("db.json"));
        assert!(config.bootstrap_admin().is_none());
    }

    #[test]
    fn test_bootstrap_requires_both_halves() {
        let mut config = AppConfig {
            admin_username: Some("betteh".into()),
            ..AppConfig::default()
        };
        assert!(config.bootstrap_admin().is_none());

        config.admin_password = Some(String::new());
        assert!(config.bootstrap_admin().is_none());

        config.admin_password = Some("Secret1".into());
        assert_eq!(config.bootstrap_admin(), Some(("betteh", "Secret1")));
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let config = AppConfig {
            session_ttl_hours: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
