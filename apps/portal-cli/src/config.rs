//! Application configuration.
//!
//! Layers, later ones winning:
//! 1. Built-in defaults
//! 2. Optional YAML file (`--config` / `PORTAL_CONFIG`)
//! 3. `PORTAL_`-prefixed environment variables, `__` separating nested keys
//!    (`PORTAL_SESSION__POST_LOGIN_PATH=/home`)
//! 4. `PORTAL_API_URL` for the backend base URL

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use portal_api::ApiClientConfig;
use serde::Deserialize;
use session::SessionConfig;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "PORTAL_API_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api: ApiClientConfig,
    pub session: SessionConfig,
    /// Session file. Defaults to the platform data directory.
    pub storage_path: Option<PathBuf>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Load configuration from the optional file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`figment::Error`] if a source cannot be read, a value does
    /// not fit the schema, or the session settings are unusable.
    pub fn load(file: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        let mut figment = Figment::new();
        if let Some(file) = file {
            figment = figment.merge(Yaml::file_exact(file));
        }
        let cfg: Self = figment
            .merge(
                Env::prefixed("PORTAL_")
                    .ignore(&["API_URL", "CONFIG", "PASSWORD"])
                    .split("__"),
            )
            .merge(Env::raw().only(&[API_URL_ENV]).map(|_| "api.base_url".into()))
            .extract()
            .map_err(Box::new)?;
        cfg.session
            .validate()
            .map_err(|e| Box::new(figment::Error::from(e.to_string())))?;
        Ok(cfg)
    }

    /// Session file location.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            dirs::data_dir().map_or_else(
                || PathBuf::from(".chess-portal-session.json"),
                |dir| dir.join("chess-portal").join("session.json"),
            )
        })
    }
}
