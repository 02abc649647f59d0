//! Configuration for the session module.

use serde::Deserialize;
use thiserror::Error;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Path the location is rewritten to after a redirect token is adopted.
    /// A bare absolute path: no query, no fragment.
    pub post_login_path: String,

    /// Query parameter carrying the redirect token.
    pub redirect_token_param: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            post_login_path: "/dashboard".to_owned(),
            redirect_token_param: "token".to_owned(),
        }
    }
}

/// A configuration value the session module cannot work with.
#[derive(Debug, Error)]
#[error("invalid session config: {0}")]
pub struct ConfigError(String);

impl SessionConfig {
    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `post_login_path` is not a bare absolute
    /// path or `redirect_token_param` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.post_login_path;
        if !path.starts_with('/') || path.contains(['?', '#']) {
            return Err(ConfigError(format!(
                "post_login_path must be a bare absolute path, got '{path}'"
            )));
        }
        if self.redirect_token_param.is_empty() {
            return Err(ConfigError("redirect_token_param must not be empty".to_owned()));
        }
        Ok(())
    }
}
