//! Configuration for the portal API client.

use serde::Deserialize;
use url::Url;

/// Backend address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiClientConfig {
    /// Base URL of the portal backend. A path prefix is allowed.
    pub base_url: Url,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: concat!("chess-portal/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

#[allow(clippy::expect_used)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
