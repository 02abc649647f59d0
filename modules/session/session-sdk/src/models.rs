//! Domain models for the session module.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Identity of the authenticated user as shown to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
}

/// Read state of the session.
///
/// `token` is a [`SecretString`] so `Debug` output never leaks it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub token: Option<SecretString>,
    pub user: Option<AuthUser>,
    /// `true` until start-up restoration has settled.
    pub is_loading: bool,
}

impl SessionState {
    /// Authenticated iff both a token and a user are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.email.as_str())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true,
        }
    }
}

/// Claims read from a bearer token's payload segment.
///
/// Only the fields the client acts on are modelled; everything else in the
/// payload is ignored. A field of an unexpected JSON type reads as absent
/// rather than failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry in seconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient")]
    pub exp: Option<serde_json::Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub preferred_username: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sub: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl TokenClaims {
    /// Display email derived from the identity hints.
    ///
    /// Checks `email`, then `preferred_username`, then `sub`; empty values
    /// are skipped.
    #[must_use]
    pub fn display_email(&self) -> Option<&str> {
        [&self.email, &self.preferred_username, &self.sub]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|hint| !hint.is_empty())
    }
}
