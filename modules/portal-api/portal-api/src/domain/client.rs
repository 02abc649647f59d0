//! `reqwest`-backed implementation of [`PortalApiClient`].

use async_trait::async_trait;
use portal_api_sdk::{ApiError, LoginCredentials, PortalApiClient, RegisterData, User};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::config::ApiClientConfig;

const LOGIN_PATH: &str = "auth/login";
const REGISTER_PATH: &str = "auth/register";
const TEST_AUTH_PATH: &str = "auth/testing";
const ROOT_PATH: &str = "";

/// Portal backend client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpPortalClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpPortalClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be initialized
    /// (for example when no TLS backend is available).
    pub fn new(cfg: &ApiClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(cfg.base_url.clone(), http))
    }

    /// Build a client around an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(mut base_url: Url, http: reqwest::Client) -> Self {
        // `Url::join` replaces the last segment unless the path ends in `/`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::transport(format!("invalid endpoint '{path}': {e}")))
    }

    async fn send(op: &str, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        request.send().await.map_err(|e| {
            tracing::error!(operation = op, error = %e, "portal API request failed");
            ApiError::transport(e.to_string())
        })
    }

    async fn body_text(op: &str, response: Response) -> Result<String, ApiError> {
        response.text().await.map_err(|e| {
            tracing::error!(operation = op, error = %e, "failed to read portal API response");
            ApiError::transport(e.to_string())
        })
    }
}

fn log_and_reject(op: &str, status: StatusCode, e: ApiError) -> ApiError {
    tracing::warn!(operation = op, status = status.as_u16(), error = %e, "portal API call rejected");
    e
}

#[async_trait]
impl PortalApiClient for HttpPortalClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SecretString, ApiError> {
        let url = self.endpoint(LOGIN_PATH)?;
        let response = Self::send("login", self.http.post(url).json(credentials)).await?;

        let status = response.status();
        if !status.is_success() {
            let e = if status == StatusCode::UNAUTHORIZED {
                ApiError::invalid_credentials()
            } else {
                ApiError::login_failed(status.as_u16())
            };
            return Err(log_and_reject("login", status, e));
        }

        // The backend answers with the raw token, not a JSON envelope.
        let body = Self::body_text("login", response).await?;
        let token = body.trim();
        if token.is_empty() {
            return Err(log_and_reject("login", status, ApiError::empty_token()));
        }

        debug!(email = %credentials.email, "login accepted");
        Ok(SecretString::from(token.to_owned()))
    }

    async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        data.validate()?;

        let url = self.endpoint(REGISTER_PATH)?;
        let response = Self::send("register", self.http.post(url).json(data)).await?;

        let status = response.status();
        if !status.is_success() {
            let e = if status == StatusCode::CONFLICT {
                ApiError::email_taken()
            } else {
                ApiError::registration_failed(status.as_u16())
            };
            return Err(log_and_reject("register", status, e));
        }

        let body = Self::body_text("register", response).await?;
        let user: User = serde_json::from_str(&body).map_err(|e| {
            log_and_reject(
                "register",
                status,
                ApiError::invalid_response(
                    status.as_u16(),
                    format!("Malformed user record received from server: {e}"),
                ),
            )
        })?;

        debug!(user_id = user.id, "registration accepted");
        Ok(user)
    }

    async fn test_auth(&self, token: Option<&SecretString>) -> Result<String, ApiError> {
        let url = self.endpoint(TEST_AUTH_PATH)?;
        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        let response = Self::send("test_auth", request).await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(log_and_reject("test_auth", status, ApiError::unauthorized()));
        }
        if !status.is_success() {
            return Err(log_and_reject(
                "test_auth",
                status,
                ApiError::auth_test_failed(status.as_u16()),
            ));
        }

        Self::body_text("test_auth", response).await
    }

    async fn get_hello(&self) -> Result<String, ApiError> {
        let url = self.endpoint(ROOT_PATH)?;
        let response = Self::send("get_hello", self.http.get(url)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(log_and_reject(
                "get_hello",
                status,
                ApiError::request_failed(status.as_u16()),
            ));
        }

        Self::body_text("get_hello", response).await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpPortalClient {
        HttpPortalClient::with_client(Url::parse(base).unwrap(), reqwest::Client::new())
    }

    #[test]
    fn endpoints_resolve_against_base_without_trailing_slash() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint(LOGIN_PATH).unwrap().as_str(),
            "http://localhost:8080/auth/login"
        );
        assert_eq!(c.endpoint(ROOT_PATH).unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let c = client("https://portal.example/api");
        assert_eq!(c.base_url().as_str(), "https://portal.example/api/");
        assert_eq!(
            c.endpoint(TEST_AUTH_PATH).unwrap().as_str(),
            "https://portal.example/api/auth/testing"
        );
    }
}
