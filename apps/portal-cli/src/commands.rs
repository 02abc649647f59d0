//! Command handlers.
//!
//! Handlers wire the session store to the API client. The client never sees
//! the store; tokens flow through explicitly.

use std::io::BufRead;

use anyhow::Context as _;
use portal_api_sdk::{ApiError, LoginCredentials, PortalApiClient, RegisterData, User};
use secrecy::SecretString;
use session::SessionStore;
use session_sdk::{Location, SessionState};
use tracing::info;

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "PORTAL_PASSWORD";

/// Password from [`PASSWORD_ENV`], else the first line of `input`.
///
/// # Errors
///
/// Fails if `input` cannot be read or no non-empty password is found.
pub fn read_password(input: &mut dyn BufRead) -> anyhow::Result<SecretString> {
    if let Some(password) = std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty()) {
        return Ok(SecretString::from(password));
    }

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    anyhow::ensure!(
        !password.is_empty(),
        "no password given: set {PASSWORD_ENV} or pipe it on stdin"
    );
    Ok(SecretString::from(password.to_owned()))
}

/// Log in with credentials and persist the returned token.
///
/// # Errors
///
/// Returns the [`ApiError`] from the backend; the session is left untouched.
pub async fn login(
    store: &SessionStore,
    api: &dyn PortalApiClient,
    email: &str,
    password: SecretString,
) -> Result<(), ApiError> {
    let token = api
        .login(&LoginCredentials {
            email: email.to_owned(),
            password,
        })
        .await?;
    store.login(token, email);
    Ok(())
}

/// Create an account. Does not log in.
///
/// # Errors
///
/// Returns the [`ApiError`] from validation or the backend.
pub async fn register(
    api: &dyn PortalApiClient,
    name: &str,
    email: &str,
    password: SecretString,
) -> Result<User, ApiError> {
    let user = api
        .register(&RegisterData {
            name: name.to_owned(),
            email: email.to_owned(),
            password,
        })
        .await?;
    info!(user_id = user.id, "Account created");
    Ok(user)
}

/// Verify the persisted token against the backend.
///
/// The token is read from durable storage at call time. A 401 clears the
/// persisted session before the error is returned.
///
/// # Errors
///
/// Returns the [`ApiError`] from the backend.
pub async fn test_auth(store: &SessionStore, api: &dyn PortalApiClient) -> Result<String, ApiError> {
    let token = store.stored_token();
    match api.test_auth(token.as_ref()).await {
        Err(e) if e.is_unauthorized() => {
            info!("Backend rejected the stored token, clearing session");
            store.logout();
            Err(e)
        }
        other => other,
    }
}

/// Adopt a redirect token from `location`, returning the rewritten location.
#[must_use]
pub fn capture_redirect<L: Location>(store: &SessionStore, mut location: L) -> L {
    store.initialize(&mut location);
    location
}

/// One-line description of the session for `status`.
#[must_use]
pub fn describe(state: &SessionState) -> String {
    match state.email() {
        Some(email) if state.is_authenticated() => format!("Logged in as {email}"),
        _ => "Not logged in".to_owned(),
    }
}
