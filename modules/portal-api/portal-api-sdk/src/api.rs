//! Public API trait for the portal backend.
//!
//! Implementations are stateless: they never read or mutate session state.
//! Authenticated calls receive their bearer token explicitly.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::ApiError;
use crate::models::{LoginCredentials, RegisterData, User};

/// Client for the portal backend.
///
/// ```ignore
/// let token = api.login(&LoginCredentials::new(email, password)).await?;
/// let greeting = api.test_auth(Some(&token)).await?;
/// ```
#[async_trait]
pub trait PortalApiClient: Send + Sync {
    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// - Status 401 "Invalid email or password" on rejected credentials
    /// - Status `n` "Login failed" on any other non-success status
    /// - `InvalidResponse` 500 when the backend returns an empty token
    /// - `Transport` when no response was received
    async fn login(&self, credentials: &LoginCredentials) -> Result<SecretString, ApiError>;

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `Validation` when `data` violates the account constraints
    /// - Status 409 "Email already registered" on conflict
    /// - Status `n` "Registration failed" on any other non-success status
    /// - `InvalidResponse` when the user record cannot be decoded
    /// - `Transport` when no response was received
    async fn register(&self, data: &RegisterData) -> Result<User, ApiError>;

    /// Call the authenticated test endpoint, returning its body.
    ///
    /// The bearer header is attached only when `token` is `Some`.
    ///
    /// # Errors
    ///
    /// - Status 401 "Unauthorized" when the token is rejected
    /// - Status `n` "Authentication test failed" on any other non-success status
    /// - `Transport` when no response was received
    async fn test_auth(&self, token: Option<&SecretString>) -> Result<String, ApiError>;

    /// Unauthenticated greeting from the service root.
    ///
    /// # Errors
    ///
    /// - Status `n` "Request failed" on a non-success status
    /// - `Transport` when no response was received
    async fn get_hello(&self) -> Result<String, ApiError>;
}
