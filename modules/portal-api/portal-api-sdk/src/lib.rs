//! Portal API SDK
//!
//! This crate provides the public API for talking to the portal backend:
//!
//! - [`PortalApiClient`] - Client trait for the login, register, auth-test
//!   and hello endpoints
//! - [`LoginCredentials`], [`RegisterData`], [`User`] - Request and response models
//! - [`ApiError`] - Error type carrying the HTTP status and a user-facing message
//!
//! ## Usage
//!
//! ```ignore
//! use portal_api_sdk::{ApiError, LoginCredentials, PortalApiClient};
//!
//! match api.login(&LoginCredentials::new(email, password)).await {
//!     Ok(token) => store.login(token, email),
//!     Err(e) if e.status() == Some(401) => eprintln!("{e}"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::PortalApiClient;
pub use error::ApiError;
pub use models::{LoginCredentials, RegisterData, User};
