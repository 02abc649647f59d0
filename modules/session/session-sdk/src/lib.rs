//! Session SDK
//!
//! This crate provides the public contracts for the `session` module:
//!
//! - [`SessionStorage`] - Durable key-value storage the session is persisted to
//! - [`Location`] - The navigable location an OAuth redirect lands on
//! - [`SessionState`] / [`AuthUser`] - Read state exposed to front ends
//! - [`TokenClaims`] - Claims decoded from a bearer token's payload segment
//! - [`StorageError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use session_sdk::{SessionStorage, keys};
//!
//! let token = storage.get(keys::TOKEN)?;
//! ```

pub mod error;
pub mod location;
pub mod models;
pub mod storage;

pub use error::StorageError;
pub use location::{Location, UrlLocation};
pub use models::{AuthUser, SessionState, TokenClaims};
pub use storage::{SessionStorage, keys};
