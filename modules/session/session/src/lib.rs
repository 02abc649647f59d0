//! Session Module
//!
//! Single source of truth for the authenticated identity of a portal client.
//! The [`SessionStore`] restores a persisted session at start-up, adopts
//! tokens delivered by an OAuth redirect, and exposes `login` / `logout`.
//!
//! The store never returns errors: malformed or expired tokens resolve to a
//! logged-out state and storage failures are logged.
//!
//! ```ignore
//! let store = SessionStore::new(storage, Arc::new(SystemClock), SessionConfig::default());
//! store.initialize(&mut location);
//! if store.is_authenticated() { /* ... */ }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::{ConfigError, SessionConfig};
pub use domain::{
    Clock, FileStorage, FixedClock, InMemoryStorage, SessionStore, SystemClock, token,
};
