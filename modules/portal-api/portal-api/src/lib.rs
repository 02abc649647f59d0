//! Portal API client
//!
//! [`HttpPortalClient`] implements [`portal_api_sdk::PortalApiClient`] over
//! `reqwest`. It holds no session state: authenticated calls take their
//! bearer token as an argument.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::ApiClientConfig;
pub use domain::HttpPortalClient;
