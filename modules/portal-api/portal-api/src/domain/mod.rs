//! Domain layer for the portal API client.

pub mod client;

pub use client::HttpPortalClient;
