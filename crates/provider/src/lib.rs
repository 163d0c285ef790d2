//! HTTP client for the aviation data provider.
//!
//! Three layers, leaf-first:
//!
//! - [`api::ProviderApi`] — thin [`reqwest`] wrapper over the provider's
//!   endpoints (login, paged bulk export, eleven category sub-resources,
//!   images).
//! - [`auth::AuthManager`] — cached credential session with single-flight
//!   refresh; every outbound call goes through it.
//! - [`bulk::BulkFetcher`] — safety-bounded paginated retrieval of the
//!   full aircraft export.

pub mod api;
pub mod auth;
pub mod bulk;
pub mod config;
pub mod error;

pub use error::ProviderError;
