//! The synchronization pipeline: fetch → normalize → enrich → reconcile.
//!
//! - [`enrich::EnrichmentOrchestrator`] — batched fan-out to the provider's
//!   category endpoints with per-request failure isolation.
//! - [`reconcile::Reconciler`] — identity resolution and upsert into the
//!   canonical store.
//! - [`pipeline::SyncPipeline`] — run orchestration and accounting against
//!   the append-only run log.

pub mod config;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use error::SyncError;
