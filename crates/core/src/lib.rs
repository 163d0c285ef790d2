//! Pure domain logic for the fleetiq aircraft inventory platform.
//!
//! This crate has zero I/O and zero async. It holds the canonical aircraft
//! shape, the raw-to-canonical normalization rules, enrichment category
//! definitions and summary math, and the sync run state machine — everything
//! the persistence and pipeline layers agree on.

pub mod coerce;
pub mod enrichment;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod sync_run;
pub mod types;
