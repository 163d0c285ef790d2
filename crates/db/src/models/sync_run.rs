//! Sync run log model.

use serde::Serialize;
use sqlx::FromRow;

use fleetiq_core::types::{DbId, Timestamp};

/// A row from the append-only `sync_runs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SyncRun {
    pub id: DbId,
    pub sync_type: String,
    pub status: String,
    pub records_processed: i32,
    pub records_created: i32,
    pub records_updated: i32,
    pub records_errored: i32,
    pub enrichment_errors: i32,
    pub error_message: Option<String>,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
