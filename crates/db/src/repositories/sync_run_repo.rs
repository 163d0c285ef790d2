//! Repository for the append-only `sync_runs` table.

use sqlx::PgPool;

use fleetiq_core::sync_run::{RunCounters, SyncRunStatus, SyncType};
use fleetiq_core::types::DbId;

use crate::models::sync_run::SyncRun;

const COLUMNS: &str = "id, sync_type, status, \
    records_processed, records_created, records_updated, records_errored, \
    enrichment_errors, error_message, \
    started_at, completed_at, duration_ms, created_at, updated_at";

/// Provides run-log writes for the pipeline and reads for the API.
pub struct SyncRunRepo;

impl SyncRunRepo {
    /// Open a new run row in the `started` state.
    pub async fn start(pool: &PgPool, sync_type: SyncType) -> Result<SyncRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO sync_runs (sync_type)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(sync_type.as_str())
            .fetch_one(pool)
            .await
    }

    /// Perform the single terminal transition for a run.
    ///
    /// Counts and duration are written here and nowhere else. The
    /// `status = 'started'` guard makes the transition exactly-once: a
    /// second call (or a racing caller) matches no row and gets `None`.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        status: SyncRunStatus,
        counters: RunCounters,
        error_message: Option<&str>,
    ) -> Result<Option<SyncRun>, sqlx::Error> {
        let query = format!(
            "UPDATE sync_runs SET
                status = $2,
                records_processed = $3,
                records_created = $4,
                records_updated = $5,
                records_errored = $6,
                enrichment_errors = $7,
                error_message = $8,
                completed_at = now(),
                duration_ms = (EXTRACT(EPOCH FROM (now() - started_at)) * 1000)::BIGINT
             WHERE id = $1 AND status = 'started'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(counters.processed)
            .bind(counters.created)
            .bind(counters.updated)
            .bind(counters.errors)
            .bind(counters.enrichment_errors)
            .bind(error_message)
            .fetch_optional(pool)
            .await
    }

    /// Find a run by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SyncRun>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sync_runs WHERE id = $1");
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List recent runs, newest first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SyncRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sync_runs
             ORDER BY started_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, SyncRun>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
