//! Handlers for sync run triggering and the run log read side.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use fleetiq_core::error::CoreError;
use fleetiq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fleetiq_core::sync_run::{SyncRunStatus, SyncType};
use fleetiq_core::types::DbId;
use fleetiq_db::repositories::SyncRunRepo;
use fleetiq_sync::pipeline::{SyncOptions, SyncReport};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /sync/runs
// ---------------------------------------------------------------------------

/// Request body for triggering a run. Both fields optional.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerRunRequest {
    /// `full` (default) or `listings_only`.
    pub sync_type: Option<String>,
    pub force_refresh: Option<bool>,
}

/// Response payload mirroring the run's terminal state.
#[derive(Debug, Serialize)]
pub struct TriggerRunResponse {
    pub run_id: DbId,
    pub sync_type: SyncType,
    pub status: SyncRunStatus,
    pub records_processed: i32,
    pub records_created: i32,
    pub records_updated: i32,
    pub records_errored: i32,
    pub enrichment_errors: i32,
    pub duration_ms: Option<i64>,
    pub error_message: Option<String>,
}

impl From<SyncReport> for TriggerRunResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            run_id: report.run_id,
            sync_type: report.sync_type,
            status: report.status,
            records_processed: report.counters.processed,
            records_created: report.counters.created,
            records_updated: report.counters.updated,
            records_errored: report.counters.errors,
            enrichment_errors: report.counters.enrichment_errors,
            duration_ms: report.duration_ms,
            error_message: report.error_message,
        }
    }
}

/// Trigger a sync run and wait for it to finish.
///
/// Responds 409 when any run is already active, whatever its type.
/// A run that ends `failed` still responds 200 — the failure is recorded
/// in the run log and reflected in the payload, not an HTTP error.
pub async fn trigger_run(
    State(state): State<AppState>,
    body: Option<Json<TriggerRunRequest>>,
) -> AppResult<impl IntoResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let sync_type = match request.sync_type.as_deref() {
        None => SyncType::Full,
        Some(s) => SyncType::from_str(s).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown sync_type '{s}'; expected one of: {}",
                SyncType::ALL.join(", ")
            ))
        })?,
    };
    let options = SyncOptions {
        force_refresh: request.force_refresh.unwrap_or(false),
    };

    tracing::info!(sync_type = %sync_type, force_refresh = options.force_refresh, "Sync run requested");

    let report = state
        .pipeline
        .run(sync_type, options, &state.shutdown)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TriggerRunResponse::from(report),
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /sync/runs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /sync/runs`.
#[derive(Debug, Deserialize)]
pub struct RunListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List recent sync runs, newest first.
pub async fn list_runs(
    State(state): State<AppState>,
    Query(params): Query<RunListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let runs = SyncRunRepo::list_recent(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: runs }))
}

// ---------------------------------------------------------------------------
// GET /sync/runs/:id
// ---------------------------------------------------------------------------

/// Get a single sync run by ID.
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let run = SyncRunRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "sync_run",
            id,
        })?;

    Ok(Json(DataResponse { data: run }))
}
