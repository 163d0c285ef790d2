//! Handlers for the aircraft inventory read side.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use fleetiq_core::error::CoreError;
use fleetiq_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fleetiq_core::types::DbId;
use fleetiq_db::repositories::{AircraftImageRepo, AircraftRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /aircraft`.
#[derive(Debug, Deserialize)]
pub struct AircraftListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List aircraft, most recently synced first.
pub async fn list_aircraft(
    State(state): State<AppState>,
    Query(params): Query<AircraftListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let aircraft = AircraftRepo::list(&state.pool, limit, offset).await?;
    let total = AircraftRepo::count(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": aircraft,
        "total": total,
        "limit": limit,
        "offset": offset,
    })))
}

/// Get a single aircraft by internal ID.
pub async fn get_aircraft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let aircraft = AircraftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "aircraft",
            id,
        })?;

    Ok(Json(DataResponse { data: aircraft }))
}

/// Get the image gallery for an aircraft, in display order.
pub async fn list_aircraft_images(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // 404 for a missing aircraft rather than an empty gallery.
    AircraftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "aircraft",
            id,
        })?;

    let images = AircraftImageRepo::list_by_aircraft(&state.pool, id).await?;
    Ok(Json(DataResponse { data: images }))
}
