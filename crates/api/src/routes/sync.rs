//! Route definitions for the `/sync` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::sync;
use crate::state::AppState;

/// Routes mounted at `/sync`.
///
/// ```text
/// POST   /runs          -> trigger_run
/// GET    /runs          -> list_runs
/// GET    /runs/{id}     -> get_run
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/runs", get(sync::list_runs).post(sync::trigger_run))
        .route("/runs/{id}", get(sync::get_run))
}
