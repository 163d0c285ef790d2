pub mod aircraft;
pub mod health;
pub mod sync;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sync/runs                 trigger (POST), list (GET)
/// /sync/runs/{id}            get
///
/// /aircraft                  list
/// /aircraft/{id}             get
/// /aircraft/{id}/images      gallery
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sync", sync::router())
        .nest("/aircraft", aircraft::router())
}
