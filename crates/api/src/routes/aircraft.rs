//! Route definitions for the `/aircraft` resource (read side).

use axum::routing::get;
use axum::Router;

use crate::handlers::aircraft;
use crate::state::AppState;

/// Routes mounted at `/aircraft`.
///
/// ```text
/// GET    /              -> list_aircraft
/// GET    /{id}          -> get_aircraft
/// GET    /{id}/images   -> list_aircraft_images
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(aircraft::list_aircraft))
        .route("/{id}", get(aircraft::get_aircraft))
        .route("/{id}/images", get(aircraft::list_aircraft_images))
}
