//! Aircraft image gallery model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fleetiq_core::types::{DbId, Timestamp};

/// Where an image record came from.
pub const IMAGE_SOURCE_PROVIDER: &str = "provider";
pub const IMAGE_SOURCE_LISTING: &str = "listing";
pub const IMAGE_SOURCE_PLACEHOLDER: &str = "placeholder";

/// A row from the `aircraft_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AircraftImage {
    pub id: DbId,
    pub aircraft_id: DbId,
    pub url: String,
    pub caption: Option<String>,
    pub position: i32,
    pub is_hero: bool,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for one image entry in a gallery replacement.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAircraftImage {
    pub url: String,
    pub caption: Option<String>,
    pub source: String,
}
