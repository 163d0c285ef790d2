//! Repository for the `aircraft_images` table.

use sqlx::PgPool;

use fleetiq_core::types::DbId;

use crate::models::aircraft_image::{AircraftImage, NewAircraftImage};

const COLUMNS: &str =
    "id, aircraft_id, url, caption, position, is_hero, source, created_at, updated_at";

/// Provides gallery reads and whole-gallery replacement for aircraft images.
pub struct AircraftImageRepo;

impl AircraftImageRepo {
    /// Replace the full image gallery for an aircraft.
    ///
    /// Runs in a transaction: the old gallery is deleted and the new
    /// entries inserted in order, with the first entry marked as hero.
    /// Each sync produces the gallery wholesale, so a replace keeps
    /// ordering and hero selection consistent without diffing.
    pub async fn replace_for_aircraft(
        pool: &PgPool,
        aircraft_id: DbId,
        images: &[NewAircraftImage],
    ) -> Result<Vec<AircraftImage>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM aircraft_images WHERE aircraft_id = $1")
            .bind(aircraft_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO aircraft_images
                (aircraft_id, url, caption, position, is_hero, source)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(images.len());
        for (position, image) in images.iter().enumerate() {
            let row = sqlx::query_as::<_, AircraftImage>(&query)
                .bind(aircraft_id)
                .bind(&image.url)
                .bind(&image.caption)
                .bind(position as i32)
                .bind(position == 0)
                .bind(&image.source)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// List the gallery for an aircraft in display order.
    pub async fn list_by_aircraft(
        pool: &PgPool,
        aircraft_id: DbId,
    ) -> Result<Vec<AircraftImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM aircraft_images
             WHERE aircraft_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, AircraftImage>(&query)
            .bind(aircraft_id)
            .fetch_all(pool)
            .await
    }
}
