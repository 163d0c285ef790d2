//! Identity-based reconciliation of canonical records against the store.
//!
//! Each incoming record is matched against stored rows by its identity
//! keys in priority order: provider aircraft ID, then registration, then
//! serial number. The first present key that matches wins; two present
//! keys matching two *different* rows is a conflict that surfaces as a
//! record-level error, never a silent pick.

use sqlx::PgPool;

use fleetiq_core::enrichment::EnrichmentBundle;
use fleetiq_core::normalize::CanonicalAircraft;
use fleetiq_core::types::DbId;
use fleetiq_db::models::aircraft::{Aircraft, WriteAircraft};
use fleetiq_db::models::aircraft_image::NewAircraftImage;
use fleetiq_db::repositories::{AircraftImageRepo, AircraftRepo};

use crate::enrich::{blobs_from_bundle, build_gallery};
use crate::error::SyncError;

/// What the upsert did with one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created(DbId),
    Updated(DbId),
    /// The stored row already matched the incoming data; only
    /// `last_synced_at` was refreshed.
    Unchanged(DbId),
}

/// Performs create-or-update for canonical records.
pub struct Reconciler;

impl Reconciler {
    /// Upsert one canonical record, merging enrichment data when present.
    ///
    /// Without `force_refresh`, a record whose raw payload is identical to
    /// the stored one is left alone (apart from the sync stamp) so a
    /// repeat run against identical provider data reports zero updates.
    pub async fn upsert(
        pool: &PgPool,
        canonical: &CanonicalAircraft,
        bundle: Option<&EnrichmentBundle>,
        force_refresh: bool,
    ) -> Result<ReconcileOutcome, SyncError> {
        let existing = resolve_identity(pool, canonical).await?;

        let mut write = WriteAircraft::from_canonical(canonical);
        if let Some(bundle) = bundle {
            let (specifications, features, market_data) = blobs_from_bundle(bundle);
            write.specifications = specifications;
            write.features = features;
            write.market_data = market_data;
        }

        match existing {
            None => {
                let created = AircraftRepo::create(pool, &write).await?;
                let gallery = gallery_for(bundle, canonical);
                AircraftImageRepo::replace_for_aircraft(pool, created.id, &gallery).await?;
                Ok(ReconcileOutcome::Created(created.id))
            }
            Some(row) if row.raw_data == canonical.raw_data && !force_refresh => {
                AircraftRepo::touch_synced(pool, row.id).await?;
                Ok(ReconcileOutcome::Unchanged(row.id))
            }
            Some(row) => {
                let updated = AircraftRepo::update_synced(pool, row.id, &write)
                    .await?
                    .ok_or(SyncError::Persistence(sqlx::Error::RowNotFound))?;
                let gallery = gallery_for(bundle, canonical);
                AircraftImageRepo::replace_for_aircraft(pool, updated.id, &gallery).await?;
                Ok(ReconcileOutcome::Updated(updated.id))
            }
        }
    }
}

fn gallery_for(
    bundle: Option<&EnrichmentBundle>,
    canonical: &CanonicalAircraft,
) -> Vec<NewAircraftImage> {
    match bundle {
        Some(b) => build_gallery(b, &canonical.raw_data),
        None => build_gallery(&EnrichmentBundle::default(), &canonical.raw_data),
    }
}

/// Resolve which stored row, if any, this record belongs to.
///
/// All present identity keys are checked so divergence is detected rather
/// than masked by priority order.
async fn resolve_identity(
    pool: &PgPool,
    canonical: &CanonicalAircraft,
) -> Result<Option<Aircraft>, SyncError> {
    let mut matched: Option<(&'static str, String, Aircraft)> = None;

    for (key, value, row) in identity_lookups(pool, canonical).await? {
        match &matched {
            None => matched = Some((key, value, row)),
            Some((first_key, first_value, first_row)) if first_row.id != row.id => {
                return Err(SyncError::IdentityConflict {
                    first_key,
                    first_value: first_value.clone(),
                    first_id: first_row.id,
                    second_key: key,
                    second_value: value,
                    second_id: row.id,
                });
            }
            Some(_) => {}
        }
    }

    Ok(matched.map(|(_, _, row)| row))
}

/// Run the per-key lookups in priority order, keeping only the hits.
async fn identity_lookups(
    pool: &PgPool,
    canonical: &CanonicalAircraft,
) -> Result<Vec<(&'static str, String, Aircraft)>, SyncError> {
    let mut hits = Vec::new();

    if let Some(id) = canonical.provider_aircraft_id.as_deref() {
        if let Some(row) = AircraftRepo::find_by_provider_id(pool, id).await? {
            hits.push(("provider_aircraft_id", id.to_string(), row));
        }
    }
    if let Some(reg) = canonical.registration.as_deref() {
        if let Some(row) = AircraftRepo::find_by_registration(pool, reg).await? {
            hits.push(("registration", reg.to_string(), row));
        }
    }
    if let Some(serial) = canonical.serial_number.as_deref() {
        if let Some(row) = AircraftRepo::find_by_serial_number(pool, serial).await? {
            hits.push(("serial_number", serial.to_string(), row));
        }
    }

    Ok(hits)
}
