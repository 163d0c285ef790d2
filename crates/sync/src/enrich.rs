//! Batched enrichment fan-out with per-request failure isolation.
//!
//! For each aircraft, the eleven category endpoints and the images endpoint
//! are fetched concurrently; aircraft are processed in fixed-size batches
//! with a pacing delay between batches, so at most `batch_size × 12`
//! requests are in flight at once. A failed request marks its category
//! absent and bumps a counter — it never aborts sibling requests or
//! sibling aircraft.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use fleetiq_core::coerce::to_str;
use fleetiq_core::enrichment::{technical_summary, EnrichmentBundle, CATEGORIES};
use fleetiq_db::models::aircraft_image::{
    NewAircraftImage, IMAGE_SOURCE_LISTING, IMAGE_SOURCE_PLACEHOLDER, IMAGE_SOURCE_PROVIDER,
};
use fleetiq_provider::api::ProviderApi;
use fleetiq_provider::auth::AuthManager;

use crate::config::SyncConfig;
use crate::error::SyncError;

/// Shown when neither the provider nor the listing supplied any image.
pub const PLACEHOLDER_IMAGE_URL: &str = "/images/aircraft-placeholder.svg";

/// Result of enriching a set of aircraft.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    /// Bundles keyed by provider aircraft ID.
    pub bundles: HashMap<String, EnrichmentBundle>,
    /// Individual category/image requests that failed.
    pub request_errors: u32,
}

/// Fans out to the provider's per-aircraft sub-resources.
pub struct EnrichmentOrchestrator {
    api: Arc<ProviderApi>,
    auth: Arc<AuthManager>,
    batch_size: usize,
    batch_delay: Duration,
}

impl EnrichmentOrchestrator {
    pub fn new(api: Arc<ProviderApi>, auth: Arc<AuthManager>, config: &SyncConfig) -> Self {
        Self {
            api,
            auth,
            batch_size: config.batch_size.max(1),
            batch_delay: config.batch_delay,
        }
    }

    /// Enrich every aircraft in `aircraft_ids`, batch by batch.
    ///
    /// Batches run sequentially; inside a batch every aircraft and every
    /// category is fetched concurrently. Cancellation is honored between
    /// batches, never mid-batch.
    pub async fn enrich_all(
        &self,
        aircraft_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<EnrichmentOutcome, SyncError> {
        let mut outcome = EnrichmentOutcome::default();

        for (index, batch) in aircraft_ids.chunks(self.batch_size).enumerate() {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            let results = join_all(batch.iter().map(|id| self.enrich_one(id))).await;
            for (id, (bundle, errors)) in batch.iter().zip(results) {
                tracing::debug!(
                    aircraft_id = %id,
                    categories = bundle.category_count(),
                    images = bundle.images.len(),
                    errors,
                    "Aircraft enriched"
                );
                outcome.request_errors += errors;
                outcome.bundles.insert(id.clone(), bundle);
            }
        }

        tracing::info!(
            aircraft = outcome.bundles.len(),
            request_errors = outcome.request_errors,
            "Enrichment fan-out complete"
        );
        Ok(outcome)
    }

    /// Fetch all twelve sub-resources for one aircraft concurrently.
    ///
    /// Returns the bundle plus the number of requests that failed. Every
    /// request authenticates independently through the shared session
    /// cache.
    async fn enrich_one(&self, aircraft_id: &str) -> (EnrichmentBundle, u32) {
        let categories = join_all(CATEGORIES.iter().map(|category| async move {
            let result = async {
                let session = self.auth.get_session().await?;
                self.api.fetch_category(&session, aircraft_id, category).await
            }
            .await;
            (*category, result)
        }));

        let images = async {
            let session = self.auth.get_session().await?;
            self.api.fetch_images(&session, aircraft_id).await
        };

        let (category_results, image_result) = tokio::join!(categories, images);

        let mut bundle = EnrichmentBundle::default();
        let mut errors = 0u32;

        for (category, result) in category_results {
            match result {
                Ok(Some(payload)) => {
                    bundle.categories.insert(category.to_string(), payload);
                }
                Ok(None) => {}
                Err(e) => {
                    errors += 1;
                    tracing::warn!(aircraft_id, category, error = %e, "Category fetch failed");
                }
            }
        }

        match image_result {
            Ok(images) => bundle.images = images,
            Err(e) => {
                errors += 1;
                tracing::warn!(aircraft_id, error = %e, "Image fetch failed");
            }
        }

        (bundle, errors)
    }
}

/// Split a bundle into the three jsonb blobs stored on the aircraft row.
///
/// `features` gets the features category; `market_data` gets the listing
/// status and company relationships; everything technical lands in
/// `specifications`, together with the derived summary.
///
/// All three blobs come out object-shaped — the provider's features
/// category is usually a bare array, and jsonb `||` concatenates arrays
/// instead of merging them, so a non-object payload is wrapped under a
/// `features` key before it reaches the update path.
pub fn blobs_from_bundle(bundle: &EnrichmentBundle) -> (Value, Value, Value) {
    let mut specifications = serde_json::Map::new();
    let mut market = serde_json::Map::new();

    for (category, payload) in &bundle.categories {
        match category.as_str() {
            "features" => {}
            "status" | "companyrelationships" => {
                market.insert(category.clone(), payload.clone());
            }
            _ => {
                specifications.insert(category.clone(), payload.clone());
            }
        }
    }
    specifications.insert(
        "summary".into(),
        serde_json::to_value(technical_summary(bundle)).unwrap_or(Value::Null),
    );

    let features = match bundle.get("features") {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        Some(other) => json!({ "features": other.clone() }),
        None => json!({}),
    };

    (Value::Object(specifications), features, Value::Object(market))
}

/// Build the image gallery for one aircraft.
///
/// Provider images win; when the provider has none, photo references
/// embedded in the raw listing record are used; when those are absent too,
/// a single placeholder entry is synthesized so the gallery is never
/// empty.
pub fn build_gallery(bundle: &EnrichmentBundle, raw: &Value) -> Vec<NewAircraftImage> {
    let provider: Vec<NewAircraftImage> = bundle
        .images
        .iter()
        .filter_map(|entry| image_from_entry(entry, IMAGE_SOURCE_PROVIDER))
        .collect();
    if !provider.is_empty() {
        return provider;
    }

    let listing = listing_photos(raw);
    if !listing.is_empty() {
        return listing;
    }

    vec![NewAircraftImage {
        url: PLACEHOLDER_IMAGE_URL.to_string(),
        caption: None,
        source: IMAGE_SOURCE_PLACEHOLDER.to_string(),
    }]
}

/// One image entry from an images-endpoint or listing payload: either a
/// bare URL string or an object carrying one.
fn image_from_entry(entry: &Value, source: &str) -> Option<NewAircraftImage> {
    let url = match entry {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Object(_) => ["url", "photourl", "imageurl"]
            .iter()
            .find_map(|k| to_str(entry.get(*k)))?,
        _ => return None,
    };
    let caption = ["caption", "description"]
        .iter()
        .find_map(|k| to_str(entry.get(*k)));
    Some(NewAircraftImage {
        url,
        caption,
        source: source.to_string(),
    })
}

/// Photo references embedded in the raw listing record.
fn listing_photos(raw: &Value) -> Vec<NewAircraftImage> {
    if let Some(Value::Array(photos)) = raw.get("photos") {
        return photos
            .iter()
            .filter_map(|entry| image_from_entry(entry, IMAGE_SOURCE_LISTING))
            .collect();
    }
    ["photourl", "mainphoto"]
        .iter()
        .filter_map(|k| to_str(raw.get(*k)))
        .map(|url| NewAircraftImage {
            url,
            caption: None,
            source: IMAGE_SOURCE_LISTING.to_string(),
        })
        .collect()
}
