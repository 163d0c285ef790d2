//! Enrichment category definitions and the derived technical summary.
//!
//! The provider exposes eleven per-aircraft sub-resources plus an images
//! endpoint. This module names them, holds the per-aircraft bundle shape,
//! and computes the technical summary from whatever categories succeeded —
//! all pure, so the orchestrator and tests share one definition.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{to_num, to_str, to_year};

/// The eleven category sub-resources, in the provider's endpoint spelling.
pub const CATEGORIES: &[&str] = &[
    "status",
    "airframe",
    "engines",
    "apu",
    "avionics",
    "features",
    "additionalequipment",
    "interior",
    "exterior",
    "maintenance",
    "companyrelationships",
];

/// The images pseudo-category (fetched alongside, stored separately).
pub const IMAGES_CATEGORY: &str = "images";

/// Per-aircraft mapping from category name to fetched payload.
///
/// Absence of a category means its fetch failed or returned nothing — not
/// that the aircraft lacks the attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentBundle {
    pub categories: HashMap<String, Value>,
    /// Image entries fetched from the images endpoint (possibly empty).
    pub images: Vec<Value>,
}

impl EnrichmentBundle {
    pub fn get(&self, category: &str) -> Option<&Value> {
        self.categories.get(category)
    }

    /// Number of categories that returned data.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

/// Summary derived from whatever enrichment categories succeeded.
///
/// Every field tolerates a missing or malformed category — absence is
/// null/zero, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub engine_count: usize,
    pub avionics_suite: Option<String>,
    pub days_until_next_maintenance: Option<f64>,
    pub interior_refurb_year: Option<i32>,
    pub exterior_refurb_year: Option<i32>,
    pub feature_count: usize,
}

/// Compute the technical summary for one aircraft.
pub fn technical_summary(bundle: &EnrichmentBundle) -> TechnicalSummary {
    TechnicalSummary {
        engine_count: engine_count(bundle.get("engines")),
        avionics_suite: bundle
            .get("avionics")
            .and_then(|v| to_str(v.get("avionicssuite"))),
        days_until_next_maintenance: bundle
            .get("maintenance")
            .and_then(|v| to_num(v.get("daysuntilnextmx"))),
        interior_refurb_year: bundle
            .get("interior")
            .and_then(|v| to_year(v.get("refurbyear"))),
        exterior_refurb_year: bundle
            .get("exterior")
            .and_then(|v| to_year(v.get("refurbyear"))),
        feature_count: feature_count(bundle.get("features")),
    }
}

/// Engine count: array length, 1 for a bare engine object, else 0.
fn engine_count(engines: Option<&Value>) -> usize {
    match engines {
        Some(Value::Array(list)) => list.len(),
        Some(Value::Object(_)) => 1,
        _ => 0,
    }
}

/// Feature count: entries of a `features` array, or keys of a bare object.
fn feature_count(features: Option<&Value>) -> usize {
    match features {
        Some(Value::Array(list)) => list.len(),
        Some(Value::Object(map)) => match map.get("features") {
            Some(Value::Array(list)) => list.len(),
            _ => map.len(),
        },
        _ => 0,
    }
}
