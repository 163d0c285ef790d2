//! Raw-to-canonical aircraft normalization.
//!
//! Maps the provider's loosely-typed bulk export records into the canonical
//! aircraft shape: numeric/boolean coercion, field fallback chains, and
//! listing status derivation. Deterministic and pure — the raw payload is
//! carried along unmodified for audit and later enrichment merge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce::{to_num, to_str, to_year, truthy};

/// Canonical listing status derived from the raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Available,
    Sold,
    UnderContract,
    Maintenance,
    Inspection,
    Withdrawn,
}

impl ListingStatus {
    /// Return the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Sold => "SOLD",
            Self::UnderContract => "UNDER_CONTRACT",
            Self::Maintenance => "MAINTENANCE",
            Self::Inspection => "INSPECTION",
            Self::Withdrawn => "WITHDRAWN",
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Self::Available),
            "SOLD" => Some(Self::Sold),
            "UNDER_CONTRACT" => Some(Self::UnderContract),
            "MAINTENANCE" => Some(Self::Maintenance),
            "INSPECTION" => Some(Self::Inspection),
            "WITHDRAWN" => Some(Self::Withdrawn),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical aircraft record derived from one raw provider record.
///
/// Identity fields are all optional — a record missing every identity key
/// can still be stored, it just can never match an existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalAircraft {
    // Identity (matched in this priority order).
    pub provider_aircraft_id: Option<String>,
    pub registration: Option<String>,
    pub serial_number: Option<String>,

    // Descriptive.
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub year_manufactured: Option<i32>,
    pub year_delivered: Option<i32>,

    // Commercial.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub for_sale: bool,
    pub status: ListingStatus,
    pub date_listed: Option<String>,

    // Location.
    pub base_city: Option<String>,
    pub base_state: Option<String>,
    pub base_country: Option<String>,
    pub base_airport_code: Option<String>,

    // Utilization.
    pub total_time_hours: Option<f64>,
    pub engine_serials: Option<String>,

    // The untouched provider payload.
    pub raw_data: Value,
}

/// First non-absent string among the named raw fields.
fn str_chain(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| to_str(raw.get(*k)))
}

/// First plausible year among the named raw fields.
fn year_chain(raw: &Value, keys: &[&str]) -> Option<i32> {
    keys.iter().find_map(|k| to_year(raw.get(*k)))
}

/// First coercible number among the named raw fields.
fn num_chain(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| to_num(raw.get(*k)))
}

/// Derive the listing status from the raw record.
///
/// The for-sale flag wins outright; otherwise the free-text market status
/// goes through a fixed lookup. Unrecognized or absent status means the
/// listing is still on the market.
pub fn derive_status(raw: &Value) -> ListingStatus {
    if truthy(raw.get("forsale")) {
        return ListingStatus::Available;
    }
    match to_str(raw.get("marketstatus")).as_deref() {
        Some("Sold") => ListingStatus::Sold,
        Some("Under Contract") => ListingStatus::UnderContract,
        Some("Maintenance") => ListingStatus::Maintenance,
        Some("Inspection") => ListingStatus::Inspection,
        Some("Withdrawn") => ListingStatus::Withdrawn,
        _ => ListingStatus::Available,
    }
}

/// Normalize one raw provider record into the canonical shape.
pub fn normalize(raw: &Value) -> CanonicalAircraft {
    let year_manufactured = to_year(raw.get("yearmfr"));
    let year_delivered = year_chain(raw, &["yeardlv", "year_dlv"]);

    CanonicalAircraft {
        provider_aircraft_id: to_str(raw.get("aircraftid")),
        registration: str_chain(raw, &["regnbr", "registration"]),
        serial_number: str_chain(raw, &["sernbr", "serial_number"]),

        manufacturer: to_str(raw.get("make")),
        model: to_str(raw.get("model")),
        // Manufacture year is the best estimate of "the" year; delivery
        // year stands in when it is missing.
        year: year_chain(raw, &["yearmfr", "yeardlv", "year_dlv"]),
        year_manufactured,
        year_delivered,

        price: num_chain(raw, &["askingprice", "asking"]),
        currency: to_str(raw.get("currency")),
        for_sale: truthy(raw.get("forsale")),
        status: derive_status(raw),
        date_listed: to_str(raw.get("datelisted")),

        base_city: str_chain(raw, &["basecity", "acbasecity", "basename"]),
        base_state: to_str(raw.get("basestate")),
        base_country: to_str(raw.get("basecountry")),
        base_airport_code: str_chain(raw, &["baseicao", "baseiata"]),

        total_time_hours: num_chain(raw, &["aftt", "totaltime"]),
        engine_serials: to_str(raw.get("engsn")),

        raw_data: raw.clone(),
    }
}
