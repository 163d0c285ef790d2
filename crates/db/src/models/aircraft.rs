//! Aircraft entity model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use fleetiq_core::normalize::CanonicalAircraft;
use fleetiq_core::types::{DbId, Timestamp};

/// A row from the `aircraft` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Aircraft {
    pub id: DbId,
    pub provider_aircraft_id: Option<String>,
    pub registration: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub year_manufactured: Option<i32>,
    pub year_delivered: Option<i32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub for_sale: bool,
    pub status: String,
    pub date_listed: Option<String>,
    pub base_city: Option<String>,
    pub base_state: Option<String>,
    pub base_country: Option<String>,
    pub base_airport_code: Option<String>,
    pub total_time_hours: Option<f64>,
    pub engine_serials: Option<String>,
    pub specifications: Value,
    pub features: Value,
    pub market_data: Value,
    pub raw_data: Value,
    pub last_synced_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for writing an aircraft row (create or synced update).
///
/// Scalar fields overwrite on update; the three jsonb blobs are
/// shallow-merged into the existing row in SQL.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteAircraft {
    pub provider_aircraft_id: Option<String>,
    pub registration: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub year_manufactured: Option<i32>,
    pub year_delivered: Option<i32>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub for_sale: bool,
    pub status: String,
    pub date_listed: Option<String>,
    pub base_city: Option<String>,
    pub base_state: Option<String>,
    pub base_country: Option<String>,
    pub base_airport_code: Option<String>,
    pub total_time_hours: Option<f64>,
    pub engine_serials: Option<String>,
    pub specifications: Value,
    pub features: Value,
    pub market_data: Value,
    pub raw_data: Value,
}

impl WriteAircraft {
    /// Build a write DTO from a canonical record, with empty blobs.
    pub fn from_canonical(canonical: &CanonicalAircraft) -> Self {
        Self {
            provider_aircraft_id: canonical.provider_aircraft_id.clone(),
            registration: canonical.registration.clone(),
            serial_number: canonical.serial_number.clone(),
            manufacturer: canonical.manufacturer.clone(),
            model: canonical.model.clone(),
            year: canonical.year,
            year_manufactured: canonical.year_manufactured,
            year_delivered: canonical.year_delivered,
            price: canonical.price,
            currency: canonical.currency.clone(),
            for_sale: canonical.for_sale,
            status: canonical.status.as_str().to_string(),
            date_listed: canonical.date_listed.clone(),
            base_city: canonical.base_city.clone(),
            base_state: canonical.base_state.clone(),
            base_country: canonical.base_country.clone(),
            base_airport_code: canonical.base_airport_code.clone(),
            total_time_hours: canonical.total_time_hours,
            engine_serials: canonical.engine_serials.clone(),
            specifications: Value::Object(Default::default()),
            features: Value::Object(Default::default()),
            market_data: Value::Object(Default::default()),
            raw_data: canonical.raw_data.clone(),
        }
    }
}
