//! Repository for the `aircraft` table.

use sqlx::PgPool;

use fleetiq_core::types::DbId;

use crate::models::aircraft::{Aircraft, WriteAircraft};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, provider_aircraft_id, registration, serial_number, \
    manufacturer, model, year, year_manufactured, year_delivered, \
    price, currency, for_sale, status, date_listed, \
    base_city, base_state, base_country, base_airport_code, \
    total_time_hours, engine_serials, \
    specifications, features, market_data, raw_data, \
    last_synced_at, created_at, updated_at";

/// Provides lookups and sync-oriented writes for aircraft rows.
pub struct AircraftRepo;

impl AircraftRepo {
    /// Insert a new aircraft, returning the created row.
    ///
    /// `last_synced_at` is stamped on insert — a freshly created row is by
    /// definition in sync with the provider.
    pub async fn create(pool: &PgPool, input: &WriteAircraft) -> Result<Aircraft, sqlx::Error> {
        let query = format!(
            "INSERT INTO aircraft
                (provider_aircraft_id, registration, serial_number,
                 manufacturer, model, year, year_manufactured, year_delivered,
                 price, currency, for_sale, status, date_listed,
                 base_city, base_state, base_country, base_airport_code,
                 total_time_hours, engine_serials,
                 specifications, features, market_data, raw_data,
                 last_synced_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, now())
             RETURNING {COLUMNS}"
        );
        bind_write(sqlx::query_as::<_, Aircraft>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Overwrite an existing aircraft from a fresh sync.
    ///
    /// Scalar fields are replaced outright (absent incoming identity keys
    /// never null out stored ones); the three enrichment blobs are
    /// shallow-merged into the existing jsonb in SQL, so concurrent runs
    /// cannot lose keys to a read-modify-write race. The blobs must be
    /// JSON objects — jsonb `||` concatenates arrays rather than merging
    /// them, so an array-valued blob would grow on every resync.
    /// `raw_data` is replaced with the latest payload verbatim.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_synced(
        pool: &PgPool,
        id: DbId,
        input: &WriteAircraft,
    ) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!(
            "UPDATE aircraft SET
                provider_aircraft_id = COALESCE($2, provider_aircraft_id),
                registration = COALESCE($3, registration),
                serial_number = COALESCE($4, serial_number),
                manufacturer = $5,
                model = $6,
                year = $7,
                year_manufactured = $8,
                year_delivered = $9,
                price = $10,
                currency = $11,
                for_sale = $12,
                status = $13,
                date_listed = $14,
                base_city = $15,
                base_state = $16,
                base_country = $17,
                base_airport_code = $18,
                total_time_hours = $19,
                engine_serials = $20,
                specifications = specifications || $21,
                features = features || $22,
                market_data = market_data || $23,
                raw_data = $24,
                last_synced_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        bind_write(sqlx::query_as::<_, Aircraft>(&query).bind(id), input)
            .fetch_optional(pool)
            .await
    }

    /// Refresh `last_synced_at` without touching any other column.
    ///
    /// Used when a sync confirms a record is unchanged.
    pub async fn touch_synced(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE aircraft SET last_synced_at = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find an aircraft by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM aircraft WHERE id = $1");
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an aircraft by the provider's own identifier.
    pub async fn find_by_provider_id(
        pool: &PgPool,
        provider_aircraft_id: &str,
    ) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM aircraft WHERE provider_aircraft_id = $1");
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(provider_aircraft_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an aircraft by tail registration.
    pub async fn find_by_registration(
        pool: &PgPool,
        registration: &str,
    ) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM aircraft WHERE registration = $1");
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(registration)
            .fetch_optional(pool)
            .await
    }

    /// Find an aircraft by airframe serial number.
    pub async fn find_by_serial_number(
        pool: &PgPool,
        serial_number: &str,
    ) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM aircraft WHERE serial_number = $1");
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(serial_number)
            .fetch_optional(pool)
            .await
    }

    /// List aircraft, most recently synced first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Aircraft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM aircraft
             ORDER BY last_synced_at DESC NULLS LAST, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of aircraft rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM aircraft")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

/// Bind the 23 write-DTO parameters in declaration order.
fn bind_write<'q>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, Aircraft, sqlx::postgres::PgArguments>,
    input: &'q WriteAircraft,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Aircraft, sqlx::postgres::PgArguments> {
    query
        .bind(&input.provider_aircraft_id)
        .bind(&input.registration)
        .bind(&input.serial_number)
        .bind(&input.manufacturer)
        .bind(&input.model)
        .bind(input.year)
        .bind(input.year_manufactured)
        .bind(input.year_delivered)
        .bind(input.price)
        .bind(&input.currency)
        .bind(input.for_sale)
        .bind(&input.status)
        .bind(&input.date_listed)
        .bind(&input.base_city)
        .bind(&input.base_state)
        .bind(&input.base_country)
        .bind(&input.base_airport_code)
        .bind(input.total_time_hours)
        .bind(&input.engine_serials)
        .bind(&input.specifications)
        .bind(&input.features)
        .bind(&input.market_data)
        .bind(&input.raw_data)
}
