//! Integration tests for the sync store repositories.
//!
//! Exercises the repository layer against a real database:
//! - Aircraft create + identity-key lookups
//! - Synced update semantics (scalar overwrite, jsonb shallow merge)
//! - Gallery replacement with hero selection
//! - Sync run terminal transition guard (exactly-once)

use serde_json::json;
use sqlx::PgPool;

use fleetiq_core::normalize::normalize;
use fleetiq_core::sync_run::{RunCounters, SyncRunStatus, SyncType};
use fleetiq_db::models::aircraft::WriteAircraft;
use fleetiq_db::models::aircraft_image::{NewAircraftImage, IMAGE_SOURCE_PROVIDER};
use fleetiq_db::repositories::{AircraftImageRepo, AircraftRepo, SyncRunRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample_aircraft(provider_id: &str, registration: &str, serial: &str) -> WriteAircraft {
    let raw = json!({
        "aircraftid": provider_id,
        "regnbr": registration,
        "sernbr": serial,
        "make": "Cessna",
        "model": "Citation XLS",
        "yearmfr": 2015,
        "askingprice": "2500000",
        "forsale": "Y"
    });
    WriteAircraft::from_canonical(&normalize(&raw))
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn bootstrap_creates_schema(pool: PgPool) {
    fleetiq_db::health_check(&pool).await.unwrap();

    for table in ["aircraft", "aircraft_images", "sync_runs"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should exist and start empty");
    }
}

// ---------------------------------------------------------------------------
// AircraftRepo
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_by_each_identity_key(pool: PgPool) {
    let input = sample_aircraft("1001", "N12345", "560-5801");
    let created = AircraftRepo::create(&pool, &input).await.unwrap();

    assert_eq!(created.provider_aircraft_id.as_deref(), Some("1001"));
    assert_eq!(created.status, "AVAILABLE");
    assert!(created.last_synced_at.is_some());

    let by_provider = AircraftRepo::find_by_provider_id(&pool, "1001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_provider.id, created.id);

    let by_registration = AircraftRepo::find_by_registration(&pool, "N12345")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_registration.id, created.id);

    let by_serial = AircraftRepo::find_by_serial_number(&pool, "560-5801")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_serial.id, created.id);

    assert!(AircraftRepo::find_by_provider_id(&pool, "9999")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn update_overwrites_scalars_and_merges_blobs(pool: PgPool) {
    let mut input = sample_aircraft("1001", "N12345", "560-5801");
    input.specifications = json!({ "airframe": { "aftt": 3200 }, "apu": { "model": "T-62" } });
    let created = AircraftRepo::create(&pool, &input).await.unwrap();

    // Fresh sync: new price, a new specifications key, one overlapping key.
    let mut update = sample_aircraft("1001", "N12345", "560-5801");
    update.price = Some(2400000.0);
    update.specifications = json!({ "airframe": { "aftt": 3350 }, "engines": [{ "sn": "A" }] });

    let updated = AircraftRepo::update_synced(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.price, Some(2400000.0));
    // Overlapping key replaced, existing key preserved, new key added.
    assert_eq!(updated.specifications["airframe"]["aftt"], json!(3350));
    assert_eq!(updated.specifications["apu"]["model"], json!("T-62"));
    assert!(updated.specifications["engines"].is_array());
    assert!(updated.last_synced_at >= created.last_synced_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn repeated_updates_do_not_grow_feature_lists(pool: PgPool) {
    let created = AircraftRepo::create(&pool, &sample_aircraft("1001", "N12345", "560-5801"))
        .await
        .unwrap();
    assert_eq!(created.features, json!({}));

    // The feature list arrives object-wrapped; a blank-created row starts
    // from the '{}' default, so the first merge installs the key and every
    // later identical merge replaces it in place.
    let mut update = sample_aircraft("1001", "N12345", "560-5801");
    update.features = json!({ "features": ["WAAS", "ADS-B Out"] });

    for _ in 0..2 {
        AircraftRepo::update_synced(&pool, created.id, &update)
            .await
            .unwrap()
            .unwrap();
    }

    let stored = AircraftRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.features, json!({ "features": ["WAAS", "ADS-B Out"] }));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_keeps_identity_keys_when_incoming_lacks_them(pool: PgPool) {
    let created = AircraftRepo::create(&pool, &sample_aircraft("1001", "N12345", "560-5801"))
        .await
        .unwrap();

    // Incoming record matched on serial only; no provider id or tail number.
    let raw = json!({ "sernbr": "560-5801", "askingprice": 2000000 });
    let update = WriteAircraft::from_canonical(&normalize(&raw));

    let updated = AircraftRepo::update_synced(&pool, created.id, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.provider_aircraft_id.as_deref(), Some("1001"));
    assert_eq!(updated.registration.as_deref(), Some("N12345"));
    assert_eq!(updated.price, Some(2000000.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_of_missing_row_returns_none(pool: PgPool) {
    let input = sample_aircraft("1001", "N12345", "560-5801");
    let result = AircraftRepo::update_synced(&pool, 424242, &input).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_provider_id_rejected(pool: PgPool) {
    AircraftRepo::create(&pool, &sample_aircraft("1001", "N12345", "560-5801"))
        .await
        .unwrap();
    let duplicate = sample_aircraft("1001", "N99999", "999-0001");
    assert!(AircraftRepo::create(&pool, &duplicate).await.is_err());
}

// ---------------------------------------------------------------------------
// AircraftImageRepo
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn gallery_replace_orders_and_marks_hero(pool: PgPool) {
    let aircraft = AircraftRepo::create(&pool, &sample_aircraft("1001", "N12345", "560-5801"))
        .await
        .unwrap();

    let first = vec![
        NewAircraftImage {
            url: "https://img.example.com/a.jpg".into(),
            caption: Some("Exterior".into()),
            source: IMAGE_SOURCE_PROVIDER.into(),
        },
        NewAircraftImage {
            url: "https://img.example.com/b.jpg".into(),
            caption: None,
            source: IMAGE_SOURCE_PROVIDER.into(),
        },
    ];
    AircraftImageRepo::replace_for_aircraft(&pool, aircraft.id, &first)
        .await
        .unwrap();

    // A later sync replaces the gallery wholesale.
    let second = vec![NewAircraftImage {
        url: "https://img.example.com/c.jpg".into(),
        caption: None,
        source: IMAGE_SOURCE_PROVIDER.into(),
    }];
    AircraftImageRepo::replace_for_aircraft(&pool, aircraft.id, &second)
        .await
        .unwrap();

    let gallery = AircraftImageRepo::list_by_aircraft(&pool, aircraft.id)
        .await
        .unwrap();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].url, "https://img.example.com/c.jpg");
    assert_eq!(gallery[0].position, 0);
    assert!(gallery[0].is_hero);
}

// ---------------------------------------------------------------------------
// SyncRunRepo
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn run_lifecycle_records_counts_and_duration(pool: PgPool) {
    let run = SyncRunRepo::start(&pool, SyncType::Full).await.unwrap();
    assert_eq!(run.status, "started");
    assert!(run.completed_at.is_none());

    let counters = RunCounters {
        processed: 12,
        created: 5,
        updated: 6,
        errors: 1,
        enrichment_errors: 3,
    };
    let finished = SyncRunRepo::finish(
        &pool,
        run.id,
        counters.terminal_status(),
        counters,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(finished.status, "completed_with_errors");
    assert_eq!(finished.records_processed, 12);
    assert_eq!(finished.records_created, 5);
    assert_eq!(finished.records_updated, 6);
    assert_eq!(finished.records_errored, 1);
    assert_eq!(finished.enrichment_errors, 3);
    assert!(finished.completed_at.is_some());
    assert!(finished.duration_ms.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn terminal_transition_is_exactly_once(pool: PgPool) {
    let run = SyncRunRepo::start(&pool, SyncType::Full).await.unwrap();

    let first = SyncRunRepo::finish(
        &pool,
        run.id,
        SyncRunStatus::Completed,
        RunCounters::default(),
        None,
    )
    .await
    .unwrap();
    assert!(first.is_some());

    // A second transition must find no row in `started` state.
    let second = SyncRunRepo::finish(
        &pool,
        run.id,
        SyncRunStatus::Failed,
        RunCounters::default(),
        Some("late failure"),
    )
    .await
    .unwrap();
    assert!(second.is_none());

    let stored = SyncRunRepo::find_by_id(&pool, run.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "completed");
    assert!(stored.error_message.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_recent_is_newest_first(pool: PgPool) {
    let first = SyncRunRepo::start(&pool, SyncType::Full).await.unwrap();
    let second = SyncRunRepo::start(&pool, SyncType::ListingsOnly).await.unwrap();

    let runs = SyncRunRepo::list_recent(&pool, 10, 0).await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, second.id);
    assert_eq!(runs[1].id, first.id);
}
