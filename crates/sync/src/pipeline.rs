//! Run orchestration: one end-to-end sync with append-only accounting.
//!
//! A run opens a `sync_runs` row, executes fetch → normalize → enrich →
//! reconcile, and performs exactly one terminal transition. Pipeline-fatal
//! errors (auth, pagination, run-log writes) mark the run `failed`;
//! record-level and enrichment-request errors are counted and downgrade a
//! finished run to `completed_with_errors`. Partial data written before a
//! failure is kept.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use fleetiq_core::normalize::{normalize, CanonicalAircraft};
use fleetiq_core::sync_run::{RunCounters, SyncRunStatus, SyncType};
use fleetiq_core::types::DbId;
use fleetiq_db::repositories::SyncRunRepo;
use fleetiq_db::DbPool;
use fleetiq_provider::api::ProviderApi;
use fleetiq_provider::auth::AuthManager;
use fleetiq_provider::bulk::BulkFetcher;
use fleetiq_provider::config::ProviderConfig;

use crate::config::SyncConfig;
use crate::enrich::{EnrichmentOrchestrator, EnrichmentOutcome};
use crate::error::SyncError;
use crate::reconcile::{ReconcileOutcome, Reconciler};

/// Caller-facing options for one run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Rewrite matched rows even when the incoming data is identical.
    pub force_refresh: bool,
}

/// Outcome of one run, mirrored from its terminal `sync_runs` row.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub run_id: DbId,
    pub sync_type: SyncType,
    pub status: SyncRunStatus,
    pub counters: RunCounters,
    pub duration_ms: Option<i64>,
    pub error_message: Option<String>,
}

/// Owns the provider handles and runs syncs one at a time.
pub struct SyncPipeline {
    pool: DbPool,
    fetcher: BulkFetcher,
    enricher: EnrichmentOrchestrator,
    /// In-process run-active guard, uniform across trigger surfaces.
    /// One run at a time, regardless of sync type.
    run_gate: Mutex<()>,
}

impl SyncPipeline {
    pub fn new(pool: DbPool, provider_config: &ProviderConfig, sync_config: &SyncConfig) -> Self {
        let api = Arc::new(ProviderApi::new(provider_config.base_url.clone()));
        let auth = Arc::new(AuthManager::new(Arc::clone(&api), provider_config));
        Self {
            pool,
            fetcher: BulkFetcher::new(Arc::clone(&api), Arc::clone(&auth), provider_config),
            enricher: EnrichmentOrchestrator::new(api, auth, sync_config),
            run_gate: Mutex::new(()),
        }
    }

    /// Execute one sync run end to end.
    ///
    /// Refuses to start while another run is active in this process.
    /// Pipeline-fatal errors are folded into the run row and the returned
    /// report — only run-log persistence failures and the active-run guard
    /// surface as `Err`.
    pub async fn run(
        &self,
        sync_type: SyncType,
        options: SyncOptions,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let _gate = self
            .run_gate
            .try_lock()
            .map_err(|_| SyncError::RunActive(sync_type.as_str()))?;

        let run = SyncRunRepo::start(&self.pool, sync_type).await?;
        tracing::info!(run_id = run.id, sync_type = %sync_type, "Sync run started");

        let mut counters = RunCounters::default();
        let result = self.execute(sync_type, &options, cancel, &mut counters).await;

        let (status, error_message) = match result {
            Ok(()) => (counters.terminal_status(), None),
            Err(e) => {
                tracing::error!(run_id = run.id, error = %e, "Sync run failed");
                (SyncRunStatus::Failed, Some(e.to_string()))
            }
        };

        let finished =
            SyncRunRepo::finish(&self.pool, run.id, status, counters, error_message.as_deref())
                .await?;
        let duration_ms = match finished {
            Some(row) => row.duration_ms,
            None => {
                // Someone else closed the row first; the guard makes this
                // unreachable in practice, but it is not worth failing over.
                tracing::warn!(run_id = run.id, "Run was already in a terminal state");
                None
            }
        };

        tracing::info!(
            run_id = run.id,
            status = %status,
            processed = counters.processed,
            created = counters.created,
            updated = counters.updated,
            errors = counters.errors,
            enrichment_errors = counters.enrichment_errors,
            "Sync run finished"
        );

        Ok(SyncReport {
            run_id: run.id,
            sync_type,
            status,
            counters,
            duration_ms,
            error_message,
        })
    }

    async fn execute(
        &self,
        sync_type: SyncType,
        options: &SyncOptions,
        cancel: &CancellationToken,
        counters: &mut RunCounters,
    ) -> Result<(), SyncError> {
        let raw_records = self.fetcher.fetch_all(&json!({}), cancel).await?;
        let canonicals: Vec<CanonicalAircraft> = raw_records.iter().map(normalize).collect();

        let bundles = match sync_type {
            SyncType::Full => {
                let ids: Vec<String> = canonicals
                    .iter()
                    .filter_map(|c| c.provider_aircraft_id.clone())
                    .collect();
                let EnrichmentOutcome {
                    bundles,
                    request_errors,
                } = self.enricher.enrich_all(&ids, cancel).await?;
                // Failed enrichment requests are non-fatal but must reach
                // the run row, where callers observe pipeline health.
                counters.enrichment_errors = request_errors as i32;
                bundles
            }
            SyncType::ListingsOnly => HashMap::new(),
        };

        for canonical in &canonicals {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }
            counters.processed += 1;

            let bundle = canonical
                .provider_aircraft_id
                .as_deref()
                .and_then(|id| bundles.get(id));

            match Reconciler::upsert(&self.pool, canonical, bundle, options.force_refresh).await {
                Ok(ReconcileOutcome::Created(id)) => {
                    counters.created += 1;
                    tracing::debug!(aircraft_id = id, "Aircraft created");
                }
                Ok(ReconcileOutcome::Updated(id)) => {
                    counters.updated += 1;
                    tracing::debug!(aircraft_id = id, "Aircraft updated");
                }
                Ok(ReconcileOutcome::Unchanged(_)) => {}
                Err(e) => {
                    counters.errors += 1;
                    tracing::warn!(
                        provider_aircraft_id = canonical.provider_aircraft_id.as_deref(),
                        error = %e,
                        "Record reconciliation failed; skipping"
                    );
                }
            }
        }

        Ok(())
    }
}
