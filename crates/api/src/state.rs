use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use fleetiq_sync::pipeline::SyncPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fleetiq_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The sync pipeline (provider handles + run gate).
    pub pipeline: Arc<SyncPipeline>,
    /// Cancelled on shutdown; threaded into in-flight sync runs.
    pub shutdown: CancellationToken,
}
