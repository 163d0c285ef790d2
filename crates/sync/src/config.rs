//! Enrichment batching and pacing configuration.

use std::time::Duration;

/// Configuration for the enrichment fan-out, loaded from environment
/// variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Aircraft enriched per batch (default: `10`).
    pub batch_size: usize,
    /// Delay between batches (default: `1000` ms).
    pub batch_delay: Duration,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `SYNC_BATCH_SIZE`     | `10`    |
    /// | `SYNC_BATCH_DELAY_MS` | `1000`  |
    pub fn from_env() -> Self {
        let batch_size: usize = std::env::var("SYNC_BATCH_SIZE")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SYNC_BATCH_SIZE must be a valid usize");

        let batch_delay_ms: u64 = std::env::var("SYNC_BATCH_DELAY_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("SYNC_BATCH_DELAY_MS must be a valid u64");

        Self {
            batch_size,
            batch_delay: Duration::from_millis(batch_delay_ms),
        }
    }

    /// Config for exercising the pipeline against a local mock server.
    pub fn for_tests() -> Self {
        Self {
            batch_size: 10,
            batch_delay: Duration::from_millis(0),
        }
    }
}
