//! Error taxonomy for the sync pipeline.

use fleetiq_provider::ProviderError;

/// Errors from the sync layer.
///
/// `Provider` and `Persistence` are pipeline-fatal when raised outside a
/// per-record section; inside one they are caught, counted, and the batch
/// continues. `IdentityConflict` is always record-level.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A provider client call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A database operation failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Two identity keys on one incoming record matched two different
    /// stored rows. Never resolved silently.
    #[error(
        "Identity conflict: {first_key}={first_value} matches aircraft {first_id}, \
         but {second_key}={second_value} matches aircraft {second_id}"
    )]
    IdentityConflict {
        first_key: &'static str,
        first_value: String,
        first_id: i64,
        second_key: &'static str,
        second_value: String,
        second_id: i64,
    },

    /// Another run is already in progress in this process. The guard is
    /// global across sync types: one run at a time, whatever its type.
    #[error("A sync run is already active; {0} trigger refused")]
    RunActive(&'static str),

    /// The run was cancelled before completion.
    #[error("Sync run cancelled")]
    Cancelled,
}
