//! Sync run state machine and accounting types.
//!
//! A sync run is one end-to-end execution of fetch → normalize → enrich →
//! reconcile, tracked as a single append-only log row. Runs move through
//! exactly one terminal transition.

use serde::{Deserialize, Serialize};

/// Status of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    Started,
    Completed,
    CompletedWithErrors,
    Failed,
}

impl SyncRunStatus {
    /// Return the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::Failed => "failed",
        }
    }

    /// Parse a status string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "started" => Some(Self::Started),
            "completed" => Some(Self::Completed),
            "completed_with_errors" => Some(Self::CompletedWithErrors),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] =
        &["started", "completed", "completed_with_errors", "failed"];

    /// Whether this status ends the run.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started)
    }
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of synchronization a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    /// Full bulk export + enrichment + reconcile.
    Full,
    /// Bulk export + reconcile, skipping enrichment fan-out.
    ListingsOnly,
}

impl SyncType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::ListingsOnly => "listings_only",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "full" => Some(Self::Full),
            "listings_only" => Some(Self::ListingsOnly),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &["full", "listings_only"];
}

impl std::fmt::Display for SyncType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-run counters, folded into the run row at the terminal
/// transition only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub processed: i32,
    pub created: i32,
    pub updated: i32,
    /// Records that failed reconciliation.
    pub errors: i32,
    /// Enrichment category/image requests that failed. The affected
    /// records are still stored, minus the missing categories.
    pub enrichment_errors: i32,
}

impl RunCounters {
    /// Terminal status for a run that reached the end of its batch loop.
    ///
    /// Any non-fatal error — a failed record or a failed enrichment
    /// request — downgrades the run to `completed_with_errors`; `failed`
    /// is reserved for pipeline-fatal errors and is never produced here.
    pub fn terminal_status(&self) -> SyncRunStatus {
        if self.errors > 0 || self.enrichment_errors > 0 {
            SyncRunStatus::CompletedWithErrors
        } else {
            SyncRunStatus::Completed
        }
    }
}
