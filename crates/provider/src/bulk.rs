//! Safety-bounded paginated retrieval of the full aircraft export.
//!
//! Pages are fetched strictly in order — the decision to fetch page N+1
//! depends on how many rows page N returned. A full page means more data
//! may exist; a short page ends the export. A hard page ceiling bounds a
//! provider that never sends a short page.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::api::ProviderApi;
use crate::auth::AuthManager;
use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Paginated bulk export fetcher.
pub struct BulkFetcher {
    api: Arc<ProviderApi>,
    auth: Arc<AuthManager>,
    page_size: usize,
    max_pages: usize,
    page_delay: std::time::Duration,
}

impl BulkFetcher {
    pub fn new(api: Arc<ProviderApi>, auth: Arc<AuthManager>, config: &ProviderConfig) -> Self {
        Self {
            api,
            auth,
            page_size: config.page_size,
            max_pages: config.max_pages,
            page_delay: config.page_delay,
        }
    }

    /// Fetch every page of the aircraft export.
    ///
    /// Any transport or API failure mid-pagination aborts the whole fetch:
    /// a partial export would silently shrink the inventory downstream, so
    /// previously fetched pages are discarded with the error. Hitting the
    /// page ceiling is different — the data fetched so far is real, so it
    /// is returned with a warning.
    pub async fn fetch_all(
        &self,
        filters: &Value,
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>, ProviderError> {
        let mut records: Vec<Value> = Vec::new();
        let mut page = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(ProviderError::Cancelled);
            }

            let session = self.auth.get_session().await?;
            let page_records = self
                .api
                .fetch_export_page(&session, page, self.page_size, filters)
                .await?;
            let returned = page_records.len();
            records.extend(page_records);

            tracing::debug!(page, returned, total = records.len(), "Fetched export page");

            // A short page is the provider's only completion signal.
            if returned < self.page_size {
                break;
            }

            if page >= self.max_pages {
                tracing::warn!(
                    page,
                    max_pages = self.max_pages,
                    total = records.len(),
                    "Export pagination hit the hard page ceiling; truncating fetch",
                );
                break;
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        tracing::info!(pages = page, total = records.len(), "Bulk export fetched");
        Ok(records)
    }
}
