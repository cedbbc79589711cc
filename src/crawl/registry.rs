//! Registry of in-flight crawl handles
//!
//! Handles live only in memory. A handle is evicted the first time a poll
//! reports a terminal status, or when a new crawl is registered after its
//! process exited unpolled. The whole registry is lost on restart; completed
//! crawls stay discoverable through the database lister.

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::types::{CrawlHandle, CrawlStatusReport};
use crate::database::CrawlDatabase;
use crate::error::{SpiderError, SpiderResult};

/// Crawl handles keyed by crawl id
#[derive(Clone, Default)]
pub struct CrawlRegistry {
    crawls: Arc<Mutex<HashMap<String, CrawlHandle>>>,
}

impl CrawlRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new handle, first dropping handles whose process already
    /// exited without ever being polled
    pub async fn insert(&self, handle: CrawlHandle) {
        let mut crawls = self.crawls.lock().await;
        crawls.retain(|crawl_id, existing| {
            let alive = existing.is_alive();
            if !alive {
                debug!("Dropping finished, unpolled crawl handle {crawl_id}");
            }
            alive
        });
        crawls.insert(handle.crawl_id.clone(), handle);
    }

    /// Number of handles whose process has not exited
    pub async fn running_count(&self) -> usize {
        let mut crawls = self.crawls.lock().await;
        let mut running = 0;
        for handle in crawls.values_mut() {
            if handle.is_alive() {
                running += 1;
            }
        }
        running
    }

    /// Ids of every registered handle, sorted
    pub async fn ids(&self) -> Vec<String> {
        let crawls = self.crawls.lock().await;
        let mut ids: Vec<String> = crawls.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Poll one handle, evicting it once a terminal status is reported
    ///
    /// # Errors
    ///
    /// Returns [`SpiderError::UnknownHandle`] listing the registered ids.
    pub async fn poll(
        &self,
        crawl_id: &str,
        database: &CrawlDatabase,
    ) -> SpiderResult<CrawlStatusReport> {
        let mut crawls = self.crawls.lock().await;

        let Some(handle) = crawls.get_mut(crawl_id) else {
            let mut active: Vec<String> = crawls.keys().cloned().collect();
            active.sort();
            return Err(SpiderError::UnknownHandle {
                id: crawl_id.to_string(),
                active,
            });
        };

        let report = handle.poll(database).await;
        if report.status.is_terminal() {
            crawls.remove(crawl_id);
            debug!("Evicted crawl handle {crawl_id} ({:?})", report.status);
        }
        Ok(report)
    }
}

impl std::fmt::Debug for CrawlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlRegistry").finish_non_exhaustive()
    }
}
