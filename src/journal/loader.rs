use tracing::{debug, info, instrument, warn};

use crate::cache::CacheStore;
use crate::config::{CACHE_KEY_JOURNAL_INDEX, JOURNAL_INDEX_PLACEHOLDER};
use crate::fetcher::{FetchError, HttpClient};
use crate::journal::model::JournalIndex;

/// Fetches the journal quality document, serving it from cache while fresh.
#[derive(Clone)]
pub struct JournalIndexLoader {
    http: HttpClient,
    cache: CacheStore,
}

impl JournalIndexLoader {
    pub fn new(http: HttpClient, cache: CacheStore) -> Self {
        Self { http, cache }
    }

    /// Load the index from `url`. An empty or placeholder URL disables the
    /// index and yields an empty mapping without touching the network.
    #[instrument(skip(self))]
    pub async fn load(&self, url: &str) -> Result<JournalIndex, FetchError> {
        if is_disabled(url) {
            debug!("journal index disabled by configuration");
            return Ok(JournalIndex::new());
        }

        if let Some(index) = self.cache.get::<JournalIndex>(CACHE_KEY_JOURNAL_INDEX).await {
            debug!(entries = index.len(), "journal index served from cache");
            return Ok(index);
        }

        let index: JournalIndex = self.http.get_json(url).await?;
        info!(entries = index.len(), "journal index downloaded");
        self.cache.set(CACHE_KEY_JOURNAL_INDEX, &index).await;
        Ok(index)
    }

    /// `load`, with any failure downgraded to "no journal data".
    pub async fn load_or_empty(&self, url: &str) -> JournalIndex {
        match self.load(url).await {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "could not load journal index, continuing without it");
                JournalIndex::new()
            }
        }
    }
}

fn is_disabled(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == JOURNAL_INDEX_PLACEHOLDER
}
