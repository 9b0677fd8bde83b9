//! Finds a reachable manuscript mirror.
//!
//! Candidates are probed one after another with a HEAD request; the first
//! answering with a status in [200, 400) wins and is cached. A failed round
//! is not cached, so the next run probes again.

use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::cache::CacheStore;
use crate::config::{CACHE_KEY_MIRROR_DOMAIN, Config};
use crate::fetcher::HttpClient;

pub struct MirrorResolver {
    http: HttpClient,
    cache: CacheStore,
    candidates: Vec<String>,
    scheme: String,
    probe_timeout: Duration,
}

impl MirrorResolver {
    pub fn new(http: HttpClient, cache: CacheStore, config: &Config) -> Self {
        Self {
            http,
            cache,
            candidates: config.mirror_candidates().to_vec(),
            scheme: config.mirror_scheme().to_string(),
            probe_timeout: config.mirror_probe_timeout(),
        }
    }

    /// Hostname of a working mirror, or `None` when every candidate failed.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> Option<String> {
        if let Some(host) = self.cache.get::<String>(CACHE_KEY_MIRROR_DOMAIN).await {
            debug!(host = %host, "mirror served from cache");
            return Some(host);
        }

        for host in &self.candidates {
            if self.probe(host).await {
                info!(host = %host, "found working mirror");
                self.cache.set(CACHE_KEY_MIRROR_DOMAIN, host).await;
                return Some(host.clone());
            }
        }

        info!(candidates = self.candidates.len(), "no working mirror found");
        None
    }

    async fn probe(&self, host: &str) -> bool {
        let url = format!("{}://{}/", self.scheme, host);
        match self.http.head_status(&url, self.probe_timeout).await {
            Ok(status) if is_reachable(status) => true,
            Ok(status) => {
                debug!(host, status = %status, "mirror answered with failure status");
                false
            }
            Err(e) if e.is_timeout() => {
                debug!(host, "mirror probe timed out");
                false
            }
            Err(e) => {
                warn!(host, error = %e, "mirror probe failed");
                false
            }
        }
    }

    /// Start resolving in the background. The returned handle can be awaited
    /// later, when the mirror is actually needed.
    pub fn spawn(self: Arc<Self>) -> MirrorLookup {
        MirrorLookup {
            handle: tokio::spawn(async move { self.resolve().await }),
        }
    }
}

fn is_reachable(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// Outcome of waiting on a background mirror lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "host", rename_all = "snake_case")]
pub enum MirrorState {
    Found(String),
    NotFound,
    /// The lookup was still running when the caller stopped waiting.
    TimedOut,
}

/// A mirror lookup that may still be in flight.
pub struct MirrorLookup {
    handle: JoinHandle<Option<String>>,
}

impl MirrorLookup {
    pub fn is_settled(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait up to `wait` for the lookup to finish.
    pub async fn settle(self, wait: Duration) -> MirrorState {
        let mut handle = self.handle;
        match tokio::time::timeout(wait, &mut handle).await {
            Ok(Ok(Some(host))) => MirrorState::Found(host),
            Ok(Ok(None)) => MirrorState::NotFound,
            Ok(Err(e)) => {
                warn!(error = %e, "mirror lookup task failed");
                MirrorState::NotFound
            }
            Err(_) => {
                handle.abort();
                MirrorState::TimedOut
            }
        }
    }
}

/// Link to `doi` on the mirror `host`. Links are always HTTPS; the
/// configurable probe scheme only serves plain-HTTP stand-ins in tests.
pub fn mirror_url(host: &str, doi: &str) -> String {
    format!("https://{host}/{doi}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_statuses() {
        assert!(is_reachable(StatusCode::OK));
        assert!(is_reachable(StatusCode::MOVED_PERMANENTLY));
        assert!(!is_reachable(StatusCode::BAD_REQUEST));
        assert!(!is_reachable(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn builds_mirror_link() {
        assert_eq!(
            mirror_url("sci-hub.se", "10.1038/s41586-020-1234-5"),
            "https://sci-hub.se/10.1038/s41586-020-1234-5"
        );
    }
}
