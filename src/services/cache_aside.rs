//! The cache-aside protocol shared by every cached resource.
//!
//! [`resolve`] checks the store, and only on a miss calls the upstream API,
//! writes the fresh entries back and returns them. Store failures during the
//! lookup abort the resolution without touching the API. Fetch failures abort
//! before anything is written. Persist failures are logged and the fetched
//! entries are still returned.

use crate::clients::ClientError;
use crate::db::StoreError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info};

/// Outcome of checking the store for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// At least one stored row.
    Hit(Vec<T>),
    Miss,
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Self::Miss
        } else {
            Self::Hit(rows)
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("no results for '{0}'")]
    NotFound(String),

    #[error("{service} error: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    #[error("unexpected {service} response: {message}")]
    Normalization {
        service: &'static str,
        message: String,
    },
}

impl From<ClientError> for ResolveError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NoResults { query, .. } => Self::NotFound(query),
            ClientError::Transport { service, .. }
            | ClientError::Status { service, .. }
            | ClientError::Rejected { service, .. } => Self::Upstream {
                service,
                message: err.to_string(),
            },
            ClientError::Decode { service, .. } | ClientError::InvalidInput { service, .. } => {
                Self::Normalization {
                    service,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// A resource that can be served cache-aside.
#[async_trait::async_trait]
pub trait CacheAside: Send + Sync {
    type Key: ?Sized + fmt::Display + Sync;
    type Entry: Send + Sync;

    /// Label used in logs and metrics.
    const RESOURCE: &'static str;

    async fn lookup(&self, key: &Self::Key) -> Result<Lookup<Self::Entry>, StoreError>;

    async fn fetch(&self, key: &Self::Key) -> Result<Vec<Self::Entry>, ResolveError>;

    /// Writes freshly fetched entries and returns them as stored.
    async fn persist(
        &self,
        key: &Self::Key,
        entries: &[Self::Entry],
    ) -> Result<Vec<Self::Entry>, StoreError>;
}

pub async fn resolve<R: CacheAside>(
    resource: &R,
    key: &R::Key,
) -> Result<Vec<R::Entry>, ResolveError> {
    match resource.lookup(key).await {
        Ok(Lookup::Hit(rows)) => {
            record_lookup(R::RESOURCE, "hit");
            debug!(resource = R::RESOURCE, key = %key, rows = rows.len(), "Served from store");
            return Ok(rows);
        }
        Ok(Lookup::Miss) => {
            record_lookup(R::RESOURCE, "miss");
        }
        Err(e) => {
            error!(resource = R::RESOURCE, key = %key, error = %e, "Store lookup failed");
            return Err(e.into());
        }
    }

    info!(resource = R::RESOURCE, key = %key, "Cache miss, fetching from upstream");
    let fresh = resource.fetch(key).await?;

    match resource.persist(key, &fresh).await {
        Ok(stored) => Ok(stored),
        Err(e) => {
            metrics::counter!("cache_persist_failures_total", "resource" => R::RESOURCE)
                .increment(1);
            error!(
                resource = R::RESOURCE,
                key = %key,
                error = %e,
                "Failed to persist fetched entries; serving them uncached"
            );
            Ok(fresh)
        }
    }
}

fn record_lookup(resource: &'static str, outcome: &'static str) {
    metrics::counter!("cache_lookups_total", "resource" => resource, "outcome" => outcome)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory resource that counts every call and can be told to fail.
    #[derive(Default)]
    struct FakeResource {
        stored: Mutex<Vec<String>>,
        upstream: Vec<String>,
        lookup_fails: bool,
        fetch_fails: bool,
        persist_fails: bool,
        lookups: AtomicUsize,
        fetches: AtomicUsize,
        persists: AtomicUsize,
    }

    fn outage() -> StoreError {
        StoreError::Database(sea_orm::DbErr::Custom("connection refused".to_string()))
    }

    #[async_trait::async_trait]
    impl CacheAside for FakeResource {
        type Key = str;
        type Entry = String;

        const RESOURCE: &'static str = "fake";

        async fn lookup(&self, _: &str) -> Result<Lookup<String>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.lookup_fails {
                return Err(outage());
            }
            Ok(Lookup::from_rows(self.stored.lock().unwrap().clone()))
        }

        async fn fetch(&self, key: &str) -> Result<Vec<String>, ResolveError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fetch_fails {
                return Err(ResolveError::Upstream {
                    service: "fake",
                    message: format!("upstream down for {key}"),
                });
            }
            Ok(self.upstream.clone())
        }

        async fn persist(&self, _: &str, entries: &[String]) -> Result<Vec<String>, StoreError> {
            self.persists.fetch_add(1, Ordering::SeqCst);
            if self.persist_fails {
                return Err(outage());
            }
            let stored: Vec<String> = entries.iter().map(|e| format!("stored:{e}")).collect();
            self.stored.lock().unwrap().extend(stored.iter().cloned());
            Ok(stored)
        }
    }

    fn upstream(entries: &[&str]) -> FakeResource {
        FakeResource {
            upstream: entries.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_miss_fetches_persists_and_returns_stored() {
        let resource = upstream(&["a", "b"]);

        let rows = resolve(&resource, "k").await.unwrap();

        assert_eq!(rows, ["stored:a", "stored:b"]);
        assert_eq!(resource.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(resource.persists.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_resolution_is_a_hit() {
        let resource = upstream(&["a"]);

        resolve(&resource, "k").await.unwrap();
        let rows = resolve(&resource, "k").await.unwrap();

        assert_eq!(rows, ["stored:a"]);
        assert_eq!(resource.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(resource.persists.load(Ordering::SeqCst), 1);
        assert_eq!(resource.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lookup_failure_never_reaches_upstream() {
        let resource = FakeResource {
            lookup_fails: true,
            ..upstream(&["a"])
        };

        let err = resolve(&resource, "k").await.unwrap_err();

        assert!(matches!(err, ResolveError::Store(_)));
        assert_eq!(resource.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(resource.persists.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_nothing() {
        let resource = FakeResource {
            fetch_fails: true,
            ..upstream(&["a"])
        };

        let err = resolve(&resource, "k").await.unwrap_err();

        assert!(matches!(err, ResolveError::Upstream { .. }));
        assert_eq!(resource.persists.load(Ordering::SeqCst), 0);
        assert!(resource.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persist_failure_still_returns_fresh_entries() {
        let resource = FakeResource {
            persist_fails: true,
            ..upstream(&["a", "b", "c"])
        };

        let rows = resolve(&resource, "k").await.unwrap();

        assert_eq!(rows, ["a", "b", "c"]);
        assert_eq!(resource.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lookup_from_rows() {
        assert_eq!(Lookup::<i32>::from_rows(vec![]), Lookup::Miss);
        assert_eq!(Lookup::from_rows(vec![1]), Lookup::Hit(vec![1]));
    }

    #[test]
    fn test_client_errors_map_by_kind() {
        let not_found: ResolveError = ClientError::NoResults {
            service: "Geocoding",
            query: "atlantis".to_string(),
        }
        .into();
        assert!(matches!(not_found, ResolveError::NotFound(q) if q == "atlantis"));

        let rejected: ResolveError = ClientError::Rejected {
            service: "Geocoding",
            message: "REQUEST_DENIED".to_string(),
        }
        .into();
        assert!(matches!(rejected, ResolveError::Upstream { .. }));

        let decode: ResolveError = ClientError::decode("Yelp", "missing field").into();
        assert!(matches!(
            decode,
            ResolveError::Normalization { service: "Yelp", .. }
        ));
    }
}
