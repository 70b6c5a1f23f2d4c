//! Lazy, coalesced, error-memoizing repository manager (spec §4.12, §5).
//!
//! A library's [`Repository`] is only built on first use, concurrent
//! first-uses of the same library share one in-flight build rather than
//! racing duplicate fetches, and a build failure is memoized so a broken
//! library fails fast on every subsequent call instead of retrying the
//! network on every tool invocation.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::Shared;
use futures::FutureExt;
use tokio::sync::Mutex;

use crate::config::LibrariesConfig;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::repository::Repository;
use crate::types::LibraryStatus;

type PendingBuild = Shared<std::pin::Pin<Box<dyn std::future::Future<Output = Result<Arc<Repository>>> + Send>>>;

/// Owns the lazily-initialized [`Repository`] for every configured library.
pub struct Manager {
    config: LibrariesConfig,
    fetcher: Arc<Fetcher>,
    ready: Mutex<HashMap<String, Arc<Repository>>>,
    failed: Mutex<HashMap<String, Error>>,
    pending: Mutex<HashMap<String, PendingBuild>>,
}

impl Manager {
    /// Builds a manager over `config`. Repositories are not built until
    /// first requested via [`Manager::get`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the shared HTTP client cannot be built.
    pub fn new(config: LibrariesConfig) -> Result<Self> {
        Ok(Self {
            config,
            fetcher: Arc::new(Fetcher::new()?),
            ready: Mutex::new(HashMap::new()),
            failed: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the repository for `library_id`, initializing it on first
    /// use and memoizing both success and failure.
    ///
    /// # Errors
    ///
    /// - [`Error::LibraryNotFound`] if `library_id` is not configured.
    /// - [`Error::LibraryInitializationFailed`] if a previous (or this)
    ///   build attempt failed.
    pub async fn get(&self, library_id: &str) -> Result<Arc<Repository>> {
        let Some(lib_config) = self.config.get(library_id) else {
            return Err(Error::LibraryNotFound {
                id: library_id.to_string(),
                available: self.config.ids(),
            });
        };

        if let Some(repo) = self.ready.lock().await.get(library_id) {
            return Ok(Arc::clone(repo));
        }
        if let Some(err) = self.failed.lock().await.get(library_id) {
            return Err(err.clone());
        }

        let shared = {
            let mut pending = self.pending.lock().await;
            if let Some(existing) = pending.get(library_id) {
                existing.clone()
            } else {
                let index_url = lib_config.index_url.clone();
                let fetcher = Arc::clone(&self.fetcher);
                let future: std::pin::Pin<Box<dyn std::future::Future<Output = Result<Arc<Repository>>> + Send>> =
                    Box::pin(async move { Repository::build(&fetcher, &index_url).await.map(Arc::new) });
                let shared = future.shared();
                pending.insert(library_id.to_string(), shared.clone());
                shared
            }
        };

        let result = shared.await;

        self.pending.lock().await.remove(library_id);
        match result {
            Ok(repo) => {
                self.ready.lock().await.insert(library_id.to_string(), Arc::clone(&repo));
                Ok(repo)
            },
            Err(err) => {
                let memoized = err.into_init_failure(library_id);
                self.failed.lock().await.insert(library_id.to_string(), memoized.clone());
                Err(memoized)
            },
        }
    }

    /// Reports availability for every configured library without forcing
    /// initialization of libraries that haven't been requested yet.
    pub async fn statuses(&self) -> Vec<LibraryStatus> {
        let failed = self.failed.lock().await;
        self.config
            .ids()
            .into_iter()
            .map(|id| match failed.get(&id) {
                Some(err) => LibraryStatus {
                    id,
                    available: false,
                    error: Some(err.to_string()),
                },
                None => LibraryStatus {
                    id,
                    available: true,
                    error: None,
                },
            })
            .collect()
    }

    /// Clears all memoized state, for test isolation only.
    #[cfg(test)]
    pub async fn clear(&self) {
        self.ready.lock().await.clear();
        self.failed.lock().await.clear();
        self.pending.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LibraryConfig;

    fn config_with(id: &str, index_url: &str) -> LibrariesConfig {
        LibrariesConfig {
            libraries: vec![LibraryConfig {
                id: id.to_string(),
                index_url: index_url.to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn unconfigured_library_returns_not_found() {
        let manager = Manager::new(config_with("react", "https://example.invalid/llms.txt")).unwrap();

        let err = manager.get("vue").await.unwrap_err();

        assert!(matches!(err, Error::LibraryNotFound { id, .. } if id == "vue"));
    }

    #[tokio::test]
    async fn failed_initialization_is_memoized() {
        let manager = Manager::new(config_with("react", "not a url")).unwrap();

        let first = manager.get("react").await.unwrap_err();
        assert!(matches!(first, Error::LibraryInitializationFailed { ref id, .. } if id == "react"));

        let second = manager.get("react").await.unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
    }

    #[tokio::test]
    async fn failure_message_is_not_wrapped_twice() {
        let manager = Manager::new(config_with("react", "not a url")).unwrap();

        let err = manager.get("react").await.unwrap_err().to_string();

        assert_eq!(err.matches("failed to initialize library").count(), 1);
    }

    #[tokio::test]
    async fn concurrent_requests_for_a_failing_library_observe_one_outcome() {
        let manager = Arc::new(Manager::new(config_with("react", "not a url")).unwrap());

        let (a, b) = tokio::join!(
            { let m = Arc::clone(&manager); async move { m.get("react").await } },
            { let m = Arc::clone(&manager); async move { m.get("react").await } },
        );

        assert_eq!(a.unwrap_err().to_string(), b.unwrap_err().to_string());
    }

    #[tokio::test]
    async fn statuses_reports_uninitialized_libraries_as_available() {
        let manager = Manager::new(config_with("react", "https://example.invalid/llms.txt")).unwrap();

        let statuses = manager.statuses().await;

        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].available);
        assert!(statuses[0].error.is_none());
    }

    #[tokio::test]
    async fn statuses_reports_failed_libraries_as_unavailable() {
        let manager = Manager::new(config_with("react", "not a url")).unwrap();
        let _ = manager.get("react").await;

        let statuses = manager.statuses().await;

        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].available);
        assert!(statuses[0].error.is_some());
    }
}
