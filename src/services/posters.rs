use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::providers::PosterProvider;

const POSTER_CACHE_TTL_SECS: i64 = 86_400; // 1 day

#[derive(Clone)]
struct CachedPoster {
    poster: Option<String>,
    cached_at: DateTime<Utc>,
}

/// Poster resolution with an in-process cache.
///
/// Definitive outcomes (found or not-found) are cached with a TTL. Transient
/// provider errors are not cached, so the next batch retries them.
#[derive(Clone)]
pub struct PosterService {
    provider: Arc<dyn PosterProvider>,
    cache: Arc<RwLock<HashMap<String, CachedPoster>>>,
}

impl PosterService {
    pub fn new(provider: Arc<dyn PosterProvider>) -> Self {
        Self {
            provider,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolves posters for a batch of titles in parallel.
    ///
    /// The returned vector is index-aligned with `titles`. A failed lookup
    /// degrades to `None` for that title and never fails the batch.
    pub async fn resolve_batch(&self, titles: Vec<String>) -> Vec<Option<String>> {
        tracing::debug!(title_count = titles.len(), "Resolving poster batch");

        let mut tasks = Vec::new();

        for title in titles {
            let service = self.clone();
            let task = tokio::spawn(async move { service.resolve_one(&title).await });
            tasks.push(task);
        }

        let mut posters = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(poster) => posters.push(poster),
                Err(e) => {
                    tracing::error!(error = %e, "Poster task join error");
                    posters.push(None);
                }
            }
        }

        posters
    }

    /// Resolves one title, consulting the cache first
    async fn resolve_one(&self, title: &str) -> Option<String> {
        if let Some(cached) = self.get_cached(title).await {
            tracing::debug!(title = %title, "Poster cache hit");
            return cached;
        }

        match self.provider.resolve(title).await {
            Ok(poster) => {
                self.store(title, poster.clone()).await;
                poster
            }
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    error = %e,
                    provider = self.provider.name(),
                    "Poster lookup failed"
                );
                None
            }
        }
    }

    async fn get_cached(&self, title: &str) -> Option<Option<String>> {
        let cache = self.cache.read().await;
        let entry = cache.get(title)?;
        if Utc::now() - entry.cached_at > Duration::seconds(POSTER_CACHE_TTL_SECS) {
            return None;
        }
        Some(entry.poster.clone())
    }

    async fn store(&self, title: &str, poster: Option<String>) {
        let mut cache = self.cache.write().await;
        cache.insert(
            title.to_string(),
            CachedPoster {
                poster,
                cached_at: Utc::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockPosterProvider;

    fn service(mock: MockPosterProvider) -> PosterService {
        PosterService::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_batch_is_index_aligned_with_titles() {
        let mut mock = MockPosterProvider::new();
        mock.expect_resolve()
            .returning(|title| Ok(Some(format!("https://img.test/{}.jpg", title))));

        let posters = service(mock)
            .resolve_batch(vec!["Heat".to_string(), "Alien".to_string()])
            .await;

        assert_eq!(
            posters,
            vec![
                Some("https://img.test/Heat.jpg".to_string()),
                Some("https://img.test/Alien.jpg".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_none_without_failing_batch() {
        let mut mock = MockPosterProvider::new();
        mock.expect_resolve()
            .returning(|title| match title {
                "Flaky" => Err(AppError::ExternalApi("provider down".to_string())),
                _ => Ok(Some("https://img.test/ok.jpg".to_string())),
            });
        mock.expect_name().return_const("mock");

        let posters = service(mock)
            .resolve_batch(vec!["Heat".to_string(), "Flaky".to_string(), "Alien".to_string()])
            .await;

        assert_eq!(posters.len(), 3);
        assert!(posters[0].is_some());
        assert!(posters[1].is_none());
        assert!(posters[2].is_some());
    }

    #[tokio::test]
    async fn test_found_poster_is_cached() {
        let mut mock = MockPosterProvider::new();
        mock.expect_resolve()
            .times(1)
            .returning(|_| Ok(Some("https://img.test/heat.jpg".to_string())));

        let service = service(mock);
        let first = service.resolve_batch(vec!["Heat".to_string()]).await;
        let second = service.resolve_batch(vec!["Heat".to_string()]).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_not_found_is_cached() {
        let mut mock = MockPosterProvider::new();
        mock.expect_resolve().times(1).returning(|_| Ok(None));

        let service = service(mock);
        assert_eq!(service.resolve_batch(vec!["Obscure".to_string()]).await, vec![None]);
        assert_eq!(service.resolve_batch(vec!["Obscure".to_string()]).await, vec![None]);
    }

    #[tokio::test]
    async fn test_transient_error_is_retried_on_next_batch() {
        let mut mock = MockPosterProvider::new();
        mock.expect_resolve()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("timeout".to_string())));
        mock.expect_resolve()
            .times(1)
            .returning(|_| Ok(Some("https://img.test/late.jpg".to_string())));
        mock.expect_name().return_const("mock");

        let service = service(mock);
        assert_eq!(service.resolve_batch(vec!["Heat".to_string()]).await, vec![None]);
        assert_eq!(
            service.resolve_batch(vec!["Heat".to_string()]).await,
            vec![Some("https://img.test/late.jpg".to_string())]
        );
    }
}
