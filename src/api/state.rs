use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::{Dataset, SelectionSet};
use crate::services::PosterService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub posters: PosterService,
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified
pub struct AppStateInner {
    pub selection: SelectionSet,
    /// Bumped on every toggle; poster batches computed under an older value
    /// are discarded instead of published.
    pub generation: u64,
    pub published: PublishedRecommendations,
}

/// The last recommendation list published to readers, tagged with the
/// generation it was computed under
#[derive(Debug, Clone, Default)]
pub struct PublishedRecommendations {
    pub generation: u64,
    pub entries: Vec<RecommendedMovie>,
}

/// A poster-enriched recommendation ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedMovie {
    pub id: String,
    pub title: String,
    pub poster: Option<String>,
    pub count: u32,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, posters: PosterService) -> Self {
        Self {
            dataset,
            posters,
            inner: Arc::new(RwLock::new(AppStateInner {
                selection: SelectionSet::new(),
                generation: 0,
                published: PublishedRecommendations::default(),
            })),
        }
    }

    /// Publishes a poster-enriched recommendation list, unless a newer toggle
    /// superseded the generation it was computed under.
    ///
    /// Returns `true` if the list was published.
    pub async fn publish_recommendations(
        &self,
        generation: u64,
        entries: Vec<RecommendedMovie>,
    ) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            tracing::debug!(
                computed = generation,
                current = inner.generation,
                "Discarding stale recommendation batch"
            );
            return false;
        }
        inner.published = PublishedRecommendations { generation, entries };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockPosterProvider;
    use serde_json::json;

    fn test_state() -> AppState {
        let document = serde_json::from_value(json!({
            "movies": { "1": "A" },
            "users": []
        }))
        .unwrap();
        let dataset = Arc::new(Dataset::from_document(document));
        let posters = PosterService::new(Arc::new(MockPosterProvider::new()));
        AppState::new(dataset, posters)
    }

    fn entry(id: &str) -> RecommendedMovie {
        RecommendedMovie {
            id: id.to_string(),
            title: "A".to_string(),
            poster: None,
            count: 1,
        }
    }

    #[tokio::test]
    async fn test_current_generation_is_published() {
        let state = test_state();
        state.inner.write().await.generation = 3;

        assert!(state.publish_recommendations(3, vec![entry("1")]).await);

        let inner = state.inner.read().await;
        assert_eq!(inner.published.generation, 3);
        assert_eq!(inner.published.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_batch_never_overwrites_newer_state() {
        let state = test_state();
        state.inner.write().await.generation = 5;
        assert!(state.publish_recommendations(5, vec![entry("1")]).await);

        // A newer toggle supersedes generation 5 while its posters are in
        // flight; the slow batch arrives late and must be dropped.
        state.inner.write().await.generation = 6;
        assert!(!state.publish_recommendations(5, Vec::new()).await);

        let inner = state.inner.read().await;
        assert_eq!(inner.published.generation, 5);
        assert_eq!(inner.published.entries.len(), 1);
    }
}
