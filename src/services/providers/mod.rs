use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Poster lookup abstraction.
///
/// The grid and the recommendation list both need poster images for catalog
/// titles; this trait keeps the lookup pluggable so tests run without the
/// network. `Ok(Some(url))` is a definitive hit, `Ok(None)` a definitive miss
/// (the provider does not know the title), and `Err` a transient failure
/// worth retrying on a later batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Resolves a movie title to a poster image URL
    async fn resolve(&self, title: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
