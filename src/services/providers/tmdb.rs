/// TMDB search API provider
///
/// Resolves a movie title to a poster image URL via `/search/movie`, taking
/// the first result's `poster_path` and joining it onto the image base URL.
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

use super::PosterProvider;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    read_token: String,
    api_url: String,
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    poster_path: Option<String>,
}

impl TmdbProvider {
    pub fn new(read_token: String, api_url: String, image_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            read_token,
            api_url,
            image_url,
        }
    }

    /// Reduces a title to its leading run of letters and spaces.
    ///
    /// Catalog titles carry trailing years ("Heat (1995)") that spoil TMDB
    /// search matches. A title with no leading run is queried as-is.
    fn search_query(title: &str) -> &str {
        let end = title
            .find(|c: char| !c.is_ascii_alphabetic() && c != ' ')
            .unwrap_or(title.len());
        let run = title[..end].trim_end();
        if run.is_empty() {
            title
        } else {
            run
        }
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn resolve(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Poster query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.read_token)
            .query(&[
                ("query", Self::search_query(title)),
                ("include_adult", "false"),
                ("language", "en-US"),
                ("page", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response.json().await?;

        let poster = search
            .results
            .first()
            .and_then(|result| result.poster_path.as_deref())
            .map(|path| format!("{}{}", self.image_url, path));

        tracing::debug!(
            title = %title,
            found = poster.is_some(),
            provider = "tmdb",
            "Poster lookup completed"
        );

        Ok(poster)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
