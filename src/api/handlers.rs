use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{MovieId, RecommendationEntry};
use crate::services::Recommender;

use super::state::{AppState, RecommendedMovie};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub movie_id: MovieId,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub poster: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub movie_id: String,
    pub selected: bool,
    pub generation: u64,
    pub recommendations: Vec<RecommendedMovie>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selected: Vec<String>,
    pub generation: u64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendedMovie>,
    pub generation: u64,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// The selectable movie grid.
///
/// Posters for the whole catalog are resolved as one concurrent batch and the
/// response waits for all of them; a partial grid is never returned.
pub async fn get_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieResponse>>> {
    let titles: Vec<String> = state
        .dataset
        .catalog()
        .map(|(_, title)| title.to_string())
        .collect();
    let posters = state.posters.resolve_batch(titles).await;

    let inner = state.inner.read().await;
    let movies = state
        .dataset
        .catalog()
        .zip(posters)
        .map(|((id, title), poster)| MovieResponse {
            id: id.to_string(),
            title: title.to_string(),
            poster,
            selected: inner.selection.contains(id),
        })
        .collect();

    Ok(Json(movies))
}

/// Flips one movie's selection state and recomputes recommendations
pub async fn toggle_selection(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> AppResult<Json<ToggleResponse>> {
    let movie_id = request.movie_id;
    if !state.dataset.contains(movie_id) {
        return Err(AppError::NotFound(format!("Unknown movie id {}", movie_id)));
    }

    // Toggle and recompute synchronously under the write lock; poster
    // resolution happens after it is released.
    let (selected, generation, entries) = {
        let mut inner = state.inner.write().await;
        let selected = inner.selection.toggle(movie_id);
        inner.generation += 1;
        let entries = Recommender::new(&state.dataset).recommend(&inner.selection);
        (selected, inner.generation, entries)
    };

    tracing::info!(
        movie_id,
        selected,
        generation,
        recommendations = entries.len(),
        "Selection toggled"
    );

    let recommendations = enrich_with_posters(&state, entries).await;

    state
        .publish_recommendations(generation, recommendations.clone())
        .await;

    Ok(Json(ToggleResponse {
        movie_id: movie_id.to_string(),
        selected,
        generation,
        recommendations,
    }))
}

/// Currently selected movie ids
pub async fn get_selection(State(state): State<AppState>) -> Json<SelectionResponse> {
    let inner = state.inner.read().await;
    Json(SelectionResponse {
        selected: inner
            .selection
            .ids_sorted()
            .iter()
            .map(|id| id.to_string())
            .collect(),
        generation: inner.generation,
    })
}

/// The last published recommendation list
pub async fn get_recommendations(State(state): State<AppState>) -> Json<RecommendationsResponse> {
    let inner = state.inner.read().await;
    Json(RecommendationsResponse {
        recommendations: inner.published.entries.clone(),
        generation: inner.published.generation,
    })
}

/// Resolves posters for a freshly computed recommendation list.
///
/// The engine only emits catalog ids, so the title lookup cannot miss; the
/// filter keeps the handler total anyway.
async fn enrich_with_posters(
    state: &AppState,
    entries: Vec<RecommendationEntry>,
) -> Vec<RecommendedMovie> {
    let titled: Vec<(MovieId, String, u32)> = entries
        .iter()
        .filter_map(|entry| {
            state
                .dataset
                .title(entry.movie_id)
                .map(|title| (entry.movie_id, title.to_string(), entry.count))
        })
        .collect();

    let titles: Vec<String> = titled.iter().map(|(_, title, _)| title.clone()).collect();
    let posters = state.posters.resolve_batch(titles).await;

    titled
        .into_iter()
        .zip(posters)
        .map(|((movie_id, title, count), poster)| RecommendedMovie {
            id: movie_id.to_string(),
            title,
            poster,
            count,
        })
        .collect()
}
