pub mod dataset;
pub mod selection;

pub use dataset::{Dataset, User};
pub use selection::SelectionSet;

/// Identifier for a movie in the catalog.
///
/// Numeric in the dataset document (JSON object keys are parsed), stringified
/// at the UI boundary in API responses.
pub type MovieId = u32;

/// Identifier for a user in the dataset
pub type UserId = u32;

/// One ranked recommendation: a movie and how many taste-matched users liked it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationEntry {
    pub movie_id: MovieId,
    pub count: u32,
}
