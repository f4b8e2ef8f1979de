use std::collections::HashMap;

use crate::models::{Dataset, MovieId, RecommendationEntry, SelectionSet, User};

/// Maximum number of entries in a recommendation list
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Co-occurrence recommender over the static dataset.
///
/// Pure and deterministic: given the viewer's selection, finds users who
/// share at least one selected movie, tallies the other movies those users
/// liked, and ranks the top results. Performs no I/O.
pub struct Recommender<'a> {
    dataset: &'a Dataset,
}

impl<'a> Recommender<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Ranks movies liked by users whose taste overlaps the selection.
    ///
    /// Entries are sorted by count descending and truncated to
    /// [`MAX_RECOMMENDATIONS`]. The sort is stable, so ties keep their
    /// first-discovery order (user base order, then each user's liked-list
    /// order). Selected movies and ids absent from the catalog never appear.
    /// An empty selection yields an empty list.
    pub fn recommend(&self, selection: &SelectionSet) -> Vec<RecommendationEntry> {
        if selection.is_empty() {
            return Vec::new();
        }

        let similar_users = self
            .dataset
            .users()
            .iter()
            .filter(|user| self.shares_selection(user, selection));

        // Tally in discovery order so the stable sort below can break ties
        // by first appearance.
        let mut entries: Vec<RecommendationEntry> = Vec::new();
        let mut positions: HashMap<MovieId, usize> = HashMap::new();

        for user in similar_users {
            for &movie_id in &user.liked {
                if selection.contains(movie_id) || !self.dataset.contains(movie_id) {
                    continue;
                }
                match positions.get(&movie_id) {
                    Some(&at) => entries[at].count += 1,
                    None => {
                        positions.insert(movie_id, entries.len());
                        entries.push(RecommendationEntry { movie_id, count: 1 });
                    }
                }
            }
        }

        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(MAX_RECOMMENDATIONS);
        entries
    }

    fn shares_selection(&self, user: &User, selection: &SelectionSet) -> bool {
        user.liked.iter().any(|&id| selection.contains(id))
    }
}
