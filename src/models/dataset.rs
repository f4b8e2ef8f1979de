use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::{MovieId, UserId};

/// Raw dataset document as stored on disk.
///
/// Catalog keys are JSON object keys and therefore strings; they are parsed
/// into numeric ids during conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDocument {
    movies: HashMap<String, String>,
    users: Vec<UserRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct UserRecord {
    user_id: UserId,
    movies: Vec<MovieId>,
}

/// A user and the movies they liked
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub liked: Vec<MovieId>,
}

/// The static movie catalog and user base, loaded once at startup.
///
/// The catalog is a `BTreeMap` so the grid iterates in ascending id order.
#[derive(Debug)]
pub struct Dataset {
    catalog: BTreeMap<MovieId, String>,
    users: Vec<User>,
}

impl Dataset {
    /// Loads the dataset from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file {}", path.display()))?;
        let document: DatasetDocument = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse dataset file {}", path.display()))?;

        let dataset = Self::from_document(document);

        tracing::info!(
            movies = dataset.catalog.len(),
            users = dataset.users.len(),
            path = %path.display(),
            "Loaded dataset"
        );

        Ok(dataset)
    }

    /// Builds a dataset from a parsed document.
    ///
    /// Catalog keys that do not parse as numeric ids are skipped with a
    /// warning. User records referencing unknown movie ids are kept as-is;
    /// such entries are inert downstream.
    pub fn from_document(document: DatasetDocument) -> Self {
        let mut catalog = BTreeMap::new();
        for (key, title) in document.movies {
            match key.parse::<MovieId>() {
                Ok(id) => {
                    catalog.insert(id, title);
                }
                Err(_) => {
                    tracing::warn!(key = %key, "Skipping catalog entry with non-numeric id");
                }
            }
        }

        let users = document
            .users
            .into_iter()
            .map(|record| User {
                id: record.user_id,
                liked: record.movies,
            })
            .collect();

        Self { catalog, users }
    }

    /// Title for a movie id, if present in the catalog
    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.catalog.get(&id).map(String::as_str)
    }

    /// Whether the catalog contains this movie id
    pub fn contains(&self, id: MovieId) -> bool {
        self.catalog.contains_key(&id)
    }

    /// Catalog entries in ascending id order
    pub fn catalog(&self) -> impl Iterator<Item = (MovieId, &str)> {
        self.catalog.iter().map(|(id, title)| (*id, title.as_str()))
    }

    /// All users in document order
    pub fn users(&self) -> &[User] {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_document(value: serde_json::Value) -> DatasetDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_document_conversion() {
        let document = parse_document(json!({
            "movies": { "1": "Heat", "2": "Alien", "10": "Ronin" },
            "users": [
                { "user_id": 1, "movies": [1, 2] },
                { "user_id": 2, "movies": [10] }
            ]
        }));

        let dataset = Dataset::from_document(document);

        assert_eq!(dataset.title(1), Some("Heat"));
        assert_eq!(dataset.title(2), Some("Alien"));
        assert_eq!(dataset.title(10), Some("Ronin"));
        assert_eq!(dataset.title(99), None);
        assert_eq!(dataset.users().len(), 2);
        assert_eq!(dataset.users()[0].liked, vec![1, 2]);
    }

    #[test]
    fn test_catalog_iterates_in_ascending_id_order() {
        let document = parse_document(json!({
            "movies": { "30": "C", "2": "A", "11": "B" },
            "users": []
        }));

        let dataset = Dataset::from_document(document);
        let ids: Vec<u32> = dataset.catalog().map(|(id, _)| id).collect();

        assert_eq!(ids, vec![2, 11, 30]);
    }

    #[test]
    fn test_non_numeric_catalog_key_is_skipped() {
        let document = parse_document(json!({
            "movies": { "1": "Heat", "abc": "Broken" },
            "users": []
        }));

        let dataset = Dataset::from_document(document);

        assert_eq!(dataset.catalog().count(), 1);
        assert_eq!(dataset.title(1), Some("Heat"));
    }

    #[test]
    fn test_user_with_unknown_movie_id_is_kept() {
        let document = parse_document(json!({
            "movies": { "1": "Heat" },
            "users": [ { "user_id": 7, "movies": [1, 999] } ]
        }));

        let dataset = Dataset::from_document(document);

        assert!(!dataset.contains(999));
        assert_eq!(dataset.users()[0].liked, vec![1, 999]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Dataset::from_path("does/not/exist.json");
        assert!(result.is_err());
    }
}
