//! Purpose: Hold the in-memory movie collection and its mutation rules.
//! Exports: `Movie`, `MovieId`, `Listing`, `Catalog`.
//! Role: Single-writer store behind the HTTP handlers; no I/O or logging here.
//! Invariants: Ids are unique; insertion order is preserved across reads.
//! Invariants: Records only enter through validated drafts or the seed loader.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::validate::{MovieDraft, MoviePatch};

/// Opaque unique identifier. Generated ids are v4 UUIDs; seed files may carry
/// arbitrary strings.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i64,
    pub director: String,
    pub genre: String,
}

/// Listing outcome; an empty filtered result is `NotFound` so the transport
/// can answer with a distinct status from an empty-but-valid list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listing {
    Found(Vec<Movie>),
    NotFound,
}

#[derive(Debug, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callers guarantee unique ids (the seed loader checks before handing over).
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// No filter returns every record in insertion order. A genre filter
    /// matches case-insensitively against the stored (case-preserved) genre.
    pub fn list(&self, genre: Option<&str>) -> Listing {
        let Some(genre) = genre else {
            return Listing::Found(self.movies.clone());
        };
        let wanted = genre.to_lowercase();
        let matches: Vec<Movie> = self
            .movies
            .iter()
            .filter(|movie| movie.genre.to_lowercase() == wanted)
            .cloned()
            .collect();
        if matches.is_empty() {
            Listing::NotFound
        } else {
            Listing::Found(matches)
        }
    }

    pub fn get(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| &movie.id == id)
    }

    /// Appends a record built from already-validated fields under a fresh id.
    /// Cannot fail; a generated-id collision is a programming defect.
    pub fn create(&mut self, draft: MovieDraft) -> Movie {
        let id = MovieId::random();
        debug_assert!(self.position(&id).is_none(), "generated movie id collided");
        let movie = Movie {
            id,
            title: draft.title,
            year: draft.year,
            director: draft.director,
            genre: draft.genre,
        };
        self.movies.push(movie.clone());
        movie
    }

    /// Merges patch fields onto the stored record in place at its original
    /// position. The patch type carries no id, so the stored id survives.
    pub fn update(&mut self, id: &MovieId, patch: MoviePatch) -> Option<Movie> {
        let index = self.position(id)?;
        let movie = &mut self.movies[index];
        if let Some(title) = patch.title {
            movie.title = title;
        }
        if let Some(year) = patch.year {
            movie.year = year;
        }
        if let Some(director) = patch.director {
            movie.director = director;
        }
        if let Some(genre) = patch.genre {
            movie.genre = genre;
        }
        Some(movie.clone())
    }

    /// Removes the record from the backing vector; later records shift up.
    pub fn delete(&mut self, id: &MovieId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.movies.remove(index);
        true
    }

    fn position(&self, id: &MovieId) -> Option<usize> {
        self.movies.iter().position(|movie| &movie.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Listing, Movie, MovieId};
    use crate::core::validate::{MovieDraft, MoviePatch, validate_partial_movie};
    use serde_json::json;

    fn draft(title: &str, genre: &str) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            year: 2000,
            director: "D".to_string(),
            genre: genre.to_string(),
        }
    }

    fn seeded() -> Catalog {
        Catalog::from_movies(vec![Movie {
            id: MovieId::from("1"),
            title: "A".to_string(),
            year: 2000,
            director: "D".to_string(),
            genre: "Action".to_string(),
        }])
    }

    #[test]
    fn create_assigns_fresh_unique_ids() {
        let mut catalog = seeded();
        let first = catalog.create(draft("B", "Drama"));
        let second = catalog.create(draft("C", "Drama"));
        assert_ne!(first.id, second.id);
        assert_ne!(first.id, MovieId::from("1"));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut catalog = Catalog::new();
        let created = catalog.create(draft("Ran", "Drama"));
        let fetched = catalog.get(&created.id).expect("found");
        assert_eq!(fetched, &created);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let catalog = seeded();
        assert!(catalog.get(&MovieId::from("missing")).is_none());
    }

    #[test]
    fn list_without_filter_returns_all_in_insertion_order() {
        let mut catalog = seeded();
        let second = catalog.create(draft("B", "Drama"));
        match catalog.list(None) {
            Listing::Found(movies) => {
                assert_eq!(movies.len(), 2);
                assert_eq!(movies[0].id, MovieId::from("1"));
                assert_eq!(movies[1].id, second.id);
            }
            Listing::NotFound => panic!("unfiltered list is always found"),
        }
    }

    #[test]
    fn list_without_filter_on_empty_catalog_is_found_and_empty() {
        let catalog = Catalog::new();
        assert_eq!(catalog.list(None), Listing::Found(Vec::new()));
    }

    #[test]
    fn genre_filter_matches_case_insensitively() {
        let catalog = seeded();
        match catalog.list(Some("action")) {
            Listing::Found(movies) => {
                assert_eq!(movies.len(), 1);
                assert_eq!(movies[0].title, "A");
                // Stored genre keeps its original casing.
                assert_eq!(movies[0].genre, "Action");
            }
            Listing::NotFound => panic!("expected a match"),
        }
    }

    #[test]
    fn genre_filter_without_matches_is_not_found() {
        let catalog = seeded();
        assert_eq!(catalog.list(Some("drama")), Listing::NotFound);
    }

    #[test]
    fn empty_patch_leaves_record_unchanged() {
        let mut catalog = seeded();
        let id = MovieId::from("1");
        let before = catalog.get(&id).expect("found").clone();
        let after = catalog.update(&id, MoviePatch::default()).expect("updated");
        assert_eq!(after, before);
        assert_eq!(catalog.get(&id), Some(&before));
    }

    #[test]
    fn patch_overwrites_present_fields_and_keeps_the_rest() {
        let mut catalog = seeded();
        let id = MovieId::from("1");
        let patch = MoviePatch {
            year: Some(2011),
            genre: Some("Thriller".to_string()),
            ..MoviePatch::default()
        };
        let updated = catalog.update(&id, patch).expect("updated");
        assert_eq!(updated.year, 2011);
        assert_eq!(updated.genre, "Thriller");
        assert_eq!(updated.title, "A");
        assert_eq!(updated.director, "D");
        assert_eq!(updated.id, id);
    }

    #[test]
    fn patch_cannot_overwrite_id_even_when_input_carries_one() {
        let mut catalog = seeded();
        let id = MovieId::from("1");
        let patch = validate_partial_movie(&json!({ "id": "99", "title": "B" })).expect("valid");
        let updated = catalog.update(&id, patch).expect("updated");
        assert_eq!(updated.id, id);
        assert_eq!(updated.title, "B");
        assert!(catalog.get(&MovieId::from("99")).is_none());
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut catalog = seeded();
        assert!(catalog.update(&MovieId::from("missing"), MoviePatch::default()).is_none());
    }

    #[test]
    fn update_keeps_record_at_its_original_position() {
        let mut catalog = seeded();
        let second = catalog.create(draft("B", "Drama"));
        catalog
            .update(&MovieId::from("1"), MoviePatch {
                title: Some("A2".to_string()),
                ..MoviePatch::default()
            })
            .expect("updated");
        match catalog.list(None) {
            Listing::Found(movies) => {
                assert_eq!(movies[0].title, "A2");
                assert_eq!(movies[1].id, second.id);
            }
            Listing::NotFound => panic!("unfiltered list is always found"),
        }
    }

    #[test]
    fn delete_removes_the_record_from_the_backing_sequence() {
        let mut catalog = seeded();
        let id = MovieId::from("1");
        assert!(catalog.delete(&id));
        assert!(catalog.get(&id).is_none());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn delete_unknown_id_reports_not_found_and_leaves_catalog_intact() {
        let mut catalog = seeded();
        assert!(!catalog.delete(&MovieId::from("missing")));
        assert_eq!(catalog.len(), 1);
    }
}
