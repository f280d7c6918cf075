//! Purpose: Load the startup movie collection from a JSON seed file.
//! Exports: `load_seed`.
//! Role: One-shot bootstrap input; mutations never flow back to the file.
//! Invariants: Every seed record passes full validation; ids are unique.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::core::catalog::{Movie, MovieId};
use crate::core::error::{Error, ErrorKind};
use crate::core::validate::validate_movie;

/// Reads a JSON array of movie entries. Seed ids are taken verbatim; the
/// remaining fields go through the same validation as the public API.
pub fn load_seed(path: &Path) -> Result<Vec<Movie>, Error> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::Io,
        };
        Error::new(kind)
            .with_message("failed to read seed file")
            .with_path(path)
            .with_source(err)
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|err| {
        Error::new(ErrorKind::Validation)
            .with_message("seed file is not valid JSON")
            .with_path(path)
            .with_source(err)
    })?;
    let entries = value.as_array().ok_or_else(|| {
        Error::new(ErrorKind::Validation)
            .with_message("seed file must contain a JSON array of movies")
            .with_path(path)
    })?;

    let mut movies = Vec::with_capacity(entries.len());
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| seed_entry_error(path, index, "missing string `id`"))?;
        let draft = validate_movie(entry).map_err(|errors| {
            let fields = errors.keys().cloned().collect::<Vec<_>>().join(", ");
            seed_entry_error(path, index, &format!("invalid fields: {fields}"))
        })?;
        let id = MovieId::from(id);
        if !seen.insert(id.clone()) {
            return Err(seed_entry_error(path, index, &format!("duplicate id `{id}`")));
        }
        movies.push(Movie {
            id,
            title: draft.title,
            year: draft.year,
            director: draft.director,
            genre: draft.genre,
        });
    }
    Ok(movies)
}

fn seed_entry_error(path: &Path, index: usize, detail: &str) -> Error {
    Error::new(ErrorKind::Validation)
        .with_message(format!("seed entry {index}: {detail}"))
        .with_path(path)
        .with_hint("Each seed entry needs a unique id plus valid title, year, director, and genre.")
}
