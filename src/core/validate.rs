//! Purpose: Validate loose JSON request bodies into typed movie fields.
//! Exports: `FieldErrors`, `MovieDraft`, `MoviePatch`, `validate_movie`, `validate_partial_movie`.
//! Role: Boundary between untyped transport input and the typed catalog.
//! Invariants: All failing fields are reported together, not first-error-only.
//! Invariants: Unknown input fields are ignored; the normalized shape stays closed.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const YEAR_MIN: i64 = 1900;
pub const YEAR_MAX: i64 = 2025;

/// Field name mapped to a human-readable message, ordered for stable output.
pub type FieldErrors = BTreeMap<String, String>;

/// A full set of validated movie fields, ready for `Catalog::create`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub year: i64,
    pub director: String,
    pub genre: String,
}

/// The validated subset of fields present in a partial-update body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i64>,
    pub director: Option<String>,
    pub genre: Option<String>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.year.is_none() && self.director.is_none() && self.genre.is_none()
    }
}

/// Validate a full movie body. Every declared field must be present and
/// well-typed; failures across fields are collected into one error map.
pub fn validate_movie(input: &Value) -> Result<MovieDraft, FieldErrors> {
    let empty = Map::new();
    let object = input.as_object().unwrap_or(&empty);
    let mut errors = FieldErrors::new();

    let title = require_title(object, &mut errors);
    let year = require_year(object, &mut errors);
    let director = require_string(object, "director", &mut errors);
    let genre = require_string(object, "genre", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(MovieDraft {
        title: title.expect("checked"),
        year: year.expect("checked"),
        director: director.expect("checked"),
        genre: genre.expect("checked"),
    })
}

/// Validate a partial movie body. Per-field rules match `validate_movie`, but
/// absent fields are not errors; an empty object yields an empty patch.
pub fn validate_partial_movie(input: &Value) -> Result<MoviePatch, FieldErrors> {
    let Some(object) = input.as_object() else {
        let mut errors = FieldErrors::new();
        errors.insert("body".to_string(), "body must be a JSON object".to_string());
        return Err(errors);
    };
    let mut errors = FieldErrors::new();
    let mut patch = MoviePatch::default();

    if object.contains_key("title") {
        patch.title = require_title(object, &mut errors);
    }
    if object.contains_key("year") {
        patch.year = require_year(object, &mut errors);
    }
    if object.contains_key("director") {
        patch.director = require_string(object, "director", &mut errors);
    }
    if object.contains_key("genre") {
        patch.genre = require_string(object, "genre", &mut errors);
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(patch)
}

fn require_title(object: &Map<String, Value>, errors: &mut FieldErrors) -> Option<String> {
    let title = require_string(object, "title", errors)?;
    if title.is_empty() {
        errors.insert("title".to_string(), "title must not be empty".to_string());
        return None;
    }
    Some(title)
}

fn require_year(object: &Map<String, Value>, errors: &mut FieldErrors) -> Option<i64> {
    let Some(value) = object.get("year") else {
        errors.insert("year".to_string(), "year is required".to_string());
        return None;
    };
    let Some(year) = value.as_i64() else {
        errors.insert("year".to_string(), "year must be an integer".to_string());
        return None;
    };
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        errors.insert(
            "year".to_string(),
            format!("year must be between {YEAR_MIN} and {YEAR_MAX}"),
        );
        return None;
    }
    Some(year)
}

fn require_string(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match object.get(field) {
        None => {
            errors.insert(field.to_string(), format!("{field} is required"));
            None
        }
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.insert(field.to_string(), format!("{field} must be a string"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MoviePatch, validate_movie, validate_partial_movie};
    use serde_json::json;

    #[test]
    fn full_valid_input_normalizes_all_fields() {
        let draft = validate_movie(&json!({
            "title": "Alien",
            "year": 1979,
            "director": "Ridley Scott",
            "genre": "Sci-Fi",
        }))
        .expect("valid");
        assert_eq!(draft.title, "Alien");
        assert_eq!(draft.year, 1979);
        assert_eq!(draft.director, "Ridley Scott");
        assert_eq!(draft.genre, "Sci-Fi");
    }

    #[test]
    fn full_missing_title_reports_title_key() {
        let errors = validate_movie(&json!({
            "year": 2001,
            "director": "D",
            "genre": "Drama",
        }))
        .expect_err("invalid");
        assert_eq!(errors.get("title").map(String::as_str), Some("title is required"));
    }

    #[test]
    fn full_non_string_title_reports_type_error() {
        let errors = validate_movie(&json!({
            "title": 7,
            "year": 2001,
            "director": "D",
            "genre": "Drama",
        }))
        .expect_err("invalid");
        assert_eq!(
            errors.get("title").map(String::as_str),
            Some("title must be a string")
        );
    }

    #[test]
    fn full_collects_every_failing_field() {
        let errors = validate_movie(&json!({
            "title": "",
            "year": "not a year",
        }))
        .expect_err("invalid");
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("year"));
        assert!(errors.contains_key("director"));
        assert!(errors.contains_key("genre"));
    }

    #[test]
    fn full_rejects_year_below_range() {
        let errors = validate_movie(&json!({
            "title": "B",
            "year": 1899,
            "director": "D",
            "genre": "X",
        }))
        .expect_err("invalid");
        assert_eq!(
            errors.get("year").map(String::as_str),
            Some("year must be between 1900 and 2025")
        );
    }

    #[test]
    fn full_rejects_year_above_range_and_fractional_year() {
        let above = validate_movie(&json!({
            "title": "B",
            "year": 2026,
            "director": "D",
            "genre": "X",
        }))
        .expect_err("invalid");
        assert!(above.contains_key("year"));

        let fractional = validate_movie(&json!({
            "title": "B",
            "year": 1999.5,
            "director": "D",
            "genre": "X",
        }))
        .expect_err("invalid");
        assert_eq!(
            fractional.get("year").map(String::as_str),
            Some("year must be an integer")
        );
    }

    #[test]
    fn full_ignores_unknown_fields() {
        let draft = validate_movie(&json!({
            "title": "Heat",
            "year": 1995,
            "director": "Michael Mann",
            "genre": "Crime",
            "rating": 8.3,
            "poster": "https://example.test/heat.jpg",
        }))
        .expect("valid");
        assert_eq!(draft.title, "Heat");
    }

    #[test]
    fn full_non_object_body_reports_every_required_field() {
        let errors = validate_movie(&json!("not an object")).expect_err("invalid");
        assert_eq!(errors.len(), 4);
        assert!(errors.values().all(|message| message.ends_with("is required")));
    }

    #[test]
    fn partial_empty_input_is_valid_and_empty() {
        let patch = validate_partial_movie(&json!({})).expect("valid");
        assert_eq!(patch, MoviePatch::default());
        assert!(patch.is_empty());
    }

    #[test]
    fn partial_checks_only_present_fields() {
        let patch = validate_partial_movie(&json!({ "year": 2010 })).expect("valid");
        assert_eq!(patch.year, Some(2010));
        assert!(patch.title.is_none());

        let errors = validate_partial_movie(&json!({ "year": 1899 })).expect_err("invalid");
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("year"));
    }

    #[test]
    fn partial_ignores_unknown_fields() {
        let patch = validate_partial_movie(&json!({ "rating": 9.1 })).expect("valid");
        assert!(patch.is_empty());
    }

    #[test]
    fn partial_rejects_non_object_body() {
        let errors = validate_partial_movie(&json!([1, 2, 3])).expect_err("invalid");
        assert!(errors.contains_key("body"));
    }
}
