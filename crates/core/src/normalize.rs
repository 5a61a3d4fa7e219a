//! Raw backend records to canonical [`Movie`]s.
//!
//! Search documents come from more than one ingestion path, so the same
//! field can show up under several keys. Every function here is total: a
//! missing or malformed field falls back to its default instead of failing.

use serde_json::Value;

use crate::{Movie, MovieId};

const UNTITLED: &str = "Untitled";

/// Coerce a list-ish value into an ordered list of strings.
///
/// - falsy values (`null`, `false`, `0`, `""`) give an empty list
/// - arrays keep their truthy entries in order
/// - strings are split on commas, trimmed, and empty pieces dropped
/// - anything else gives an empty list
pub fn to_array(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(list_entry).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn list_entry(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        // TMDB shape: { "id": 28, "name": "Action" }
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// Normalize a single record. Non-object input is treated as `{}`.
pub fn normalize_movie(raw: &Value) -> Movie {
    let id = first_present(raw, &["id", "movie_id", "_id"]).and_then(MovieId::from_json);
    let title = first_present(raw, &["title", "name"])
        .and_then(scalar_text)
        .unwrap_or_else(|| UNTITLED.to_string());
    let poster_url = first_present(raw, &["poster_url"]).and_then(scalar_text);
    let overview = first_present(raw, &["overview"])
        .and_then(scalar_text)
        .unwrap_or_default();
    let genres = first_present(raw, &["genres", "genres_list", "genre_names", "genre"])
        .map(to_array)
        .unwrap_or_default();
    let actors = first_present(raw, &["actors", "actor"])
        .map(to_array)
        .unwrap_or_default();
    let year = match first_present(raw, &["release_year"]) {
        Some(release_year) => integer_like(release_year),
        None => first_present(raw, &["release_date"])
            .and_then(Value::as_str)
            .and_then(|date| date.chars().take(4).collect::<String>().parse().ok()),
    };
    let rating = first_present(raw, &["vote_average", "rating"]).and_then(number_like);
    let director = first_present(raw, &["director"]).and_then(scalar_text);

    Movie {
        id,
        title,
        poster_url,
        overview,
        genres,
        actors,
        year,
        rating,
        director,
        raw: raw.clone(),
    }
}

/// Normalize a result list, dropping every record that has no id.
///
/// A value that is not an array yields no movies.
pub fn normalize_movies(list: &Value) -> Vec<Movie> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .map(normalize_movie)
                .filter(|movie| movie.id.is_some())
                .collect()
        })
        .unwrap_or_default()
}

/// First key whose value exists and is not `null`.
fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn integer_like(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
