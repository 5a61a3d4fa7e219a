use serde::{Deserialize, Serialize};

/// Backend identifier of a movie.
///
/// The search index hands ids back as numbers or strings depending on the
/// document, so they are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id out of a raw JSON value. Only scalars qualify.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self(s.clone())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            serde_json::Value::Bool(b) => Some(Self(b.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for MovieId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Canonical movie record produced by [`crate::normalize_movie`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: Option<MovieId>,
    pub title: String,
    pub poster_url: Option<String>,
    pub overview: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub director: Option<String>,
    /// The record as the backend sent it.
    #[serde(skip)]
    pub raw: serde_json::Value,
}
