//! Display-ready summaries of [`Movie`]s for cards and the detail page.

use cinesearch_core::{Movie, MovieId};
use serde::Serialize;

/// Poster shown when a movie has none.
pub const FALLBACK_POSTER: &str = "https://placehold.co/500x750/1f2937/ffffff?text=No+Image";

pub const CARD_GENRES: usize = 3;
pub const CARD_ACTORS: usize = 3;
pub const DETAIL_CAST: usize = 12;

pub const NO_YEAR: &str = "—";
pub const NO_DIRECTOR: &str = "N/A";
pub const NO_OVERVIEW: &str = "No overview available.";
pub const NO_RECOMMENDATIONS: &str = "No recommendations available.";

pub fn poster_src(movie: &Movie) -> &str {
    movie
        .poster_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(FALLBACK_POSTER)
}

pub fn format_rating(rating: f64) -> String {
    format!("★ {rating:.1}")
}

/// One tile in a results grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: Option<MovieId>,
    pub title: String,
    pub poster: String,
    pub year: String,
    pub genres: Vec<String>,
    /// Leading cast joined with `, `; `None` without actors.
    pub actors: Option<String>,
}

impl From<&Movie> for MovieCard {
    fn from(movie: &Movie) -> Self {
        let actors = (!movie.actors.is_empty()).then(|| {
            movie
                .actors
                .iter()
                .take(CARD_ACTORS)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        });
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            poster: poster_src(movie).to_string(),
            year: movie
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| NO_YEAR.to_string()),
            genres: movie.genres.iter().take(CARD_GENRES).cloned().collect(),
            actors,
        }
    }
}

/// Header block of the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSummary {
    pub title: String,
    pub poster: String,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub director: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
}

impl From<&Movie> for DetailSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            poster: poster_src(movie).to_string(),
            year: movie.year.map(|y| y.to_string()),
            rating: movie.rating.map(format_rating),
            director: movie
                .director
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DIRECTOR.to_string()),
            overview: if movie.overview.is_empty() {
                NO_OVERVIEW.to_string()
            } else {
                movie.overview.clone()
            },
            genres: movie.genres.clone(),
            cast: movie.actors.iter().take(DETAIL_CAST).cloned().collect(),
        }
    }
}
