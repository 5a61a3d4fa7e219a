use std::fmt::Write;

use cinesearch_view::present::{DetailSummary, MovieCard, NO_RECOMMENDATIONS};
use cinesearch_view::{DetailPhase, DetailView, SearchView};

pub fn list(view: &SearchView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if view.loading {
        out.push_str("searching...\n");
    } else if let Some(notice) = view.empty_notice() {
        let _ = writeln!(out, "{notice}");
    } else {
        cards(&mut out, view.results.iter().map(MovieCard::from));
    }
    out
}

pub fn detail(view: &DetailView) -> String {
    let mut out = String::new();
    match view.phase {
        DetailPhase::Idle => {}
        DetailPhase::Loading => out.push_str("Loading movie details...\n"),
        DetailPhase::Errored => {
            let _ = writeln!(out, "! {}", view.error.as_deref().unwrap_or_default());
        }
        DetailPhase::Loaded => {
            let Some(movie) = &view.details else {
                return out;
            };
            let summary = DetailSummary::from(movie);
            let _ = writeln!(out, "{}", summary.title);
            let meta: Vec<&str> = [summary.year.as_deref(), summary.rating.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if !meta.is_empty() {
                let _ = writeln!(out, "{}", meta.join("  "));
            }
            let _ = writeln!(out, "Directed by: {}", summary.director);
            let _ = writeln!(out, "Poster: {}", summary.poster);
            let _ = writeln!(out, "\n{}\n", summary.overview);
            if !summary.genres.is_empty() {
                let _ = writeln!(out, "Genres: {}", summary.genres.join(", "));
            }
            if !summary.cast.is_empty() {
                let _ = writeln!(out, "Cast: {}", summary.cast.join(", "));
            }

            out.push_str("\nYou might also like:\n");
            if view.recommendations.is_empty() {
                let _ = writeln!(out, "{NO_RECOMMENDATIONS}");
            } else {
                cards(&mut out, view.recommendations.iter().map(MovieCard::from));
            }
        }
    }
    out
}

fn cards(out: &mut String, cards: impl Iterator<Item = MovieCard>) {
    for (n, card) in cards.enumerate() {
        let id = card.id.as_ref().map(|id| id.as_str()).unwrap_or("?");
        let _ = write!(out, "{:>2}. {} ({}) #{id}", n + 1, card.title, card.year);
        if !card.genres.is_empty() {
            let _ = write!(out, " [{}]", card.genres.join(", "));
        }
        if let Some(actors) = &card.actors {
            let _ = write!(out, " | {actors}");
        }
        out.push('\n');
    }
}
