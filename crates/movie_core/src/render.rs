//! Static HTML page rendering for the catalog.
//!
//! # Responsibility
//! - Render one markup block per movie into a grid fragment.
//! - Substitute title and grid placeholders in an HTML template.
//!
//! # Invariants
//! - Rendering is pure; only [`write_page`] touches the filesystem.
//! - Every placeholder occurrence is replaced, so none survive in output.
//! - Movie text is HTML-escaped before insertion.

use crate::model::movie::{format_rating, MovieRecord};
use std::fmt::Write as _;
use std::path::Path;

pub const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";
pub const DEFAULT_PAGE_TITLE: &str = "My Movie App";

/// Renders the full document for `movies`.
///
/// Both placeholders are substituted in one pass over `template`, so
/// inserted text is never scanned for tokens again.
pub fn render_page(template: &str, page_title: &str, movies: &[MovieRecord]) -> String {
    let title = escape_html(page_title);
    let grid = render_movie_grid(movies);
    template
        .split(GRID_PLACEHOLDER)
        .map(|piece| piece.replace(TITLE_PLACEHOLDER, &title))
        .collect::<Vec<_>>()
        .join(&grid)
}

/// Renders the `<li>` blocks for every movie, in input order.
pub fn render_movie_grid(movies: &[MovieRecord]) -> String {
    let mut grid = String::new();
    for movie in movies {
        let title = escape_html(&movie.title);
        grid.push_str("        <li>\n");
        grid.push_str("            <div class='movie'>\n");
        if let Some(poster) = movie.poster() {
            let _ = writeln!(
                grid,
                "                <img class='movie-poster' src='{}' alt='{}'/>",
                escape_html(poster),
                title
            );
        }
        let _ = writeln!(grid, "                <div class='movie-title'>{title}</div>");
        let _ = writeln!(
            grid,
            "                <div class='movie-year'>{}</div>",
            movie.year
        );
        let _ = writeln!(
            grid,
            "                <div class='movie-rating'>Rating: {}</div>",
            format_rating(movie.rating)
        );
        grid.push_str("            </div>\n");
        grid.push_str("        </li>\n");
    }
    grid
}

/// Writes a rendered page, creating missing parent directories.
pub fn write_page(path: impl AsRef<Path>, html: &str) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    // Data spelling a placeholder is encoded so no token reaches the output.
    for token in [TITLE_PLACEHOLDER, GRID_PLACEHOLDER] {
        if escaped.contains(token) {
            escaped = escaped.replace(token, &format!("&#95;{}", &token[1..]));
        }
    }
    escaped
}
