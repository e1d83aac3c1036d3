//! Catalog use-case service.
//!
//! # Responsibility
//! - Aggregate and transform the stored movie set (stats, random pick,
//!   search, rating sort, static page rendering).
//! - Orchestrate the add workflow: metadata lookup first, manual entry as
//!   fallback.
//!
//! # Invariants
//! - The service holds no movie state; every operation re-reads storage.
//! - Ties in best/worst/sort resolve to the first movie in title order.
//! - A failing lookup never aborts an add; it switches to manual entry.

use crate::lookup::{LookupError, MovieLookup};
use crate::model::movie::{MovieRecord, ValidationError, ValidationLimits};
use crate::render::render_page;
use crate::repo::movie_repo::{MovieRepository, RepoError};
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// The operation needs at least one stored movie.
    EmptyCatalog,
    /// Title input is empty after trimming.
    EmptyTitle,
    /// Manual entry was abandoned before details were supplied.
    Cancelled,
    Validation(ValidationError),
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "no movies in the catalog"),
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::Cancelled => write!(f, "manual entry cancelled"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Title paired with its rating, used for best/worst reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedTitle {
    pub title: String,
    pub rating: f64,
}

/// Aggregate figures over the whole catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub count: usize,
    pub average_rating: f64,
    pub best: RatedTitle,
    pub worst: RatedTitle,
}

/// Year and rating typed in by the user when lookup is unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualDetails {
    pub year: i32,
    pub rating: f64,
}

/// Supplies details for a movie the lookup could not resolve.
///
/// Implementations own prompting and re-prompting; `None` means the input
/// source closed before valid details were read.
pub trait ManualEntry {
    fn request_details(
        &mut self,
        title: &str,
        reason: &LookupError,
        limits: &ValidationLimits,
    ) -> Option<ManualDetails>;
}

/// Where the stored data of an added movie came from.
#[derive(Debug, Clone, PartialEq)]
pub enum AddSource {
    Lookup,
    Manual { reason: LookupError },
}

/// Result of [`CatalogService::enrich_and_add`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub record: MovieRecord,
    pub source: AddSource,
}

/// Catalog facade over a movie repository and a metadata lookup.
pub struct CatalogService<R: MovieRepository, L: MovieLookup> {
    repo: R,
    lookup: L,
    limits: ValidationLimits,
}

impl<R: MovieRepository, L: MovieLookup> CatalogService<R, L> {
    pub fn new(repo: R, lookup: L, limits: ValidationLimits) -> Self {
        Self {
            repo,
            lookup,
            limits,
        }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Whether an add will query the lookup before asking for details.
    pub fn lookup_available(&self) -> bool {
        self.lookup.is_available()
    }

    /// Lists every movie in title order.
    pub fn list_movies(&self) -> Result<Vec<MovieRecord>, CatalogError> {
        Ok(self.repo.list_all()?)
    }

    /// Computes average, best and worst rating.
    ///
    /// Returns `EmptyCatalog` instead of dividing by zero.
    pub fn compute_stats(&self) -> Result<CatalogStats, CatalogError> {
        let movies = self.repo.list_all()?;
        summarize(&movies).ok_or(CatalogError::EmptyCatalog)
    }

    /// Picks one movie uniformly at random.
    pub fn pick_random(&self) -> Result<MovieRecord, CatalogError> {
        self.pick_random_with(&mut rand::thread_rng())
    }

    /// Picks one movie uniformly using the provided generator.
    pub fn pick_random_with<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
    ) -> Result<MovieRecord, CatalogError> {
        let movies = self.repo.list_all()?;
        movies
            .choose(rng)
            .cloned()
            .ok_or(CatalogError::EmptyCatalog)
    }

    /// Returns movies whose title contains `query`, ignoring case.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Result<Vec<MovieRecord>, CatalogError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let movies = self.repo.list_all()?;
        Ok(movies
            .into_iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect())
    }

    /// Returns all movies ordered by rating.
    ///
    /// The sort is stable, so equal ratings keep title order.
    pub fn sorted_by_rating(&self, descending: bool) -> Result<Vec<MovieRecord>, CatalogError> {
        let mut movies = self.repo.list_all()?;
        movies.sort_by(|a, b| {
            if descending {
                b.rating.total_cmp(&a.rating)
            } else {
                a.rating.total_cmp(&b.rating)
            }
        });
        Ok(movies)
    }

    /// Adds a movie, preferring metadata lookup over manual entry.
    ///
    /// # Contract
    /// - Lookup success stores the canonical title/year/rating/poster as-is.
    /// - Any lookup failure asks `manual` for year/rating, validates them and
    ///   stores them under the user's title without a poster.
    /// - Storage errors (including `DuplicateKey`) are returned unchanged.
    pub fn enrich_and_add(
        &self,
        title: &str,
        manual: &mut dyn ManualEntry,
    ) -> Result<AddOutcome, CatalogError> {
        let title = normalize_title(title)?;

        let (record, source) = match self.lookup.fetch(title) {
            Ok(found) => {
                info!("event=movie_add module=service status=start source=lookup");
                let record = MovieRecord {
                    title: found.title,
                    year: found.year,
                    rating: found.rating,
                    poster_url: found.poster_url,
                };
                (record, AddSource::Lookup)
            }
            Err(reason) => {
                warn!(
                    "event=movie_add module=service status=fallback source=manual reason={reason}"
                );
                let details = manual
                    .request_details(title, &reason, &self.limits)
                    .ok_or(CatalogError::Cancelled)?;
                let year = self.limits.validate_year(details.year)?;
                let rating = self.limits.validate_rating(details.rating)?;
                (
                    MovieRecord::new(title, year, rating),
                    AddSource::Manual { reason },
                )
            }
        };

        self.repo.create(&record)?;
        Ok(AddOutcome { record, source })
    }

    /// Stores a manually described movie after validating year and rating.
    pub fn add_movie(&self, movie: &MovieRecord) -> Result<(), CatalogError> {
        normalize_title(&movie.title)?;
        self.limits.validate_year(movie.year)?;
        self.limits.validate_rating(movie.rating)?;
        self.repo.create(movie)?;
        Ok(())
    }

    /// Deletes the movie with exactly this title.
    pub fn delete_movie(&self, title: &str) -> Result<(), CatalogError> {
        let title = normalize_title(title)?;
        self.repo.delete(title)?;
        Ok(())
    }

    /// Replaces the rating of the movie with exactly this title.
    pub fn update_rating(&self, title: &str, rating: f64) -> Result<(), CatalogError> {
        let title = normalize_title(title)?;
        let rating = self.limits.validate_rating(rating)?;
        self.repo.update_rating(title, rating)?;
        Ok(())
    }

    /// Renders the current catalog into `template`.
    pub fn render_static_page(
        &self,
        template: &str,
        page_title: &str,
    ) -> Result<String, CatalogError> {
        let movies = self.repo.list_all()?;
        Ok(render_page(template, page_title, &movies))
    }
}

fn normalize_title(title: &str) -> Result<&str, CatalogError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyTitle);
    }
    Ok(trimmed)
}

/// Computes stats over `movies`; `None` for an empty slice.
///
/// Strict comparisons keep the earliest movie on ties.
pub fn summarize(movies: &[MovieRecord]) -> Option<CatalogStats> {
    let first = movies.first()?;
    let mut best = first;
    let mut worst = first;
    let mut total = 0.0;

    for movie in movies {
        total += movie.rating;
        if movie.rating.total_cmp(&best.rating) == Ordering::Greater {
            best = movie;
        }
        if movie.rating.total_cmp(&worst.rating) == Ordering::Less {
            worst = movie;
        }
    }

    Some(CatalogStats {
        count: movies.len(),
        average_rating: total / movies.len() as f64,
        best: RatedTitle {
            title: best.title.clone(),
            rating: best.rating,
        },
        worst: RatedTitle {
            title: worst.title.clone(),
            rating: worst.rating,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::summarize;
    use crate::model::movie::MovieRecord;

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn summarize_keeps_first_movie_on_ties() {
        let movies = vec![
            MovieRecord::new("Amelie", 2001, 8.0),
            MovieRecord::new("Brick", 2005, 8.0),
            MovieRecord::new("Casino", 1995, 8.0),
        ];
        let stats = summarize(&movies).unwrap();
        assert_eq!(stats.best.title, "Amelie");
        assert_eq!(stats.worst.title, "Amelie");
        assert_eq!(stats.average_rating, 8.0);
        assert_eq!(stats.count, 3);
    }
}
