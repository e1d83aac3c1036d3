//! Core domain logic for the movie catalog.
//! This crate is the single source of truth for storage invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use lookup::{LookupError, LookupRecord, MovieLookup, NoLookup, OmdbClient};
pub use model::movie::{
    format_rating, MovieRecord, ValidationError, ValidationLimits, POSTER_NOT_AVAILABLE,
};
pub use render::{render_movie_grid, render_page, write_page};
pub use repo::movie_repo::{MovieRepository, RepoError, RepoResult, SqliteMovieRepository};
pub use service::catalog_service::{
    AddOutcome, AddSource, CatalogError, CatalogService, CatalogStats, ManualDetails,
    ManualEntry, RatedTitle,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
