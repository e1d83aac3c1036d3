//! Movie metadata lookup capability.
//!
//! # Responsibility
//! - Define the single "fetch by title" seam used by the add workflow.
//! - Provide the OMDb-backed implementation and an always-absent fallback.
//!
//! # Invariants
//! - Every lookup failure is recoverable; callers fall back to manual entry.
//! - Implementations without a credential fail closed without network I/O.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod omdb;

pub use omdb::{parse_omdb_response, OmdbClient};

pub type LookupResult<T> = Result<T, LookupError>;

/// Canonical movie data returned by a metadata service.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRecord {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: Option<String>,
}

/// Reasons a lookup produced no usable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No API credential is configured.
    MissingCredential,
    /// The service answered but knows no matching movie.
    NotFound(String),
    Timeout,
    Network(String),
    /// The service answered with a body that cannot be decoded.
    InvalidResponse(String),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "metadata API key is not configured"),
            Self::NotFound(message) => write!(f, "movie not found: {message}"),
            Self::Timeout => write!(f, "metadata request timed out"),
            Self::Network(message) => write!(f, "metadata request failed: {message}"),
            Self::InvalidResponse(message) => {
                write!(f, "metadata response is invalid: {message}")
            }
        }
    }
}

impl Error for LookupError {}

/// Fetches canonical movie data by free-text title.
pub trait MovieLookup {
    fn fetch(&self, title: &str) -> LookupResult<LookupRecord>;

    /// Whether `fetch` will attempt a request rather than fail closed.
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: MovieLookup + ?Sized> MovieLookup for &T {
    fn fetch(&self, title: &str) -> LookupResult<LookupRecord> {
        (**self).fetch(title)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

impl<T: MovieLookup + ?Sized> MovieLookup for Box<T> {
    fn fetch(&self, title: &str) -> LookupResult<LookupRecord> {
        (**self).fetch(title)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Lookup used in offline mode; always reports a missing credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl MovieLookup for NoLookup {
    fn fetch(&self, _title: &str) -> LookupResult<LookupRecord> {
        Err(LookupError::MissingCredential)
    }

    fn is_available(&self) -> bool {
        false
    }
}
