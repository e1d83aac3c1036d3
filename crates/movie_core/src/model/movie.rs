//! Movie domain model and manual-entry validation.
//!
//! # Responsibility
//! - Define the canonical movie record persisted by the catalog.
//! - Range-check year/rating values typed in by a user.
//!
//! # Invariants
//! - `title` is the unique, case-sensitive storage key.
//! - Validation applies to manual entry only; persisted rows are never
//!   re-validated on read.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Poster value used by the metadata service when no artwork exists.
pub const POSTER_NOT_AVAILABLE: &str = "N/A";

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    /// May be empty or [`POSTER_NOT_AVAILABLE`].
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// Creates a record without poster artwork.
    pub fn new(title: impl Into<String>, year: i32, rating: f64) -> Self {
        Self {
            title: title.into(),
            year,
            rating,
            poster_url: None,
        }
    }

    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = Some(poster_url.into());
        self
    }

    /// Returns the poster URL when it points at real artwork.
    pub fn poster(&self) -> Option<&str> {
        self.poster_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && *url != POSTER_NOT_AVAILABLE)
    }
}

/// Formats a rating for display; whole numbers keep one decimal (`8.0`).
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() && rating.fract() == 0.0 {
        format!("{rating:.1}")
    } else {
        rating.to_string()
    }
}

/// Manual-entry validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotANumber { field: &'static str, input: String },
    YearOutOfRange { year: i32, min: i32, max: i32 },
    RatingOutOfRange { rating: f64, min: f64, max: f64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber { field, input } => {
                write!(f, "{field} must be a number, got `{input}`")
            }
            Self::YearOutOfRange { year, min, max } => {
                write!(f, "year {year} must be between {min} and {max}")
            }
            Self::RatingOutOfRange { rating, min, max } => {
                write!(f, "rating {rating} must be between {min} and {max}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Inclusive bounds applied to manually entered values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationLimits {
    pub min_year: i32,
    pub max_year: i32,
    pub min_rating: f64,
    pub max_rating: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        // 1888 is the year of the earliest surviving motion picture.
        Self {
            min_year: 1888,
            max_year: 2026,
            min_rating: 0.0,
            max_rating: 10.0,
        }
    }
}

impl ValidationLimits {
    pub fn validate_year(&self, year: i32) -> Result<i32, ValidationError> {
        if (self.min_year..=self.max_year).contains(&year) {
            Ok(year)
        } else {
            Err(ValidationError::YearOutOfRange {
                year,
                min: self.min_year,
                max: self.max_year,
            })
        }
    }

    /// Rejects NaN along with out-of-range values.
    pub fn validate_rating(&self, rating: f64) -> Result<f64, ValidationError> {
        if rating >= self.min_rating && rating <= self.max_rating {
            Ok(rating)
        } else {
            Err(ValidationError::RatingOutOfRange {
                rating,
                min: self.min_rating,
                max: self.max_rating,
            })
        }
    }

    pub fn parse_year(&self, input: &str) -> Result<i32, ValidationError> {
        let trimmed = input.trim();
        let year = trimmed
            .parse::<i32>()
            .map_err(|_| ValidationError::NotANumber {
                field: "year",
                input: trimmed.to_string(),
            })?;
        self.validate_year(year)
    }

    pub fn parse_rating(&self, input: &str) -> Result<f64, ValidationError> {
        let trimmed = input.trim();
        let rating = trimmed
            .parse::<f64>()
            .map_err(|_| ValidationError::NotANumber {
                field: "rating",
                input: trimmed.to_string(),
            })?;
        self.validate_rating(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_rating, MovieRecord, ValidationError, ValidationLimits};

    #[test]
    fn whole_ratings_keep_one_decimal() {
        assert_eq!(format_rating(8.0), "8.0");
        assert_eq!(format_rating(0.0), "0.0");
        assert_eq!(format_rating(10.0), "10.0");
        assert_eq!(format_rating(8.3), "8.3");
        assert_eq!(format_rating(7.25), "7.25");
    }

    #[test]
    fn poster_filters_empty_and_sentinel_values() {
        let bare = MovieRecord::new("Dune", 2021, 8.0);
        assert_eq!(bare.poster(), None);
        assert_eq!(bare.clone().with_poster("").poster(), None);
        assert_eq!(bare.clone().with_poster("N/A").poster(), None);
        assert_eq!(
            bare.with_poster("https://img.example/dune.jpg").poster(),
            Some("https://img.example/dune.jpg")
        );
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.validate_year(1888), Ok(1888));
        assert_eq!(limits.validate_year(2026), Ok(2026));
        assert!(matches!(
            limits.validate_year(1887),
            Err(ValidationError::YearOutOfRange { year: 1887, .. })
        ));
        assert!(limits.validate_year(2027).is_err());
    }

    #[test]
    fn rating_rejects_nan_and_out_of_range() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.validate_rating(0.0), Ok(0.0));
        assert_eq!(limits.validate_rating(10.0), Ok(10.0));
        assert!(limits.validate_rating(10.1).is_err());
        assert!(limits.validate_rating(-0.5).is_err());
        assert!(limits.validate_rating(f64::NAN).is_err());
    }

    #[test]
    fn parse_trims_and_reports_non_numeric_input() {
        let limits = ValidationLimits::default();
        assert_eq!(limits.parse_year(" 1999 "), Ok(1999));
        assert_eq!(limits.parse_rating("7.5\n"), Ok(7.5));

        let err = limits.parse_year("nineteen").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: "year",
                input: "nineteen".to_string()
            }
        );
        assert!(matches!(
            limits.parse_rating("abc"),
            Err(ValidationError::NotANumber { field: "rating", .. })
        ));
    }
}
