//! OMDb (Open Movie Database) lookup client.
//!
//! # Responsibility
//! - Issue one bounded `GET ?apikey=..&t=..` request per lookup.
//! - Decode OMDb's string-typed JSON into a [`LookupRecord`].
//!
//! # Invariants
//! - Without an API key no request is sent.
//! - Requests past the configured timeout are reported as `Timeout`.

use super::{LookupError, LookupRecord, LookupResult, MovieLookup};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Blocking OMDb client implementing [`MovieLookup`].
pub struct OmdbClient {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OmdbClient {
    /// Builds a client. A blank `api_key` is treated as absent.
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> LookupResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("movie_core/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| LookupError::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: base_url.into(),
            http,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl MovieLookup for OmdbClient {
    fn fetch(&self, title: &str) -> LookupResult<LookupRecord> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("event=lookup_fetch module=lookup status=error error_code=missing_credential");
            return Err(LookupError::MissingCredential);
        };

        let started_at = Instant::now();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("t", title)])
            .send()
            .map_err(|err| {
                warn!(
                    "event=lookup_fetch module=lookup status=error duration_ms={} timeout={}",
                    started_at.elapsed().as_millis(),
                    err.is_timeout()
                );
                transport_error(err)
            })?;

        let status = response.status();
        let body = response.text().map_err(transport_error)?;

        let parsed = parse_omdb_response(&body, title);
        info!(
            "event=lookup_fetch module=lookup status={} http_status={} duration_ms={}",
            if parsed.is_ok() { "ok" } else { "miss" },
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        parsed
    }

    fn is_available(&self) -> bool {
        self.has_credential()
    }
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        // The URL carries the API key.
        LookupError::Network(err.without_url().to_string())
    }
}

/// Decodes an OMDb response body.
///
/// Rules:
/// - `Response != "True"` -> `NotFound` carrying OMDb's `Error` text.
/// - `Title` falls back to `requested_title` when absent.
/// - `Year` uses the first four-digit run, so `"2010–2012"` yields 2010.
/// - Unparseable year or `imdbRating` (e.g. `"N/A"`) -> `InvalidResponse`.
pub fn parse_omdb_response(body: &str, requested_title: &str) -> LookupResult<LookupRecord> {
    let payload: OmdbResponse = serde_json::from_str(body)
        .map_err(|err| LookupError::InvalidResponse(err.to_string()))?;

    if payload.response != "True" {
        return Err(LookupError::NotFound(
            payload
                .error
                .unwrap_or_else(|| "no matching movie".to_string()),
        ));
    }

    let year_text = payload.year.unwrap_or_default();
    let year = YEAR_RE
        .find(&year_text)
        .and_then(|found| found.as_str().parse::<i32>().ok())
        .ok_or_else(|| LookupError::InvalidResponse(format!("unusable year `{year_text}`")))?;

    let rating_text = payload.imdb_rating.unwrap_or_default();
    let rating = rating_text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LookupError::InvalidResponse(format!("unusable rating `{rating_text}`")))?;

    let title = payload
        .title
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| requested_title.to_string());

    Ok(LookupRecord {
        title,
        year,
        rating,
        poster_url: payload.poster.filter(|value| !value.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_omdb_response, OmdbClient, DEFAULT_LOOKUP_TIMEOUT};
    use crate::lookup::{LookupError, MovieLookup};

    #[test]
    fn parses_successful_response() {
        let body = r#"{
            "Title": "Inception",
            "Year": "2010",
            "imdbRating": "8.8",
            "Poster": "https://m.media-amazon.com/images/inception.jpg",
            "Response": "True"
        }"#;
        let record = parse_omdb_response(body, "inception").unwrap();
        assert_eq!(record.title, "Inception");
        assert_eq!(record.year, 2010);
        assert_eq!(record.rating, 8.8);
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://m.media-amazon.com/images/inception.jpg")
        );
    }

    #[test]
    fn ranged_year_uses_first_year() {
        let body = r#"{"Title":"Sherlock","Year":"2010–2017","imdbRating":"9.1","Poster":"N/A","Response":"True"}"#;
        let record = parse_omdb_response(body, "sherlock").unwrap();
        assert_eq!(record.year, 2010);
        assert_eq!(record.poster_url.as_deref(), Some("N/A"));
    }

    #[test]
    fn missing_title_falls_back_to_requested_title() {
        let body = r#"{"Year":"1999","imdbRating":"7.0","Response":"True"}"#;
        let record = parse_omdb_response(body, "Requested").unwrap();
        assert_eq!(record.title, "Requested");
        assert_eq!(record.poster_url, None);
    }

    #[test]
    fn false_response_is_not_found() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert_eq!(
            parse_omdb_response(body, "zzzz"),
            Err(LookupError::NotFound("Movie not found!".to_string()))
        );
    }

    #[test]
    fn unrated_movie_is_invalid_response() {
        let body = r#"{"Title":"Obscure","Year":"2024","imdbRating":"N/A","Response":"True"}"#;
        assert!(matches!(
            parse_omdb_response(body, "Obscure"),
            Err(LookupError::InvalidResponse(message)) if message.contains("N/A")
        ));
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        assert!(matches!(
            parse_omdb_response("<html>bad gateway</html>", "x"),
            Err(LookupError::InvalidResponse(_))
        ));
    }

    #[test]
    fn blank_credential_fails_closed_without_request() {
        // Unroutable base URL: reaching the network would fail differently.
        let client = OmdbClient::new(
            Some("   ".to_string()),
            "http://127.0.0.1:9/",
            DEFAULT_LOOKUP_TIMEOUT,
        )
        .unwrap();
        assert!(!client.has_credential());
        assert!(!client.is_available());
        assert_eq!(
            client.fetch("Inception"),
            Err(LookupError::MissingCredential)
        );
    }
}
