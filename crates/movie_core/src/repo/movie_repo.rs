//! Movie repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide a title-keyed CRUD contract over the `movies` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Each operation runs exactly one SQL statement, so a failed write leaves
//!   no partial row behind.
//! - Title uniqueness is enforced by the table's UNIQUE constraint, never by a
//!   read-then-insert check.
//! - `list_all` orders rows by `title ASC`; downstream tie-breaks rely on it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::movie::MovieRecord;
use log::{error, info, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MOVIE_SELECT_SQL: &str = "SELECT title, year, rating, poster_url FROM movies";
const REQUIRED_COLUMNS: &[&str] = &["id", "title", "year", "rating", "poster_url"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for movie persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// A movie with this exact title is already stored.
    DuplicateKey(String),
    /// No movie with this exact title is stored.
    NotFound(String),
    /// The backing store could not be reached or queried.
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(title) => write!(f, "movie already exists: {title}"),
            Self::NotFound(title) => write!(f, "movie not found: {title}"),
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted movie data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for title-keyed movie CRUD.
pub trait MovieRepository {
    fn list_all(&self) -> RepoResult<Vec<MovieRecord>>;
    fn get(&self, title: &str) -> RepoResult<Option<MovieRecord>>;
    fn create(&self, movie: &MovieRecord) -> RepoResult<()>;
    fn delete(&self, title: &str) -> RepoResult<()>;
    fn update_rating(&self, title: &str, rating: f64) -> RepoResult<()>;
}

/// SQLite-backed movie repository.
pub struct SqliteMovieRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovieRepository<'conn> {
    /// Wraps a connection prepared by [`crate::db::open_db`].
    ///
    /// # Errors
    /// - `UninitializedConnection` when schema setup never ran.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the table shape
    ///   does not match what the repository queries.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, "movies")?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable("movies"));
        }
        for column in REQUIRED_COLUMNS {
            if !columns.iter().any(|name| name == column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "movies",
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn list_all(&self) -> RepoResult<Vec<MovieRecord>> {
        let result = (|| -> RepoResult<Vec<MovieRecord>> {
            let mut stmt = self
                .conn
                .prepare(&format!("{MOVIE_SELECT_SQL} ORDER BY title ASC;"))?;
            let mut rows = stmt.query([])?;
            let mut movies = Vec::new();
            while let Some(row) = rows.next()? {
                movies.push(parse_movie_row(row)?);
            }
            Ok(movies)
        })();

        match &result {
            Ok(movies) => info!(
                "event=movie_list module=repo status=ok count={}",
                movies.len()
            ),
            Err(err) => error!("event=movie_list module=repo status=error error={err}"),
        }
        result
    }

    fn get(&self, title: &str) -> RepoResult<Option<MovieRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOVIE_SELECT_SQL} WHERE title = ?1;"))?;
        let row = stmt
            .query_row([title], |row| Ok(parse_movie_row(row)))
            .optional()?;
        row.transpose()
    }

    fn create(&self, movie: &MovieRecord) -> RepoResult<()> {
        let inserted = self.conn.execute(
            "INSERT INTO movies (title, year, rating, poster_url) VALUES (?1, ?2, ?3, ?4);",
            params![
                movie.title.as_str(),
                movie.year,
                movie.rating,
                movie.poster_url.as_deref(),
            ],
        );

        match inserted {
            Ok(_) => {
                info!("event=movie_create module=repo status=ok");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => {
                warn!("event=movie_create module=repo status=error error_code=duplicate_key");
                Err(RepoError::DuplicateKey(movie.title.clone()))
            }
            Err(err) => {
                error!(
                    "event=movie_create module=repo status=error error_code=storage_unavailable error={err}"
                );
                Err(err.into())
            }
        }
    }

    fn delete(&self, title: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM movies WHERE title = ?1;", [title])
            .inspect_err(|err| {
                error!("event=movie_delete module=repo status=error error={err}");
            })?;

        if changed == 0 {
            info!("event=movie_delete module=repo status=not_found");
            return Err(RepoError::NotFound(title.to_string()));
        }

        info!("event=movie_delete module=repo status=ok");
        Ok(())
    }

    fn update_rating(&self, title: &str, rating: f64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE movies SET rating = ?1 WHERE title = ?2;",
                params![rating, title],
            )
            .inspect_err(|err| {
                error!("event=movie_update module=repo status=error error={err}");
            })?;

        if changed == 0 {
            info!("event=movie_update module=repo status=not_found");
            return Err(RepoError::NotFound(title.to_string()));
        }

        info!("event=movie_update module=repo status=ok");
        Ok(())
    }
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<MovieRecord> {
    let title: String = row.get("title")?;
    if title.is_empty() {
        return Err(RepoError::InvalidData(
            "empty title in movies.title".to_string(),
        ));
    }

    let year: i64 = row.get("year")?;
    let year = i32::try_from(year).map_err(|_| {
        RepoError::InvalidData(format!("year `{year}` out of range in movies.year"))
    })?;

    Ok(MovieRecord {
        title,
        year,
        rating: row.get("rating")?,
        poster_url: row.get("poster_url")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
