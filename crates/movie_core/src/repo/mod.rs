//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the title-keyed storage contract consumed by services.
//! - Isolate SQLite query details from catalog orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateKey`, `NotFound`) in
//!   addition to DB transport errors.
//! - Log events carry metadata only, never movie titles.

pub mod movie_repo;
