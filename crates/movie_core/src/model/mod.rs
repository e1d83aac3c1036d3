//! Domain model for the movie catalog.
//!
//! # Responsibility
//! - Define the record shape shared by storage, services and rendering.
//! - Own the bounds used to validate manually entered values.

pub mod movie;
