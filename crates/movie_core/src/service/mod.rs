//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and lookup calls into catalog-level APIs.
//! - Keep CLI layers decoupled from storage details.

pub mod catalog_service;
