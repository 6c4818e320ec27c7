//! # wordrill Common Library
//!
//! Shared code for the wordrill crates:
//! - Error type used by the engine and its storage layer
//! - Configuration loading and root folder resolution
//! - Database initialization and schema
//! - Domain models (words, meanings, accuracy records)

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
