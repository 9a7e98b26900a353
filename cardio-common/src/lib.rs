//! # Cardio Common Library
//!
//! Shared code for the cardio prediction services including:
//! - Database initialization and record types
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
