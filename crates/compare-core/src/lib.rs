//! Core domain types for sensor-compare.
//!
//! Holds the record and summary models shared by every stage of the
//! comparison pipeline, the error taxonomy, timestamp parsing, display
//! formatting helpers and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{CompareError, Result};
