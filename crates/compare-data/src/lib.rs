//! Data layer for sensor-compare.
//!
//! Discovers and parses CSV sensor logs, reduces them to daily summaries,
//! merges datasets into one comparison table and aligns rows onto a shared
//! annual axis.

pub mod aggregator;
pub mod aligner;
pub mod analysis;
pub mod merger;
pub mod reader;

pub use compare_core as core;
