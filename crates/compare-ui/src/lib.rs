//! Terminal UI layer for sensor-compare.
//!
//! Provides themes, the overlaid metric and year charts, the daily summary
//! table, warning panels and the page-based event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod table_view;
pub mod themes;

pub use compare_core as core;
