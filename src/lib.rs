//! Games market dashboard.
//!
//! Loads a table of video-game sales and review records once, then lets the
//! user filter it by genre, age rating and release year. Every filter change
//! recomputes the filtered count, a genre-by-platform share chart and a
//! user/critic score scatter chart.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod state;
pub mod ui;
