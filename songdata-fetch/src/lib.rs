//! songdata-fetch library interface
//!
//! Collects an artist list's top tracks from a music metadata provider,
//! fetches per-track audio features, averages them per artist and writes the
//! results as CSV tables.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;

pub use crate::error::{Error, FetchError, Result};
pub use crate::pipeline::{Pipeline, RunOutput, TableLayout, WrittenTables, DEFAULT_ARTISTS};
