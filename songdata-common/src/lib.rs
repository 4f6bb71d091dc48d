//! # songdata common library
//!
//! Shared code for the songdata crates:
//! - Error type
//! - TOML configuration loading
//! - Tracing initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
