//! Error types for songdata-fetch
//!
//! Severity by variant:
//! - [`FetchError::ArtistNotFound`]: the pipeline skips the artist and continues
//! - Provider, averaging and table errors: the run terminates

use crate::services::averaging::AverageError;
use crate::services::provider::ProviderError;
use crate::services::tabular::TableError;
use thiserror::Error;

/// Errors from the fetch and aggregation steps
#[derive(Debug, Error)]
pub enum FetchError {
    /// Invalid caller input (e.g. empty artist name)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Artist search returned no matches
    #[error("No artist found with the name '{0}'")]
    ArtistNotFound(String),

    /// Provider call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A feature bucket could not be reduced
    #[error("Averaging '{feature}' failed: {source}")]
    Average {
        feature: String,
        #[source]
        source: AverageError,
    },
}

/// Top-level error for a pipeline run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Common error: {0}")]
    Common(#[from] songdata_common::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
