//! Metadata provider seam
//!
//! The pipeline talks to the music-metadata service only through
//! [`MusicProvider`], so the Spotify client can be swapped for an in-memory
//! provider in tests.

use crate::models::FeatureSet;
use async_trait::async_trait;
use thiserror::Error;

/// Provider client errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure (connect, timeout, TLS)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Client-credentials handshake rejected or bearer token refused
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider rate limit hit (no retry is attempted)
    #[error("Rate limit exceeded (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success status
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Client could not be constructed from its settings
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Artist search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistMatch {
    pub id: String,
    pub name: String,
}

/// Top track of an artist as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTrack {
    pub id: String,
    pub name: String,
    pub popularity: i64,
    pub album_name: String,
    pub album_release_date: String,
}

/// Music-metadata service operations used by the pipeline
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Artist search, best match first
    async fn search_artists(&self, name: &str) -> Result<Vec<ArtistMatch>, ProviderError>;

    /// Most popular tracks of an artist, in provider ranking order
    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<ProviderTrack>, ProviderError>;

    /// Audio features for each id, in request order
    ///
    /// An entry is `None` when the provider has no features for that id.
    async fn audio_features(
        &self,
        track_ids: &[&str],
    ) -> Result<Vec<Option<FeatureSet>>, ProviderError>;
}
