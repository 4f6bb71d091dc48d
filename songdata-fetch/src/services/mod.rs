//! Fetch, aggregate and serialize services

pub mod aggregator;
pub mod averaging;
pub mod feature_fetcher;
pub mod pacing;
pub mod provider;
pub mod spotify_client;
pub mod tabular;
pub mod top_tracks;

pub use aggregator::{aggregate_artist, ArtistAggregate};
pub use averaging::{mean, mode, representative, AverageError};
pub use feature_fetcher::fetch_track_features;
pub use pacing::{NoPacing, Pacer, PacingPolicy, PacingStep, SleepPacer};
pub use provider::{ArtistMatch, MusicProvider, ProviderError, ProviderTrack};
pub use spotify_client::{SpotifyClient, SpotifyClientConfig};
pub use tabular::{read_table, write_table, ArtistColumn, TableError, TableRecords, TableWriter};
pub use top_tracks::fetch_top_tracks;
