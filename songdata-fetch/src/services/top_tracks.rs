//! Artist name → most popular tracks

use crate::error::FetchError;
use crate::models::TrackRecord;
use crate::services::pacing::{Pacer, PacingStep};
use crate::services::provider::MusicProvider;

/// Fetch an artist's top tracks
///
/// Resolves the name with an artist search and uses the best match. Every
/// returned record is tagged with `artist_name` as given, not with the
/// provider's spelling of it.
///
/// # Errors
/// - [`FetchError::InvalidInput`] for a blank name
/// - [`FetchError::ArtistNotFound`] when the search has no hits
/// - [`FetchError::Provider`] for any provider failure
pub async fn fetch_top_tracks(
    provider: &dyn MusicProvider,
    pacer: &dyn Pacer,
    artist_name: &str,
) -> Result<Vec<TrackRecord>, FetchError> {
    if artist_name.trim().is_empty() {
        return Err(FetchError::InvalidInput("artist name is empty".to_string()));
    }

    let matches = provider.search_artists(artist_name).await?;
    let best = matches
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::ArtistNotFound(artist_name.to_string()))?;

    tracing::debug!(
        artist = %artist_name,
        artist_id = %best.id,
        matched_name = %best.name,
        "Resolved artist"
    );

    pacer.pause(PacingStep::TopTracks).await;
    let tracks = provider.artist_top_tracks(&best.id).await?;

    let records: Vec<TrackRecord> = tracks
        .into_iter()
        .map(|t| TrackRecord {
            artist_name: artist_name.to_string(),
            track_name: t.name,
            track_id: t.id,
            popularity: t.popularity,
            album_name: t.album_name,
            album_release_date: t.album_release_date,
        })
        .collect();

    tracing::info!(artist = %artist_name, tracks = records.len(), "Fetched top tracks");

    Ok(records)
}
