//! Track id → audio features

use crate::error::FetchError;
use crate::models::FeatureSet;
use crate::services::pacing::{Pacer, PacingStep};
use crate::services::provider::MusicProvider;

/// Fetch the audio features of a single track
///
/// Returns `Ok(None)` when the provider has no features for the track
/// (e.g. withdrawn from the catalog); callers skip such tracks.
pub async fn fetch_track_features(
    provider: &dyn MusicProvider,
    pacer: &dyn Pacer,
    track_id: &str,
) -> Result<Option<FeatureSet>, FetchError> {
    pacer.pause(PacingStep::Features).await;

    let results = provider.audio_features(&[track_id]).await?;
    let features = results.into_iter().next().flatten();

    if features.is_none() {
        tracing::warn!(track_id = %track_id, "No audio features for track");
    }

    Ok(features)
}
