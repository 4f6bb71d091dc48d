//! Per-artist feature averaging
//!
//! Values of every allow-listed feature are bucketed by name across an
//! artist's tracks (buckets in first-seen order), then each bucket is reduced
//! to a representative value.

use crate::error::FetchError;
use crate::models::{ArtistAverage, FieldValue, TrackFeatures, TrackRecord};
use crate::services::averaging::representative;
use crate::services::feature_fetcher::fetch_track_features;
use crate::services::pacing::{Pacer, PacingStep};
use crate::services::provider::MusicProvider;

/// Averages of one artist plus the per-track inputs they were built from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistAggregate {
    pub average: ArtistAverage,
    /// One entry per input track, in input order
    pub tracks: Vec<TrackFeatures>,
}

impl ArtistAggregate {
    /// Tracks that contributed features
    pub fn tracks_with_features(&self) -> usize {
        self.tracks.iter().filter(|t| t.features.is_some()).count()
    }
}

/// Feature buckets in first-seen order
#[derive(Debug, Default)]
struct Buckets {
    entries: Vec<(String, Vec<FieldValue>)>,
}

impl Buckets {
    fn push(&mut self, name: &str, value: FieldValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name.to_string(), vec![value])),
        }
    }

    fn reduce(self) -> Result<ArtistAverage, FetchError> {
        let mut average = ArtistAverage::new();
        for (name, values) in self.entries {
            let value = representative(&values).map_err(|source| FetchError::Average {
                feature: name.clone(),
                source,
            })?;
            average.insert(name, value);
        }
        Ok(average)
    }
}

/// Fetch features for each track and average them per feature name
///
/// Tracks without features contribute nothing. An empty track list yields
/// an empty average.
pub async fn aggregate_artist(
    provider: &dyn MusicProvider,
    pacer: &dyn Pacer,
    tracks: &[TrackRecord],
    allow_list: &[String],
) -> Result<ArtistAggregate, FetchError> {
    let mut buckets = Buckets::default();
    let mut per_track = Vec::with_capacity(tracks.len());

    for track in tracks {
        pacer.pause(PacingStep::AggregationStep).await;

        let features = fetch_track_features(provider, pacer, &track.track_id).await?;

        if let Some(features) = &features {
            for (name, value) in features.iter() {
                if allow_list.iter().any(|allowed| allowed == name) {
                    buckets.push(name, value.clone());
                }
            }
        }

        per_track.push(TrackFeatures {
            track: track.clone(),
            features,
        });
    }

    let average = buckets.reduce()?;

    if let Some(first) = tracks.first() {
        tracing::info!(
            artist = %first.artist_name,
            tracks = tracks.len(),
            features = average.len(),
            "Averaged artist features"
        );
    }

    Ok(ArtistAggregate {
        average,
        tracks: per_track,
    })
}
