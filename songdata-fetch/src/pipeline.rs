//! Collection run orchestration
//!
//! For each artist, strictly one after another: top tracks → per-track
//! features → per-artist averages. The averages and the per-track rows
//! accumulate in insertion order and are written as two tables at the end.

use crate::error::FetchError;
use crate::models::{
    upsert_keyed, ArtistAverage, FieldMap, TrackFeatures, TRACK_COLUMNS,
};
use crate::services::aggregator::aggregate_artist;
use crate::services::pacing::Pacer;
use crate::services::provider::MusicProvider;
use crate::services::tabular::{TableError, TableRecords, TableWriter};
use crate::services::top_tracks::fetch_top_tracks;
use chrono::{DateTime, Utc};
use songdata_common::config::OutputConfig;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

/// Artists collected when the config names none
pub const DEFAULT_ARTISTS: [&str; 10] = [
    "Taylor Swift",
    "The Weeknd",
    "Bad Bunny",
    "Drake",
    "Ed Sheeran",
    "Billie Eilish",
    "Ariana Grande",
    "Coldplay",
    "Rihanna",
    "Kendrick Lamar",
];

/// Result of a collection run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Artist name → averaged features, in artist-list order
    pub averages: Vec<(String, ArtistAverage)>,
    /// One row per fetched track (metadata plus features when available)
    pub tracks: Vec<FieldMap>,
    /// Artists the provider search did not find
    pub skipped_artists: Vec<String>,
}

impl RunOutput {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Write the averages and per-track tables into `output.directory`
    pub fn write_tables(
        &self,
        output: &OutputConfig,
        layout: &TableLayout,
    ) -> Result<WrittenTables, TableError> {
        std::fs::create_dir_all(&output.directory)?;

        let averages_path = output.averages_path();
        let averages_rows = TableWriter::with_denylist(&layout.average_columns, &layout.denylist)
            .write(TableRecords::Keyed(&self.averages), &averages_path)?;

        let tracks_path = output.tracks_path();
        let tracks_rows = TableWriter::with_denylist(&layout.track_columns, &layout.denylist)
            .write(TableRecords::Flat(&self.tracks), &tracks_path)?;

        Ok(WrittenTables {
            averages_path,
            averages_rows,
            tracks_path,
            tracks_rows,
        })
    }
}

/// Column lists of the two output tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub average_columns: Vec<String>,
    pub track_columns: Vec<String>,
    pub denylist: Vec<String>,
}

impl TableLayout {
    /// Averages table: the features; per-track table: track metadata, then
    /// the features
    pub fn for_features(features: &[String], denylist: Vec<String>) -> Self {
        let track_columns = TRACK_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(features.iter().cloned())
            .collect();

        Self {
            average_columns: features.to_vec(),
            track_columns,
            denylist,
        }
    }
}

/// Paths and row counts of written tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTables {
    pub averages_path: PathBuf,
    pub averages_rows: usize,
    pub tracks_path: PathBuf,
    pub tracks_rows: usize,
}

/// Sequential fetch-aggregate pipeline
pub struct Pipeline<P, C> {
    provider: P,
    pacer: C,
    feature_allow_list: Vec<String>,
}

impl<P: MusicProvider, C: Pacer> Pipeline<P, C> {
    pub fn new(provider: P, pacer: C, feature_allow_list: Vec<String>) -> Self {
        Self {
            provider,
            pacer,
            feature_allow_list,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn pacer(&self) -> &C {
        &self.pacer
    }

    /// Collect averages and track rows for `artists`
    ///
    /// An artist the provider cannot find is logged and skipped. Any other
    /// error ends the run. A name listed twice replaces its earlier averages
    /// (keeping the first position); its tracks are appended again.
    pub async fn run(&self, artists: &[String]) -> Result<RunOutput, FetchError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(run_id = %run_id, artists = artists.len(), "Starting collection run");

        let mut averages: Vec<(String, ArtistAverage)> = Vec::with_capacity(artists.len());
        let mut tracks: Vec<FieldMap> = Vec::new();
        let mut skipped_artists = Vec::new();

        for (index, artist) in artists.iter().enumerate() {
            info!(
                artist = %artist,
                "Processing artist {} of {}",
                index + 1,
                artists.len()
            );

            let top_tracks = match fetch_top_tracks(&self.provider, &self.pacer, artist).await {
                Ok(top_tracks) => top_tracks,
                Err(FetchError::ArtistNotFound(name)) => {
                    warn!(artist = %name, "No artist found, skipping");
                    skipped_artists.push(name);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let aggregate = aggregate_artist(
                &self.provider,
                &self.pacer,
                &top_tracks,
                &self.feature_allow_list,
            )
            .await?;

            if aggregate.tracks_with_features() < aggregate.tracks.len() {
                warn!(
                    artist = %artist,
                    missing = aggregate.tracks.len() - aggregate.tracks_with_features(),
                    "Some tracks had no audio features"
                );
            }

            tracks.extend(aggregate.tracks.iter().map(TrackFeatures::to_row));
            upsert_keyed(&mut averages, artist, aggregate.average);
        }

        let finished_at = Utc::now();
        info!(
            run_id = %run_id,
            artists = averages.len(),
            tracks = tracks.len(),
            skipped = skipped_artists.len(),
            "Collection run complete"
        );

        Ok(RunOutput {
            run_id,
            started_at,
            finished_at,
            averages,
            tracks,
            skipped_artists,
        })
    }
}
