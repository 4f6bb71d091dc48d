//! Shared test fixtures: an in-memory provider and a recording pacer

#![allow(dead_code)]

use async_trait::async_trait;
use songdata_fetch::models::{FeatureSet, FieldValue};
use songdata_fetch::services::{
    ArtistMatch, MusicProvider, Pacer, PacingStep, ProviderError, ProviderTrack,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Provider call, as observed by [`StaticProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    TopTracks(String),
    Features(Vec<String>),
}

/// In-memory provider backed by fixed tables
#[derive(Default)]
pub struct StaticProvider {
    /// Artist name → artist id
    artists: HashMap<String, String>,
    /// Artist id → top tracks
    top_tracks: HashMap<String, Vec<ProviderTrack>>,
    /// Track id → features (absent ids have none)
    features: HashMap<String, FeatureSet>,
    /// Artist ids whose top-tracks request fails
    failing: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artist with tracks given as (track id, track name)
    pub fn with_artist(mut self, name: &str, tracks: &[(&str, &str)]) -> Self {
        let artist_id = format!("artist-{}", self.artists.len() + 1);
        self.artists.insert(name.to_string(), artist_id.clone());
        let tracks = tracks
            .iter()
            .enumerate()
            .map(|(i, (id, track_name))| ProviderTrack {
                id: id.to_string(),
                name: track_name.to_string(),
                popularity: 90 - i as i64,
                album_name: format!("{} album", name),
                album_release_date: "2023-05-01".to_string(),
            })
            .collect();
        self.top_tracks.insert(artist_id, tracks);
        self
    }

    pub fn with_features(mut self, track_id: &str, fields: Vec<(&str, FieldValue)>) -> Self {
        self.features
            .insert(track_id.to_string(), fields.into_iter().collect());
        self
    }

    /// Make the top-tracks request for `name` fail with a server error
    pub fn with_failing_artist(mut self, name: &str) -> Self {
        if let Some(id) = self.artists.get(name) {
            self.failing.push(id.clone());
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MusicProvider for StaticProvider {
    async fn search_artists(&self, name: &str) -> Result<Vec<ArtistMatch>, ProviderError> {
        self.record(Call::Search(name.to_string()));
        Ok(self
            .artists
            .get(name)
            .map(|id| {
                vec![ArtistMatch {
                    id: id.clone(),
                    name: name.to_string(),
                }]
            })
            .unwrap_or_default())
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<ProviderTrack>, ProviderError> {
        self.record(Call::TopTracks(artist_id.to_string()));
        if self.failing.iter().any(|id| id == artist_id) {
            return Err(ProviderError::ApiError(500, "upstream failure".to_string()));
        }
        self.top_tracks
            .get(artist_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(artist_id.to_string()))
    }

    async fn audio_features(
        &self,
        track_ids: &[&str],
    ) -> Result<Vec<Option<FeatureSet>>, ProviderError> {
        self.record(Call::Features(
            track_ids.iter().map(|id| id.to_string()).collect(),
        ));
        Ok(track_ids
            .iter()
            .map(|id| self.features.get(*id).cloned())
            .collect())
    }
}

/// Pacer that records each step instead of sleeping
#[derive(Default)]
pub struct RecordingPacer {
    steps: Mutex<Vec<PacingStep>>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> Vec<PacingStep> {
        self.steps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, step: PacingStep) {
        self.steps.lock().unwrap().push(step);
    }
}

/// Feature object in the provider's field order
pub fn feature_fields(
    track_id: &str,
    acousticness: f64,
    valence: f64,
    key: i64,
) -> Vec<(&'static str, FieldValue)> {
    vec![
        ("key", FieldValue::Int(key)),
        ("acousticness", FieldValue::Float(acousticness)),
        ("valence", FieldValue::Float(valence)),
        ("type", FieldValue::from("audio_features")),
        ("id", FieldValue::from(track_id.to_string())),
        ("analysis_url", FieldValue::from(format!("https://example.test/analysis/{}", track_id))),
    ]
}
