//! Fixed pacing before provider calls
//!
//! Every provider call is preceded by an unconditional pause whose length
//! depends only on the kind of call. The policy is injected as a [`Pacer`] so
//! tests and dry runs can skip the delays.

use async_trait::async_trait;
use songdata_common::config::PacingConfig;
use std::time::Duration;

/// Point in the pipeline at which a pause is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingStep {
    /// Before requesting an artist's top tracks
    TopTracks,
    /// Before requesting a track's audio features
    Features,
    /// Before aggregating each track of an artist
    AggregationStep,
}

/// Pause length per step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub top_tracks: Duration,
    pub features: Duration,
    pub aggregation_step: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            top_tracks: Duration::from_secs(10),
            features: Duration::from_secs(10),
            aggregation_step: Duration::from_secs(5),
        }
    }
}

impl PacingPolicy {
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            top_tracks: Duration::from_millis(config.top_tracks_ms),
            features: Duration::from_millis(config.features_ms),
            aggregation_step: Duration::from_millis(config.aggregation_step_ms),
        }
    }

    pub fn interval(&self, step: PacingStep) -> Duration {
        match step {
            PacingStep::TopTracks => self.top_tracks,
            PacingStep::Features => self.features,
            PacingStep::AggregationStep => self.aggregation_step,
        }
    }

    /// Lower bound on the pacing time of a run over `artists` artists with
    /// `tracks_per_artist` tracks each
    pub fn minimum_run_time(&self, artists: u32, tracks_per_artist: u32) -> Duration {
        let per_track = self.features + self.aggregation_step;
        (self.top_tracks + per_track * tracks_per_artist) * artists
    }
}

/// Pacing strategy
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait before the call identified by `step`
    async fn pause(&self, step: PacingStep);
}

/// Blocking-sleep pacer following a [`PacingPolicy`]
#[derive(Debug, Clone, Default)]
pub struct SleepPacer {
    policy: PacingPolicy,
}

impl SleepPacer {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl Pacer for SleepPacer {
    async fn pause(&self, step: PacingStep) {
        let interval = self.policy.interval(step);
        if interval.is_zero() {
            return;
        }
        tracing::debug!(step = ?step, "Pacing: waiting {:?}", interval);
        tokio::time::sleep(interval).await;
    }
}

/// Pacer that never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pause(&self, _step: PacingStep) {}
}
