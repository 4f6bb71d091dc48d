//! songdata-fetch - artist audio-feature collector
//!
//! Reads its settings from the TOML config (see `songdata_common::config`),
//! runs the collection pipeline once and writes the averages and per-track
//! tables. Takes no command-line arguments.

use anyhow::{Context, Result};
use songdata_common::config::{load_config, ConfigSource};
use songdata_common::logging::init_tracing;
use songdata_fetch::config::RunSettings;
use songdata_fetch::services::{SleepPacer, SpotifyClient};
use songdata_fetch::{Pipeline, TableLayout};
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, source) = load_config()?;

    init_tracing(&config.logging)?;

    info!(
        "Starting songdata-fetch v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &source {
        ConfigSource::Missing(_) => warn!("Configuration: {} (using defaults)", source),
        _ => info!("Configuration: {}", source),
    }

    let settings = match RunSettings::from_toml(&config) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let minimum = settings.pacing.minimum_run_time(settings.artists.len() as u32, 10);
    info!(
        artists = settings.artists.len(),
        features = settings.features.len(),
        "Pacing adds at least {}s for a full run",
        minimum.as_secs()
    );

    let client = SpotifyClient::new(settings.client.clone())
        .context("Failed to create provider client")?;
    let pipeline = Pipeline::new(
        client,
        SleepPacer::new(settings.pacing),
        settings.features.clone(),
    );

    let output = pipeline
        .run(&settings.artists)
        .await
        .context("Collection run failed")?;

    if !output.skipped_artists.is_empty() {
        warn!("Skipped artists: {}", output.skipped_artists.join(", "));
    }

    let layout = TableLayout::for_features(&settings.features, settings.denylist.clone());
    let written = output
        .write_tables(&settings.output, &layout)
        .context("Failed to write output tables")?;

    info!(
        run_id = %output.run_id,
        elapsed_secs = output.elapsed().num_seconds(),
        "✓ Wrote {} artist averages to {} and {} tracks to {}",
        written.averages_rows,
        written.averages_path.display(),
        written.tracks_rows,
        written.tracks_path.display()
    );

    Ok(())
}
