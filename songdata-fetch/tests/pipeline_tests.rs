//! Integration tests for the collection pipeline
//!
//! Run against an in-memory provider; pacing is recorded, never slept.

mod helpers;

use helpers::{feature_fields, Call, RecordingPacer, StaticProvider};
use songdata_common::config::OutputConfig;
use songdata_fetch::models::{default_denylist, default_feature_allow_list, FieldValue};
use songdata_fetch::services::{
    aggregate_artist, fetch_top_tracks, NoPacing, PacingStep, ProviderError,
};
use songdata_fetch::{FetchError, Pipeline, TableLayout};
use tempfile::TempDir;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn two_artist_provider() -> StaticProvider {
    StaticProvider::new()
        .with_artist("Rin", &[("t1", "Melt"), ("t2", "Tell Your World")])
        .with_artist("Len", &[("t3", "Roller, Part 2")])
        .with_features("t1", feature_fields("t1", 0.25, 0.5, 5))
        .with_features("t2", feature_fields("t2", 0.75, 1.0, 7))
        .with_features("t3", feature_fields("t3", 0.1, 0.2, 1))
}

#[tokio::test]
async fn test_run_averages_allow_listed_features() {
    let pipeline = Pipeline::new(two_artist_provider(), NoPacing, default_feature_allow_list());

    let output = pipeline.run(&names(&["Rin", "Len"])).await.unwrap();

    let artists: Vec<&str> = output.averages.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(artists, vec!["Rin", "Len"]);
    assert!(output.skipped_artists.is_empty());

    let rin = &output.averages[0].1;
    assert_eq!(rin.get("acousticness"), Some(&FieldValue::Float(0.5)));
    assert_eq!(rin.get("valence"), Some(&FieldValue::Float(0.75)));
    // Text fields reduce to the most frequent value; ties go to the first seen
    assert_eq!(rin.get("type"), Some(&FieldValue::from("audio_features")));
    assert_eq!(rin.get("id"), Some(&FieldValue::from("t1")));
    // Not in the allow-list
    assert!(rin.get("key").is_none());

    // Feature names keep the order the provider sent them in
    let keys: Vec<&str> = rin.keys().collect();
    assert_eq!(keys, vec!["acousticness", "valence", "type", "id", "analysis_url"]);
}

#[tokio::test]
async fn test_run_paces_every_provider_call() {
    let pipeline = Pipeline::new(
        two_artist_provider(),
        RecordingPacer::new(),
        default_feature_allow_list(),
    );

    pipeline.run(&names(&["Rin", "Len"])).await.unwrap();

    assert_eq!(
        pipeline.pacer().steps(),
        vec![
            PacingStep::TopTracks,
            PacingStep::AggregationStep,
            PacingStep::Features,
            PacingStep::AggregationStep,
            PacingStep::Features,
            PacingStep::TopTracks,
            PacingStep::AggregationStep,
            PacingStep::Features,
        ]
    );

    assert_eq!(
        pipeline.provider().calls(),
        vec![
            Call::Search("Rin".to_string()),
            Call::TopTracks("artist-1".to_string()),
            Call::Features(vec!["t1".to_string()]),
            Call::Features(vec!["t2".to_string()]),
            Call::Search("Len".to_string()),
            Call::TopTracks("artist-2".to_string()),
            Call::Features(vec!["t3".to_string()]),
        ]
    );
}

#[tokio::test]
async fn test_unknown_artist_is_skipped() {
    let pipeline = Pipeline::new(
        two_artist_provider(),
        RecordingPacer::new(),
        default_feature_allow_list(),
    );

    let output = pipeline.run(&names(&["Rin", "Ghost", "Len"])).await.unwrap();

    assert_eq!(output.skipped_artists, vec!["Ghost".to_string()]);
    let artists: Vec<&str> = output.averages.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(artists, vec!["Rin", "Len"]);
    // No top-tracks pause for the artist that was not found
    let top_tracks_pauses = pipeline
        .pacer()
        .steps()
        .into_iter()
        .filter(|s| *s == PacingStep::TopTracks)
        .count();
    assert_eq!(top_tracks_pauses, 2);
}

#[tokio::test]
async fn test_artist_without_tracks_gets_empty_average() {
    let provider = StaticProvider::new().with_artist("Miku", &[]);
    let pipeline = Pipeline::new(provider, NoPacing, default_feature_allow_list());

    let output = pipeline.run(&names(&["Miku"])).await.unwrap();

    assert_eq!(output.averages.len(), 1);
    assert_eq!(output.averages[0].0, "Miku");
    assert!(output.averages[0].1.is_empty());
    assert!(output.tracks.is_empty());
}

#[tokio::test]
async fn test_tracks_without_features_are_kept_but_not_averaged() {
    let provider = StaticProvider::new()
        .with_artist("Rin", &[("t1", "Melt"), ("gone", "Withdrawn")])
        .with_features("t1", feature_fields("t1", 0.25, 0.5, 5));
    let pipeline = Pipeline::new(provider, NoPacing, default_feature_allow_list());

    let output = pipeline.run(&names(&["Rin"])).await.unwrap();

    let rin = &output.averages[0].1;
    assert_eq!(rin.get("acousticness"), Some(&FieldValue::Float(0.25)));

    assert_eq!(output.tracks.len(), 2);
    let withdrawn = &output.tracks[1];
    assert_eq!(withdrawn.get("name"), Some(&FieldValue::from("Withdrawn")));
    assert_eq!(withdrawn.get("artist_name"), Some(&FieldValue::from("Rin")));
    assert!(withdrawn.get("valence").is_none());
}

#[tokio::test]
async fn test_provider_failure_ends_run() {
    let provider = two_artist_provider().with_failing_artist("Len");
    let pipeline = Pipeline::new(provider, NoPacing, default_feature_allow_list());

    let result = pipeline.run(&names(&["Rin", "Len"])).await;

    assert!(matches!(
        result,
        Err(FetchError::Provider(ProviderError::ApiError(500, _)))
    ));
}

#[tokio::test]
async fn test_repeated_artist_keeps_first_position() {
    let pipeline = Pipeline::new(two_artist_provider(), NoPacing, default_feature_allow_list());

    let output = pipeline.run(&names(&["Rin", "Len", "Rin"])).await.unwrap();

    let artists: Vec<&str> = output.averages.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(artists, vec!["Rin", "Len"]);
    assert_eq!(output.tracks.len(), 5);
}

#[tokio::test]
async fn test_top_tracks_are_tagged_with_queried_name() {
    let provider = two_artist_provider();
    let tracks = fetch_top_tracks(&provider, &NoPacing, "Rin").await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert!(tracks.iter().all(|t| t.artist_name == "Rin"));
    assert_eq!(tracks[0].track_id, "t1");
    assert_eq!(tracks[0].album_release_date, "2023-05-01");
}

#[tokio::test]
async fn test_blank_artist_name_is_invalid_input() {
    let provider = two_artist_provider();
    let result = fetch_top_tracks(&provider, &NoPacing, "   ").await;

    assert!(matches!(result, Err(FetchError::InvalidInput(_))));
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_mixed_value_types_fail_averaging() {
    let provider = StaticProvider::new()
        .with_artist("Rin", &[("t1", "Melt"), ("t2", "Tell Your World")])
        .with_features("t1", vec![("tempo", FieldValue::Float(120.0))])
        .with_features("t2", vec![("tempo", FieldValue::from("fast"))]);
    let tracks = fetch_top_tracks(&provider, &NoPacing, "Rin").await.unwrap();

    let result = aggregate_artist(&provider, &NoPacing, &tracks, &names(&["tempo"])).await;

    match result {
        Err(FetchError::Average { feature, .. }) => assert_eq!(feature, "tempo"),
        other => panic!("expected averaging error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_written_tables_drop_provider_internal_columns() {
    let temp_dir = TempDir::new().unwrap();
    let output_config = OutputConfig {
        directory: temp_dir.path().join("out"),
        ..Default::default()
    };
    let features = default_feature_allow_list();
    let pipeline = Pipeline::new(two_artist_provider(), NoPacing, features.clone());

    let output = pipeline.run(&names(&["Rin", "Len"])).await.unwrap();
    let layout = TableLayout::for_features(&features, default_denylist());
    let written = output.write_tables(&output_config, &layout).unwrap();

    assert_eq!(written.averages_rows, 2);
    assert_eq!(written.tracks_rows, 3);

    let averages = std::fs::read_to_string(&written.averages_path).unwrap();
    assert_eq!(
        averages,
        "acousticness,instrumentalness,speechiness,valence,artist_name\n\
         0.5,,,0.75,Rin\n\
         0.1,,,0.2,Len\n"
    );

    let tracks = std::fs::read_to_string(&written.tracks_path).unwrap();
    let mut lines = tracks.lines();
    assert_eq!(
        lines.next(),
        Some(
            "name,track_id,popularity,album_name,album_release_date,\
             acousticness,instrumentalness,speechiness,valence,artist_name"
        )
    );
    assert_eq!(
        lines.next(),
        Some("Melt,t1,90,Rin album,2023-05-01,0.25,,,0.5,Rin")
    );
    assert_eq!(lines.count(), 2);
}
