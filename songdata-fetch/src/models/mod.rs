//! Data models for tracks, features and table rows

pub mod features;
pub mod field;
pub mod track;

pub use features::{
    default_denylist, default_feature_allow_list, ANALYSED_FEATURES, PROVIDER_INTERNAL_FIELDS,
};
pub use field::{upsert_keyed, FieldMap, FieldValue};
pub use track::{
    ArtistAverage, FeatureSet, TrackFeatures, TrackRecord, ARTIST_NAME_COLUMN, TRACK_COLUMNS,
};
