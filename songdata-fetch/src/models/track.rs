//! Track records and per-track feature sets

use super::field::{FieldMap, FieldValue};

/// Column name for the artist the record belongs to
pub const ARTIST_NAME_COLUMN: &str = "artist_name";

/// Track metadata columns of the per-track table, in output order
pub const TRACK_COLUMNS: [&str; 5] = [
    "name",
    "track_id",
    "popularity",
    "album_name",
    "album_release_date",
];

/// Feature object for a single track, as returned by the provider
///
/// Holds every scalar field of the provider object, numeric and text
/// (including identifying fields such as `id` and `uri`).
pub type FeatureSet = FieldMap;

/// One representative value per feature name for an artist
pub type ArtistAverage = FieldMap;

/// A popular track of an artist, with basic album metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Artist name as queried (not necessarily the provider's canonical name)
    pub artist_name: String,
    pub track_name: String,
    pub track_id: String,
    pub popularity: i64,
    pub album_name: String,
    /// Release date as reported by the provider (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
    pub album_release_date: String,
}

impl TrackRecord {
    /// Flatten into a table row
    pub fn to_row(&self) -> FieldMap {
        let mut row = FieldMap::new();
        row.insert(ARTIST_NAME_COLUMN, FieldValue::Text(self.artist_name.clone()));
        row.insert("name", FieldValue::Text(self.track_name.clone()));
        row.insert("track_id", FieldValue::Text(self.track_id.clone()));
        row.insert("popularity", FieldValue::Int(self.popularity));
        row.insert("album_name", FieldValue::Text(self.album_name.clone()));
        row.insert(
            "album_release_date",
            FieldValue::Text(self.album_release_date.clone()),
        );
        row
    }
}

/// A track together with its feature set, if the provider had one
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFeatures {
    pub track: TrackRecord,
    pub features: Option<FeatureSet>,
}

impl TrackFeatures {
    /// Track metadata row extended with the track's features
    ///
    /// Metadata columns win when a feature shares their name.
    pub fn to_row(&self) -> FieldMap {
        let mut row = self.track.to_row();
        if let Some(features) = &self.features {
            for (name, value) in features.iter() {
                if !row.contains_key(name) {
                    row.insert(name, value.clone());
                }
            }
        }
        row
    }
}
