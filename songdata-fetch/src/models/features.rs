//! Feature name lists shared by the aggregator and the table writer

/// Features the averages and the per-track table are built around
pub const ANALYSED_FEATURES: [&str; 4] = ["acousticness", "instrumentalness", "speechiness", "valence"];

/// Provider-internal fields of a feature object
///
/// They take part in averaging (text fields reduce to their most frequent
/// value) but never appear as output columns.
pub const PROVIDER_INTERNAL_FIELDS: [&str; 5] = ["type", "id", "uri", "track_href", "analysis_url"];

/// Default feature allow-list: analysed features plus identifying fields
pub fn default_feature_allow_list() -> Vec<String> {
    ANALYSED_FEATURES
        .iter()
        .chain(PROVIDER_INTERNAL_FIELDS.iter())
        .map(|s| s.to_string())
        .collect()
}

/// Default column denylist for output tables
pub fn default_denylist() -> Vec<String> {
    PROVIDER_INTERNAL_FIELDS.iter().map(|s| s.to_string()).collect()
}
