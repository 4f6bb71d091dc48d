//! Spotify Web API client
//!
//! Client-credentials authentication with a cached bearer token, a token
//! bucket in front of every HTTP request, and the three lookups the pipeline
//! needs: artist search, artist top tracks and audio features.
//!
//! API Documentation: https://developer.spotify.com/documentation/web-api

use crate::config::Credentials;
use crate::models::{FeatureSet, FieldValue};
use crate::services::provider::{ArtistMatch, MusicProvider, ProviderError, ProviderTrack};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const USER_AGENT: &str = concat!("songdata/", env!("CARGO_PKG_VERSION"));

/// Refresh the token this long before the provider says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Spotify client settings
#[derive(Debug, Clone)]
pub struct SpotifyClientConfig {
    pub credentials: Credentials,
    pub api_base_url: String,
    pub accounts_url: String,
    /// Market for top-tracks requests (ISO 3166-1 alpha-2)
    pub market: String,
    pub timeout: Duration,
    pub requests_per_second: u32,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    expires_in: u64,
}

/// Search endpoint response (artist type only)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    artists: Paging<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: Option<String>,
    name: String,
    #[serde(default)]
    popularity: i64,
    album: SpotifyAlbum,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: String,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AudioFeaturesResponse {
    #[serde(default)]
    audio_features: Vec<Option<serde_json::Map<String, serde_json::Value>>>,
}

/// Cached bearer token
#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    /// `None` when the lifetime is too large to represent
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn expiring_in(value: String, expires_in_secs: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(Duration::from_secs(expires_in_secs)),
        }
    }

    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + TOKEN_EXPIRY_MARGIN < expires_at,
            None => true,
        }
    }
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: Client,
    config: SpotifyClientConfig,
    token: Mutex<Option<AccessToken>>,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl SpotifyClient {
    pub fn new(config: SpotifyClientConfig) -> Result<Self, ProviderError> {
        let per_second = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            ProviderError::Config("requests_per_second must be at least 1".to_string())
        })?;

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            token: Mutex::new(None),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// Current bearer token, performing the client-credentials handshake
    /// when none is cached or the cached one is about to expire
    async fn bearer_token(&self) -> Result<String, ProviderError> {
        let mut token = self.token.lock().await;

        if let Some(cached) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(cached.value.clone());
        }

        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *token = Some(fresh);
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken, ProviderError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %self.config.accounts_url, "Requesting client-credentials token");

        let response = self
            .http_client
            .post(&self.config.accounts_url)
            .basic_auth(
                &self.config.credentials.client_id,
                Some(&self.config.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unauthorized(error_text));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(status.as_u16(), error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        tracing::info!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "Obtained provider access token"
        );

        Ok(AccessToken::expiring_in(token.access_token, token.expires_in))
    }

    /// Authenticated GET returning a JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let bearer = self.bearer_token().await?;

        // Rate limit
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path);
        tracing::debug!(url = %url, "Querying provider API");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&bearer)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Force a fresh handshake on the next call
            *self.token.lock().await = None;
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unauthorized(error_text));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(path.to_string()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl MusicProvider for SpotifyClient {
    async fn search_artists(&self, name: &str) -> Result<Vec<ArtistMatch>, ProviderError> {
        let query = format!("artist:{}", name);
        let response: SearchResponse = self
            .get_json("/search", &[("q", query.as_str()), ("type", "artist")])
            .await?;

        let matches = artist_matches(response);
        tracing::debug!(artist = %name, matches = matches.len(), "Artist search complete");
        Ok(matches)
    }

    async fn artist_top_tracks(&self, artist_id: &str) -> Result<Vec<ProviderTrack>, ProviderError> {
        let path = format!("/artists/{}/top-tracks", artist_id);
        let response: TopTracksResponse = self
            .get_json(&path, &[("market", self.config.market.as_str())])
            .await?;

        Ok(provider_tracks(response))
    }

    async fn audio_features(
        &self,
        track_ids: &[&str],
    ) -> Result<Vec<Option<FeatureSet>>, ProviderError> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = track_ids.join(",");
        let response: AudioFeaturesResponse = self
            .get_json("/audio-features", &[("ids", ids.as_str())])
            .await?;

        Ok(feature_sets(response))
    }
}

fn artist_matches(response: SearchResponse) -> Vec<ArtistMatch> {
    response
        .artists
        .items
        .into_iter()
        .map(|a| ArtistMatch {
            id: a.id,
            name: a.name,
        })
        .collect()
}

/// Tracks without an id (local files) cannot be looked up later and are dropped
fn provider_tracks(response: TopTracksResponse) -> Vec<ProviderTrack> {
    response
        .tracks
        .into_iter()
        .filter_map(|t| {
            let id = t.id?;
            Some(ProviderTrack {
                id,
                name: t.name,
                popularity: t.popularity,
                album_name: t.album.name,
                album_release_date: t.album.release_date.unwrap_or_default(),
            })
        })
        .collect()
}

fn feature_sets(response: AudioFeaturesResponse) -> Vec<Option<FeatureSet>> {
    response
        .audio_features
        .into_iter()
        .map(|entry| {
            entry.map(|object| {
                object
                    .iter()
                    .filter_map(|(name, value)| {
                        FieldValue::from_json(value).map(|v| (name.clone(), v))
                    })
                    .collect::<FeatureSet>()
            })
        })
        .collect()
}
