//! Music search and playback via the Spotify Web API
//!
//! Client-credentials token flow with in-process caching, a single-result
//! track search, and a playback start against the user's active device.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{Error, Result};

/// Token refresh margin before expiry
const TOKEN_MARGIN_SECS: i64 = 30;

/// Reference to a playable track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    /// Provider-specific URI (e.g. `spotify:track:...`)
    pub uri: String,
    /// Track title
    pub name: String,
    /// Primary artist name
    pub artist: String,
}

/// Trait for music search/playback collaborators
#[async_trait]
pub trait MusicService: Send + Sync {
    /// Search for the best-matching track, if any
    ///
    /// # Errors
    ///
    /// Returns error if the search backend fails
    async fn search(&self, query: &str) -> Result<Option<TrackRef>>;

    /// Start playback of a track
    ///
    /// # Errors
    ///
    /// Returns error if playback could not be started
    async fn play(&self, track: &TrackRef) -> Result<()>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Deserialize)]
struct TrackPage {
    items: Vec<TrackItem>,
}

#[derive(Deserialize)]
struct TrackItem {
    uri: String,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistItem>,
}

#[derive(Deserialize)]
struct ArtistItem {
    name: String,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Spotify Web API client (client-credentials flow)
pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns error if either credential is empty
    pub fn new(client_id: String, client_secret: String) -> Result<Self> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::Config(
                "Spotify client id and secret required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            client_id,
            client_secret,
            token: Mutex::new(None),
        })
    }

    /// Fetch or reuse a client-credentials access token
    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Utc::now() + Duration::seconds(TOKEN_MARGIN_SECS) {
                return Ok(cached.value.clone());
            }
        }

        let response = self
            .client
            .post("https://accounts.spotify.com/api/token")
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::Music(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Music(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Music(e.to_string()))?;

        let value = token.access_token.clone();
        *guard = Some(CachedToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });

        Ok(value)
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn search(&self, query: &str) -> Result<Option<TrackRef>> {
        let token = self.access_token().await?;
        let url = format!(
            "https://api.spotify.com/v1/search?q={}&type=track&limit=1",
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| Error::Music(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Music(format!(
                "search returned {}",
                response.status()
            )));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Music(e.to_string()))?;

        Ok(results.tracks.items.into_iter().next().map(|item| TrackRef {
            uri: item.uri,
            name: item.name,
            artist: item
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
        }))
    }

    async fn play(&self, track: &TrackRef) -> Result<()> {
        let token = self.access_token().await?;

        let response = self
            .client
            .put("https://api.spotify.com/v1/me/player/play")
            .bearer_auth(&token)
            .json(&serde_json::json!({ "uris": [track.uri] }))
            .send()
            .await
            .map_err(|e| Error::Music(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Music(format!(
                "playback returned {}",
                response.status()
            )));
        }

        tracing::info!(track = %track.name, artist = %track.artist, "playback started");
        Ok(())
    }
}
