//! TOML configuration file loading
//!
//! Supports a `config.toml` in the platform config directory as a
//! persistent config source. All fields are optional — the file is a
//! partial overlay on top of defaults and environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ChimeConfigFile {
    /// Voice output configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Media capture configuration
    #[serde(default)]
    pub media: MediaFileConfig,
}

/// Voice output configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable spoken output via TTS (console voice otherwise)
    pub tts_enabled: Option<bool>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub news: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

/// Media capture configuration
#[derive(Debug, Default, Deserialize)]
pub struct MediaFileConfig {
    /// Camera snapshot URL (network camera)
    pub camera_url: Option<String>,

    /// Directory for photos and recordings
    pub dir: Option<PathBuf>,
}
