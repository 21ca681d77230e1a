//! Configuration management for the Chime assistant

pub mod file;

use std::path::PathBuf;

use directories::ProjectDirs;
use file::ChimeConfigFile;

use crate::Result;

/// Assistant configuration
///
/// Built from the platform config file overlaid with `CHIME_*`
/// environment variables. Missing credentials never fail startup — the
/// corresponding provider simply reports itself unconfigured when asked.
#[derive(Debug, Clone)]
pub struct Config {
    /// Voice output configuration
    pub voice: VoiceConfig,

    /// API keys for external services
    pub api_keys: ApiKeys,

    /// Camera snapshot URL (network camera), if any
    pub camera_url: Option<String>,

    /// Directory photos and recordings are written to
    pub media_dir: PathBuf,
}

/// Voice output configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Speak through TTS instead of the console voice
    pub tts_enabled: bool,

    /// TTS model
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            tts_enabled: false,
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (TTS)
    pub openai: Option<String>,

    /// `NewsAPI` key
    pub news: Option<String>,

    /// Spotify client ID
    pub spotify_client_id: Option<String>,

    /// Spotify client secret
    pub spotify_client_secret: Option<String>,
}

impl Config {
    /// Load configuration from the config file and environment
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be read or
    /// parsed
    pub fn load() -> Result<Self> {
        let file = read_config_file()?.unwrap_or_default();

        let voice_defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            tts_enabled: env_flag("CHIME_TTS")
                .or(file.voice.tts_enabled)
                .unwrap_or(voice_defaults.tts_enabled),
            tts_model: file.voice.tts_model.unwrap_or(voice_defaults.tts_model),
            tts_voice: file.voice.tts_voice.unwrap_or(voice_defaults.tts_voice),
        };

        let api_keys = ApiKeys {
            openai: env_nonempty("CHIME_OPENAI_API_KEY").or(file.api_keys.openai),
            news: env_nonempty("CHIME_NEWS_API_KEY").or(file.api_keys.news),
            spotify_client_id: env_nonempty("CHIME_SPOTIFY_CLIENT_ID")
                .or(file.api_keys.spotify_client_id),
            spotify_client_secret: env_nonempty("CHIME_SPOTIFY_CLIENT_SECRET")
                .or(file.api_keys.spotify_client_secret),
        };

        let camera_url = env_nonempty("CHIME_CAMERA_URL").or(file.media.camera_url);
        let media_dir = env_nonempty("CHIME_MEDIA_DIR")
            .map(PathBuf::from)
            .or(file.media.dir)
            .unwrap_or_else(default_media_dir);

        Ok(Self {
            voice,
            api_keys,
            camera_url,
            media_dir,
        })
    }
}

/// Read the platform config file, if present
fn read_config_file() -> Result<Option<ChimeConfigFile>> {
    let Some(path) = config_file_path() else {
        return Ok(None);
    };

    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(&path)?;
    let parsed = toml::from_str(&raw)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(Some(parsed))
}

/// Platform path of the config file
fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "omni", "chime").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default media directory under the platform data dir
fn default_media_dir() -> PathBuf {
    ProjectDirs::from("dev", "omni", "chime")
        .map_or_else(|| PathBuf::from("media"), |dirs| dirs.data_dir().join("media"))
}

/// Non-empty environment variable
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Boolean environment variable ("1"/"true" enable, "0"/"false" disable)
fn env_flag(name: &str) -> Option<bool> {
    match env_nonempty(name)?.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_defaults() {
        let voice = VoiceConfig::default();
        assert!(!voice.tts_enabled);
        assert_eq!(voice.tts_model, "tts-1");
        assert_eq!(voice.tts_voice, "alloy");
    }
}
