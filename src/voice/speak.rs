//! Speech output backends
//!
//! `TtsSpeaker` synthesizes via an HTTP speech API and hands the audio to
//! a system player; `ConsoleVoice` prints the line for credential-less and
//! headless runs.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use super::VoiceResponse;
use crate::{Error, Result};

/// System audio players probed in order
const PLAYERS: &[&str] = &["mpv", "ffplay", "afplay", "mpg123"];

/// Speaks by printing to stdout
///
/// Used when no TTS credentials are configured, and handy under `-v` logs
/// since every spoken line also goes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleVoice;

#[async_trait]
impl VoiceResponse for ConsoleVoice {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::info!(text, "speaking");
        println!("chime: {text}");
        Ok(())
    }
}

/// Speaks via the `OpenAI` speech-synthesis API and a local audio player
pub struct TtsSpeaker {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
    player: PathBuf,
}

impl TtsSpeaker {
    /// Create a new speaker
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or no system audio player is
    /// installed
    pub fn new(api_key: String, model: String, voice: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("API key required for TTS".to_string()));
        }

        let player = find_player()
            .ok_or_else(|| Error::Config(format!("no audio player found (tried {PLAYERS:?})")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            voice,
            player,
        })
    }

    /// Synthesize text, returning MP3 bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
        }

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Speech(format!("TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl VoiceResponse for TtsSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::debug!(text, "speaking");

        let audio = self.synthesize(text).await?;

        // Spool to a temp file and block on the player so speech finishes
        // before the caller's next listen.
        let mut spool = tempfile::Builder::new()
            .prefix("chime-tts-")
            .suffix(".mp3")
            .tempfile()?;
        spool.write_all(&audio)?;
        spool.flush()?;

        let status = player_command(&self.player, spool.path().as_os_str())
            .status()
            .await?;

        if !status.success() {
            return Err(Error::Speech(format!(
                "audio player exited with {status}"
            )));
        }

        Ok(())
    }
}

/// Locate the first installed system audio player
fn find_player() -> Option<PathBuf> {
    PLAYERS.iter().find_map(|name| which::which(name).ok())
}

/// Build a silent, auto-exiting playback command for the given player
fn player_command(player: &std::path::Path, audio_path: &std::ffi::OsStr) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(player);

    match player.file_stem().and_then(|s| s.to_str()) {
        Some("mpv") => {
            cmd.arg("--no-video").arg("--really-quiet");
        }
        Some("ffplay") => {
            cmd.arg("-nodisp").arg("-autoexit").arg("-loglevel").arg("quiet");
        }
        Some("mpg123") => {
            cmd.arg("-q");
        }
        _ => {}
    }

    cmd.arg(audio_path);
    cmd.stdout(std::process::Stdio::null());
    cmd.stderr(std::process::Stdio::null());
    cmd
}
