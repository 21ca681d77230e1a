use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chime_assistant::providers::{NewsApiClient, SnapshotCamera, SpotifyClient};
use chime_assistant::voice::{ConsoleCapture, ConsoleVoice, TtsSpeaker};
use chime_assistant::{Config, Session, VoiceResponse, classify};

/// Chime - voice-driven personal assistant
#[derive(Parser)]
#[command(name = "chime", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the routed intent for a transcript
    Classify {
        /// Transcript words
        #[arg(required = true)]
        transcript: Vec<String>,
    },
    /// Test the voice response port
    Say {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,chime_assistant=info",
        1 => "info,chime_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Classify { transcript } => cmd_classify(&transcript.join(" ")),
            Command::Say { text } => cmd_say(&config, &text).await,
        };
    }

    let voice = build_voice(&config);
    let capture = Arc::new(ConsoleCapture::default());

    let mut builder =
        Session::builder(capture, voice).media_dir(config.media_dir.clone());

    if let Some(url) = &config.camera_url {
        builder = builder.camera(Arc::new(SnapshotCamera::new(url.clone())));
    } else {
        tracing::debug!("no camera configured");
    }

    if let Some(key) = &config.api_keys.news {
        match NewsApiClient::new(key.clone()) {
            Ok(client) => builder = builder.news(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "news unavailable"),
        }
    }

    if let (Some(id), Some(secret)) = (
        &config.api_keys.spotify_client_id,
        &config.api_keys.spotify_client_secret,
    ) {
        match SpotifyClient::new(id.clone(), secret.clone()) {
            Ok(client) => builder = builder.music(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "music unavailable"),
        }
    }

    let session = builder.build();

    tracing::info!("chime ready - say \"goodbye\" to exit");
    session.run().await;

    Ok(())
}

/// Pick the voice output backend for this configuration
fn build_voice(config: &Config) -> Arc<dyn VoiceResponse> {
    if config.voice.tts_enabled {
        if let Some(key) = &config.api_keys.openai {
            match TtsSpeaker::new(
                key.clone(),
                config.voice.tts_model.clone(),
                config.voice.tts_voice.clone(),
            ) {
                Ok(speaker) => return Arc::new(speaker),
                Err(e) => {
                    tracing::warn!(error = %e, "TTS unavailable, using console voice");
                }
            }
        } else {
            tracing::warn!("TTS enabled but no API key configured, using console voice");
        }
    }

    Arc::new(ConsoleVoice)
}

/// Print the routed intent for a transcript
fn cmd_classify(transcript: &str) -> anyhow::Result<()> {
    match classify(transcript) {
        Ok(intent) => println!("{intent:?}"),
        Err(e) => println!("error: {e}"),
    }
    Ok(())
}

/// Test the voice response port
async fn cmd_say(config: &Config, text: &str) -> anyhow::Result<()> {
    let voice = build_voice(config);
    voice
        .speak(text)
        .await
        .map_err(|e| anyhow::anyhow!("speech failed: {e}"))?;
    Ok(())
}
