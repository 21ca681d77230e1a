//! Command routing
//!
//! The hub of the pipeline: classifies each transcript, extracts
//! parameters, and invokes the matching action provider or the reminder
//! scheduler. Every failure is converted to a spoken message at this
//! boundary — a bad command or backend hiccup never ends the session.

use std::str::FromStr;
use std::sync::Arc;

use crate::intent::{Intent, classify};
use crate::providers::{
    KnowledgeLookup, MediaCapture, MusicService, NewsCategory, NewsSource, StopSignal,
};
use crate::scheduler::ReminderScheduler;
use crate::voice::{SpeechCapture, Transcript, VoiceResponse};

/// What the session loop should do after a routed turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keep listening
    Continue,
    /// Farewell recognized: shut the session down
    Shutdown,
}

/// Routes transcripts to actions
///
/// Holds the session's providers and scheduler; unconfigured providers
/// are `None` and answer with a spoken "not configured" line.
pub struct CommandRouter {
    capture: Arc<dyn SpeechCapture>,
    voice: Arc<dyn VoiceResponse>,
    knowledge: KnowledgeLookup,
    media: Option<MediaCapture>,
    music: Option<Arc<dyn MusicService>>,
    news: Option<Arc<dyn NewsSource>>,
    scheduler: ReminderScheduler,
    stop_signal: Arc<dyn StopSignal>,
}

impl CommandRouter {
    /// Create a router over the given ports
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        capture: Arc<dyn SpeechCapture>,
        voice: Arc<dyn VoiceResponse>,
        knowledge: KnowledgeLookup,
        media: Option<MediaCapture>,
        music: Option<Arc<dyn MusicService>>,
        news: Option<Arc<dyn NewsSource>>,
        scheduler: ReminderScheduler,
        stop_signal: Arc<dyn StopSignal>,
    ) -> Self {
        Self {
            capture,
            voice,
            knowledge,
            media,
            music,
            news,
            scheduler,
            stop_signal,
        }
    }

    /// The reminder scheduler backing this router
    #[must_use]
    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Classify one transcript and perform the matching action.
    ///
    /// Returns the session disposition; all errors are spoken, none
    /// propagate.
    pub async fn route(&self, transcript: &Transcript) -> Disposition {
        if transcript.is_empty() {
            // Recognition failure is recovered locally: keep listening
            tracing::debug!("nothing recognized, skipping turn");
            return Disposition::Continue;
        }

        tracing::info!(transcript = %transcript, "routing command");

        match classify(transcript.as_str()) {
            Ok(intent) => self.perform(intent).await,
            Err(e) => {
                // Malformed reminder: distinct, user-visible error
                tracing::debug!(error = %e, "classification error");
                self.say(&e.spoken_message()).await;
                Disposition::Continue
            }
        }
    }

    /// Perform a classified intent
    async fn perform(&self, intent: Intent) -> Disposition {
        match intent {
            Intent::Greeting => self.say("Hello there!").await,
            Intent::StatusQuery => self.say("I'm doing great, thank you!").await,
            Intent::KnowledgeQuery { topic } => self.lookup(&topic).await,
            Intent::PhotoRequest => self.take_photo().await,
            Intent::VideoRequest => self.record_video().await,
            Intent::PlayRequest { song } => self.play_song(&song).await,
            Intent::NewsRequest => self.read_news().await,
            Intent::ReminderRequest {
                description,
                time_text,
            } => self.set_reminder(&description, &time_text).await,
            Intent::Farewell => {
                self.say("Goodbye!").await;
                return Disposition::Shutdown;
            }
            Intent::Unrecognized => {
                self.say("I'm sorry, I didn't understand that command.").await;
            }
        }
        Disposition::Continue
    }

    /// Speak, logging (but swallowing) voice-port failures
    async fn say(&self, text: &str) {
        if let Err(e) = self.voice.speak(text).await {
            tracing::warn!(error = %e, "speech output failed");
        }
    }

    async fn lookup(&self, topic: &str) {
        match self.knowledge.lookup(topic).await {
            Ok(summary) => self.say(&summary).await,
            Err(e) => {
                tracing::warn!(topic, error = %e, "knowledge lookup failed");
                self.say(&e.spoken_message()).await;
            }
        }
    }

    async fn take_photo(&self) {
        let Some(media) = &self.media else {
            self.say("Sorry, no camera is configured.").await;
            return;
        };

        match media.take_photo().await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "photo saved");
                self.say("Photo captured successfully!").await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "photo capture failed");
                self.say("Sorry, I couldn't capture the photo.").await;
            }
        }
    }

    /// Start a recording on its own task; routing continues immediately.
    ///
    /// The recording ends when the external stop signal resolves — the
    /// only human-in-the-loop termination in the system.
    async fn record_video(&self) {
        let Some(media) = &self.media else {
            self.say("Sorry, no camera is configured.").await;
            return;
        };

        let handle = media.start_recording();
        self.say("Recording. Press enter to stop.").await;

        let stop_signal = Arc::clone(&self.stop_signal);
        let voice = Arc::clone(&self.voice);
        tokio::spawn(async move {
            stop_signal.wait().await;
            match handle.stop().await {
                Ok(frames) => {
                    tracing::info!(frames, "recording finished");
                    if let Err(e) = voice.speak("Recording stopped.").await {
                        tracing::warn!(error = %e, "speech output failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "recording failed");
                    if let Err(e) = voice.speak("Sorry, I couldn't record the video.").await {
                        tracing::warn!(error = %e, "speech output failed");
                    }
                }
            }
        });
    }

    async fn play_song(&self, song: &str) {
        let Some(music) = &self.music else {
            self.say("Sorry, music playback isn't configured.").await;
            return;
        };

        match music.search(song).await {
            Ok(Some(track)) => match music.play(&track).await {
                Ok(()) => self.say(&format!("Now playing {}.", track.name)).await,
                Err(e) => {
                    tracing::warn!(error = %e, "playback failed");
                    self.say(&e.spoken_message()).await;
                }
            },
            Ok(None) => {
                self.say(&format!("Sorry, I couldn't find the song {song}."))
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "music search failed");
                self.say(&e.spoken_message()).await;
            }
        }
    }

    /// The nested news-category exchange: prompt, capture once more,
    /// validate, then fetch and read the headlines.
    async fn read_news(&self) {
        let Some(news) = &self.news else {
            self.say("Sorry, news isn't configured.").await;
            return;
        };

        self.say("Sure, which category of news would you like to hear?")
            .await;

        // The only sanctioned nested capture; the primary loop resumes
        // after this turn completes.
        let reply = self.capture.capture().await;

        let category = match NewsCategory::from_str(reply.as_str()) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(reply = %reply, "invalid news category");
                self.say(&e.spoken_message()).await;
                return;
            }
        };

        match news.top_headlines(category).await {
            Ok(articles) if articles.is_empty() => {
                self.say("Sorry, no news articles available for this category.")
                    .await;
            }
            Ok(articles) => {
                self.say(&format!("Reading today's {category} news:")).await;
                for article in articles {
                    self.say(&article.title).await;
                    if let Some(description) = article.description.filter(|d| !d.is_empty()) {
                        self.say(&description).await;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "news fetch failed");
                self.say(&e.spoken_message()).await;
            }
        }
    }

    async fn set_reminder(&self, description: &str, time_text: &str) {
        match self.scheduler.schedule(description, time_text).await {
            Ok(_) => self.say("Reminder set successfully.").await,
            Err(e) => {
                tracing::debug!(error = %e, "reminder rejected");
                self.say(&e.spoken_message()).await;
            }
        }
    }
}
