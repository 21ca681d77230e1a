//! Session loop
//!
//! Drives repeated capture→route cycles until the router reports
//! Farewell. The loop keeps exactly one primary capture outstanding at a
//! time; the router's news-category follow-up is the only nested one.

use std::path::PathBuf;
use std::sync::Arc;

use crate::providers::{
    Camera, EnterKeyStop, KnowledgeLookup, KnowledgeSummarizer, MediaCapture, MusicService,
    NewsSource, StopSignal, WikipediaClient,
};
use crate::router::{CommandRouter, Disposition};
use crate::scheduler::{Clock, ReminderScheduler, SystemClock};
use crate::voice::{SpeechCapture, VoiceResponse};

/// One assistant session
///
/// Sessions own their state (knowledge cache, pending reminders), so
/// independent sessions are fully isolated — the unit tests run several
/// side by side.
pub struct Session {
    capture: Arc<dyn SpeechCapture>,
    voice: Arc<dyn VoiceResponse>,
    router: CommandRouter,
}

impl Session {
    /// Start building a session over the two speech ports
    #[must_use]
    pub fn builder(
        capture: Arc<dyn SpeechCapture>,
        voice: Arc<dyn VoiceResponse>,
    ) -> SessionBuilder {
        SessionBuilder::new(capture, voice)
    }

    /// The router driving this session
    #[must_use]
    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    /// Run the listen→route loop until a Farewell intent.
    ///
    /// Reminders still pending when the loop ends are abandoned.
    pub async fn run(self) {
        if let Err(e) = self
            .voice
            .speak("Hi, I'm your assistant. How can I help you?")
            .await
        {
            tracing::warn!(error = %e, "greeting failed");
        }

        loop {
            let transcript = self.capture.capture().await;

            match self.router.route(&transcript).await {
                Disposition::Continue => {}
                Disposition::Shutdown => break,
            }
        }

        tracing::info!("session ended");
    }
}

/// Assembles a [`Session`] from ports and providers
///
/// Only the speech ports are required. Unconfigured providers answer with
/// a spoken "not configured" line instead of failing at build time.
pub struct SessionBuilder {
    capture: Arc<dyn SpeechCapture>,
    voice: Arc<dyn VoiceResponse>,
    summarizer: Arc<dyn KnowledgeSummarizer>,
    camera: Option<Arc<dyn Camera>>,
    music: Option<Arc<dyn MusicService>>,
    news: Option<Arc<dyn NewsSource>>,
    stop_signal: Arc<dyn StopSignal>,
    clock: Arc<dyn Clock>,
    media_dir: PathBuf,
}

impl SessionBuilder {
    /// Create a builder with default collaborators
    #[must_use]
    pub fn new(capture: Arc<dyn SpeechCapture>, voice: Arc<dyn VoiceResponse>) -> Self {
        Self {
            capture,
            voice,
            summarizer: Arc::new(WikipediaClient::new()),
            camera: None,
            music: None,
            news: None,
            stop_signal: Arc::new(EnterKeyStop),
            clock: Arc::new(SystemClock),
            media_dir: PathBuf::from("media"),
        }
    }

    /// Replace the knowledge-summary collaborator
    #[must_use]
    pub fn summarizer(mut self, summarizer: Arc<dyn KnowledgeSummarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Attach a camera
    #[must_use]
    pub fn camera(mut self, camera: Arc<dyn Camera>) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Attach a music service
    #[must_use]
    pub fn music(mut self, music: Arc<dyn MusicService>) -> Self {
        self.music = Some(music);
        self
    }

    /// Attach a news source
    #[must_use]
    pub fn news(mut self, news: Arc<dyn NewsSource>) -> Self {
        self.news = Some(news);
        self
    }

    /// Replace the recording stop signal
    #[must_use]
    pub fn stop_signal(mut self, stop_signal: Arc<dyn StopSignal>) -> Self {
        self.stop_signal = stop_signal;
        self
    }

    /// Replace the scheduler's clock (tests pin "now")
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the media output directory
    #[must_use]
    pub fn media_dir(mut self, media_dir: PathBuf) -> Self {
        self.media_dir = media_dir;
        self
    }

    /// Build the session
    #[must_use]
    pub fn build(self) -> Session {
        let scheduler = ReminderScheduler::with_clock(Arc::clone(&self.voice), self.clock);
        let knowledge = KnowledgeLookup::new(self.summarizer);
        let media = self
            .camera
            .map(|camera| MediaCapture::new(camera, self.media_dir));

        let router = CommandRouter::new(
            Arc::clone(&self.capture),
            Arc::clone(&self.voice),
            knowledge,
            media,
            self.music,
            self.news,
            scheduler,
            self.stop_signal,
        );

        Session {
            capture: self.capture,
            voice: self.voice,
            router,
        }
    }
}
