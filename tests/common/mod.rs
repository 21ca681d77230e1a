//! Shared test fakes for the speech ports and action collaborators

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tokio::sync::Mutex;

use chime_assistant::providers::{
    Article, Camera, KnowledgeSummarizer, MusicService, NewsCategory, NewsSource, StopSignal,
    TrackRef,
};
use chime_assistant::scheduler::Clock;
use chime_assistant::voice::{SpeechCapture, Transcript, VoiceResponse};
use chime_assistant::{Error, Result};

/// Capture port playing back a scripted list of utterances.
///
/// Each entry may carry a simulated-listening delay. An exhausted script
/// returns "goodbye" so a buggy loop terminates instead of hanging the
/// test.
pub struct ScriptedCapture {
    script: Mutex<VecDeque<(Duration, String)>>,
}

impl ScriptedCapture {
    pub fn new<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self::with_delays(lines.into_iter().map(|l| (Duration::ZERO, l)))
    }

    pub fn with_delays<'a>(entries: impl IntoIterator<Item = (Duration, &'a str)>) -> Self {
        Self {
            script: Mutex::new(
                entries
                    .into_iter()
                    .map(|(d, l)| (d, l.to_string()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl SpeechCapture for ScriptedCapture {
    async fn capture(&self) -> Transcript {
        let next = self.script.lock().await.pop_front();
        match next {
            Some((delay, line)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Transcript::new(line)
            }
            None => Transcript::new("goodbye"),
        }
    }
}

/// Voice port recording every spoken line
#[derive(Default)]
pub struct RecordingVoice {
    spoken: Mutex<Vec<String>>,
}

impl RecordingVoice {
    pub async fn lines(&self) -> Vec<String> {
        self.spoken.lock().await.clone()
    }

    pub async fn count_of(&self, line: &str) -> usize {
        self.spoken
            .lock()
            .await
            .iter()
            .filter(|l| l.as_str() == line)
            .count()
    }
}

#[async_trait]
impl VoiceResponse for RecordingVoice {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().await.push(text.to_string());
        Ok(())
    }
}

/// Knowledge collaborator counting its invocations
#[derive(Default)]
pub struct StubSummarizer {
    pub calls: AtomicUsize,
}

#[async_trait]
impl KnowledgeSummarizer for StubSummarizer {
    async fn summarize(&self, topic: &str, _max_sentences: usize) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if topic == "atlantis" {
            return Err(Error::LookupNotFound(topic.to_string()));
        }
        Ok(format!("summary of {topic}"))
    }
}

/// News collaborator counting fetches
pub struct StubNews {
    pub fetches: AtomicUsize,
    articles: Vec<Article>,
}

impl StubNews {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            articles,
        }
    }
}

#[async_trait]
impl NewsSource for StubNews {
    async fn top_headlines(&self, _category: NewsCategory) -> Result<Vec<Article>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.articles.clone())
    }
}

/// Music collaborator with a single findable track
pub struct StubMusic {
    pub searches: AtomicUsize,
    pub plays: AtomicUsize,
    track: Option<TrackRef>,
}

impl StubMusic {
    pub fn with_track(track: Option<TrackRef>) -> Self {
        Self {
            searches: AtomicUsize::new(0),
            plays: AtomicUsize::new(0),
            track,
        }
    }
}

#[async_trait]
impl MusicService for StubMusic {
    async fn search(&self, _query: &str) -> Result<Option<TrackRef>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.track.clone())
    }

    async fn play(&self, _track: &TrackRef) -> Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Camera producing a fixed frame
pub struct StubCamera;

#[async_trait]
impl Camera for StubCamera {
    async fn fetch_frame(&self) -> Result<Vec<u8>> {
        Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
    }
}

/// Stop signal that resolves immediately
pub struct ImmediateStop;

#[async_trait]
impl StopSignal for ImmediateStop {
    async fn wait(&self) {}
}

/// Clock pinned to a fixed local time
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Arc<Self> {
        Arc::new(Self {
            now: Local
                .with_ymd_and_hms(y, mo, d, h, mi, 0)
                .single()
                .expect("unambiguous test time"),
        })
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }
}
