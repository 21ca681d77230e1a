//! Voice ports
//!
//! Narrow interfaces for the two speech collaborators: capturing one
//! utterance as text and rendering text as speech. Everything behind these
//! traits (microphones, recognition backends, synthesis engines) is an
//! external capability; the pipeline only ever sees a [`Transcript`].

mod capture;
mod speak;

pub use capture::ConsoleCapture;
pub use speak::{ConsoleVoice, TtsSpeaker};

use std::fmt;

use async_trait::async_trait;

use crate::Result;

/// The text of one capture attempt, normalized to lowercase.
///
/// Empty means "nothing recognized" — capture backends use it uniformly
/// for silence and for backend failure; the distinction is not surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript(String);

impl Transcript {
    /// Normalize raw recognized text into a transcript
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// The "nothing recognized" transcript
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Transcript text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing was recognized
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for speech capture backends
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Listen once and produce a transcript.
    ///
    /// Completes exactly once per invocation; failures are folded into an
    /// empty transcript. Callers keep at most one capture outstanding per
    /// logical turn — the session loop serializes primary captures, and
    /// the news-category follow-up is the only nested one.
    async fn capture(&self) -> Transcript;
}

/// Trait for speech output backends
#[async_trait]
pub trait VoiceResponse: Send + Sync {
    /// Render text as speech.
    ///
    /// Completes before the caller logically needs its next listen.
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&self, text: &str) -> Result<()>;
}
