//! Console-backed speech capture
//!
//! Stands in for a microphone + recognition backend: each capture reads
//! one line interactively on the blocking pool, so the async pipeline
//! sees the same "listen once, await the result" shape a real recognizer
//! would give it.

use async_trait::async_trait;
use dialoguer::Input;

use super::{SpeechCapture, Transcript};

/// Captures "utterances" as typed console lines
pub struct ConsoleCapture {
    prompt: String,
}

impl ConsoleCapture {
    /// Create a console capture with the given prompt label
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Default for ConsoleCapture {
    fn default() -> Self {
        Self::new("you")
    }
}

#[async_trait]
impl SpeechCapture for ConsoleCapture {
    async fn capture(&self) -> Transcript {
        let prompt = self.prompt.clone();

        let line = tokio::task::spawn_blocking(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
        })
        .await;

        match line {
            Ok(Ok(text)) => {
                let transcript = Transcript::new(text);
                tracing::debug!(transcript = %transcript, "captured");
                transcript
            }
            Ok(Err(e)) => {
                // Closed stdin or terminal error counts as "nothing heard"
                tracing::debug!(error = %e, "console capture failed");
                Transcript::empty()
            }
            Err(e) => {
                tracing::warn!(error = %e, "capture task panicked");
                Transcript::empty()
            }
        }
    }
}
