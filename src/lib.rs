//! Chime - voice-driven personal assistant
//!
//! This library provides the assistant's asynchronous command pipeline:
//! - Speech ports (capture one utterance, speak a response)
//! - Intent classification over an ordered trigger-phrase table
//! - Command routing to action providers (knowledge, media, music, news)
//! - Deadline-driven reminder scheduling
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Session Loop                       │
//! │        capture ──► route ──► act, repeat            │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Command Router                       │
//! │   Intent table │ Providers │ Reminder Scheduler     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │             External Collaborators                   │
//! │   STT │ TTS │ Wikipedia │ Camera │ Spotify │ News   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod intent;
pub mod providers;
pub mod router;
pub mod scheduler;
pub mod session;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use intent::{Intent, classify};
pub use router::{CommandRouter, Disposition};
pub use scheduler::{Clock, ReminderInfo, ReminderScheduler, SystemClock, parse_clock_time};
pub use session::{Session, SessionBuilder};
pub use voice::{SpeechCapture, Transcript, VoiceResponse};
