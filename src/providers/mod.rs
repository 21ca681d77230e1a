//! Action providers
//!
//! Independent request/response capabilities the router dispatches to:
//! knowledge lookup (with cache), media capture, music playback, and news
//! retrieval. Each one wraps an external collaborator behind a narrow
//! trait so sessions can be driven entirely by fakes in tests.

pub mod knowledge;
pub mod media;
pub mod music;
pub mod news;

pub use knowledge::{KnowledgeLookup, KnowledgeSummarizer, WikipediaClient};
pub use media::{Camera, EnterKeyStop, MediaCapture, RecordingHandle, SnapshotCamera, StopSignal};
pub use music::{MusicService, SpotifyClient, TrackRef};
pub use news::{Article, NewsApiClient, NewsCategory, NewsSource};
