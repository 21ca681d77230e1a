//! End-to-end pipeline tests
//!
//! Drive full sessions with scripted captures and a recording voice port;
//! no network, no audio hardware, no wall-clock waits.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chime_assistant::Session;
use chime_assistant::providers::{Article, TrackRef};

mod common;

use common::{
    FixedClock, ImmediateStop, RecordingVoice, ScriptedCapture, StubCamera, StubMusic, StubNews,
    StubSummarizer,
};

/// Build a session around scripted captures and shared fakes
fn scripted_session(
    lines: &[&str],
) -> (
    Session,
    Arc<RecordingVoice>,
    Arc<StubSummarizer>,
    Arc<StubNews>,
    Arc<StubMusic>,
) {
    let capture = Arc::new(ScriptedCapture::new(lines.iter().copied()));
    let voice = Arc::new(RecordingVoice::default());
    let summarizer = Arc::new(StubSummarizer::default());
    let news = Arc::new(StubNews::with_articles(vec![Article {
        title: "Big headline".to_string(),
        description: Some("All the details".to_string()),
    }]));
    let music = Arc::new(StubMusic::with_track(Some(TrackRef {
        uri: "spotify:track:abc".to_string(),
        name: "Take Five".to_string(),
        artist: "Dave Brubeck".to_string(),
    })));

    let session = Session::builder(capture, Arc::clone(&voice) as Arc<dyn chime_assistant::VoiceResponse>)
        .summarizer(Arc::clone(&summarizer) as Arc<dyn chime_assistant::providers::KnowledgeSummarizer>)
        .news(Arc::clone(&news) as Arc<dyn chime_assistant::providers::NewsSource>)
        .music(Arc::clone(&music) as Arc<dyn chime_assistant::providers::MusicService>)
        .build();

    (session, voice, summarizer, news, music)
}

#[tokio::test]
async fn test_goodbye_terminates_session() {
    let (session, voice, ..) = scripted_session(&["goodbye"]);

    session.run().await;

    let lines = voice.lines().await;
    assert_eq!(lines.first().map(String::as_str), Some("Hi, I'm your assistant. How can I help you?"));
    assert_eq!(lines.last().map(String::as_str), Some("Goodbye!"));
}

#[tokio::test]
async fn test_greeting_and_status() {
    let (session, voice, ..) = scripted_session(&["hello", "how are you", "goodbye"]);

    session.run().await;

    let lines = voice.lines().await;
    assert!(lines.contains(&"Hello there!".to_string()));
    assert!(lines.contains(&"I'm doing great, thank you!".to_string()));
}

#[tokio::test]
async fn test_empty_transcript_recovers_silently() {
    let (session, voice, ..) = scripted_session(&["", "hello", "goodbye"]);

    session.run().await;

    let lines = voice.lines().await;
    // Greeting, "Hello there!", "Goodbye!" - nothing spoken for the empty turn
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"Hello there!".to_string()));
}

#[tokio::test]
async fn test_unrecognized_command_reports_and_continues() {
    let (session, voice, ..) = scripted_session(&["make me a sandwich", "hello", "goodbye"]);

    session.run().await;

    let lines = voice.lines().await;
    assert!(lines.contains(&"I'm sorry, I didn't understand that command.".to_string()));
    assert!(lines.contains(&"Hello there!".to_string()));
}

#[tokio::test]
async fn test_search_caches_and_speaks_once_per_turn() {
    let (session, voice, summarizer, ..) =
        scripted_session(&["search for octopus", "search for octopus", "goodbye"]);

    session.run().await;

    // One collaborator call, two identical spoken summaries
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(voice.count_of("summary of octopus").await, 2);
}

#[tokio::test]
async fn test_search_not_found_speaks_distinct_error() {
    let (session, voice, summarizer, ..) =
        scripted_session(&["search for atlantis", "goodbye"]);

    session.run().await;

    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    assert!(
        voice
            .lines()
            .await
            .contains(&"Sorry, I couldn't find any information on that topic.".to_string())
    );
}

#[tokio::test]
async fn test_precedence_hello_beats_play() {
    let (session, voice, _, _, music) = scripted_session(&["hello, play jazz", "goodbye"]);

    session.run().await;

    assert!(voice.lines().await.contains(&"Hello there!".to_string()));
    assert_eq!(music.searches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_play_request_starts_playback() {
    let (session, voice, _, _, music) = scripted_session(&["play take five", "goodbye"]);

    session.run().await;

    assert_eq!(music.searches.load(Ordering::SeqCst), 1);
    assert_eq!(music.plays.load(Ordering::SeqCst), 1);
    assert!(voice.lines().await.contains(&"Now playing Take Five.".to_string()));
}

#[tokio::test]
async fn test_play_request_song_not_found() {
    let capture = Arc::new(ScriptedCapture::new(["play nothing that exists", "goodbye"]));
    let voice = Arc::new(RecordingVoice::default());
    let music = Arc::new(StubMusic::with_track(None));

    let session = Session::builder(capture, Arc::clone(&voice) as Arc<dyn chime_assistant::VoiceResponse>)
        .music(Arc::clone(&music) as Arc<dyn chime_assistant::providers::MusicService>)
        .build();
    session.run().await;

    assert_eq!(music.searches.load(Ordering::SeqCst), 1);
    assert_eq!(music.plays.load(Ordering::SeqCst), 0);
    assert!(
        voice
            .lines()
            .await
            .contains(&"Sorry, I couldn't find the song nothing that exists.".to_string())
    );
}

#[tokio::test]
async fn test_news_happy_path_reads_headlines() {
    let (session, voice, _, news, _) =
        scripted_session(&["read today's news", "technology", "goodbye"]);

    session.run().await;

    assert_eq!(news.fetches.load(Ordering::SeqCst), 1);

    let lines = voice.lines().await;
    assert!(lines.contains(&"Sure, which category of news would you like to hear?".to_string()));
    assert!(lines.contains(&"Reading today's technology news:".to_string()));
    assert!(lines.contains(&"Big headline".to_string()));
    assert!(lines.contains(&"All the details".to_string()));
}

#[tokio::test]
async fn test_news_invalid_category_fetches_nothing() {
    let (session, voice, _, news, _) =
        scripted_session(&["read today's news", "gossip", "goodbye"]);

    session.run().await;

    assert_eq!(news.fetches.load(Ordering::SeqCst), 0);
    assert!(
        voice
            .lines()
            .await
            .contains(&"Sorry, that's not a valid category.".to_string())
    );
}

#[tokio::test]
async fn test_news_empty_category_fetches_nothing() {
    let (session, _, _, news, _) = scripted_session(&["read today's news", "", "goodbye"]);

    session.run().await;

    assert_eq!(news.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_news_unconfigured_reports() {
    let capture = Arc::new(ScriptedCapture::new(["read today's news", "goodbye"]));
    let voice = Arc::new(RecordingVoice::default());

    let session = Session::builder(capture, Arc::clone(&voice) as Arc<dyn chime_assistant::VoiceResponse>).build();
    session.run().await;

    assert!(
        voice
            .lines()
            .await
            .contains(&"Sorry, news isn't configured.".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_reminder_fires_once_at_deadline() {
    let capture = Arc::new(ScriptedCapture::with_delays([
        (Duration::ZERO, "remind me call mom at 10:30 pm"),
        // Keep the session listening past the deadline
        (Duration::from_secs(31 * 60), "goodbye"),
    ]));
    let voice = Arc::new(RecordingVoice::default());

    let session = Session::builder(capture, Arc::clone(&voice) as Arc<dyn chime_assistant::VoiceResponse>)
        .clock(FixedClock::at(2026, 6, 10, 22, 0))
        .build();
    session.run().await;

    let lines = voice.lines().await;
    assert!(lines.contains(&"Reminder set successfully.".to_string()));
    assert_eq!(voice.count_of("Reminder: call mom").await, 1);
}

#[tokio::test]
async fn test_reminder_invalid_time_reported() {
    let (session, voice, ..) = scripted_session(&["remind me call mom at soon", "goodbye"]);

    session.run().await;

    let lines = voice.lines().await;
    assert!(!lines.contains(&"Reminder set successfully.".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("Invalid time format.")));
}

#[tokio::test]
async fn test_reminder_missing_at_is_distinct_error() {
    let (session, voice, ..) = scripted_session(&["remind me call mom later", "goodbye"]);

    session.run().await;

    let lines = voice.lines().await;
    assert!(!lines.contains(&"Reminder set successfully.".to_string()));
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("I couldn't tell the reminder from its time."))
    );
}

#[tokio::test]
async fn test_photo_and_video_capture() {
    let media_dir = tempfile::tempdir().unwrap();

    let capture = Arc::new(ScriptedCapture::with_delays([
        (Duration::ZERO, "take a photo"),
        (Duration::ZERO, "record a video"),
        // Give the recording watcher time to stop and speak
        (Duration::from_millis(500), "goodbye"),
    ]));
    let voice = Arc::new(RecordingVoice::default());

    let session = Session::builder(capture, Arc::clone(&voice) as Arc<dyn chime_assistant::VoiceResponse>)
        .camera(Arc::new(StubCamera))
        .stop_signal(Arc::new(ImmediateStop))
        .media_dir(media_dir.path().to_path_buf())
        .build();
    session.run().await;

    let lines = voice.lines().await;
    assert!(lines.contains(&"Photo captured successfully!".to_string()));
    assert!(lines.contains(&"Recording. Press enter to stop.".to_string()));
    assert!(lines.contains(&"Recording stopped.".to_string()));

    // The photo landed in the media directory
    let entries: Vec<_> = std::fs::read_dir(media_dir.path()).unwrap().collect();
    assert!(!entries.is_empty());
}

#[tokio::test]
async fn test_camera_unconfigured_reports() {
    let capture = Arc::new(ScriptedCapture::new(["take a photo", "goodbye"]));
    let voice = Arc::new(RecordingVoice::default());

    let session = Session::builder(capture, Arc::clone(&voice) as Arc<dyn chime_assistant::VoiceResponse>).build();
    session.run().await;

    assert!(
        voice
            .lines()
            .await
            .contains(&"Sorry, no camera is configured.".to_string())
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    // Two sessions share nothing: each cache misses once
    let (first, _, first_summarizer, ..) = scripted_session(&["search for octopus", "goodbye"]);
    let (second, _, second_summarizer, ..) = scripted_session(&["search for octopus", "goodbye"]);

    first.run().await;
    second.run().await;

    assert_eq!(first_summarizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_summarizer.calls.load(Ordering::SeqCst), 1);
}
