//! Intent classification
//!
//! Maps a transcript to exactly one [`Intent`] via an ordered table of
//! (trigger phrase, extractor) rules. First matching trigger wins, so a
//! transcript containing several phrases routes to the earliest rule.

use crate::{Error, Result};

/// A classified spoken command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// "hello"
    Greeting,
    /// "how are you"
    StatusQuery,
    /// "search for <topic>"
    KnowledgeQuery {
        /// Topic to look up
        topic: String,
    },
    /// "take a photo"
    PhotoRequest,
    /// "record a video"
    VideoRequest,
    /// "play <song>"
    PlayRequest {
        /// Song to search for
        song: String,
    },
    /// "read today's news"
    NewsRequest,
    /// "remind me <description> at <time>"
    ReminderRequest {
        /// What to be reminded of
        description: String,
        /// Clock time in "H:MM AM/PM" form (validated by the scheduler)
        time_text: String,
    },
    /// "goodbye"
    Farewell,
    /// No trigger phrase matched
    Unrecognized,
}

/// One classification rule: a trigger phrase and a parameter extractor.
///
/// Only the reminder extractor can fail (missing "at" separator).
struct Rule {
    trigger: &'static str,
    extract: fn(&str) -> Result<Intent>,
}

/// Ordered precedence table. Order is load-bearing: a transcript carrying
/// several trigger phrases routes to the earliest rule, so broad triggers
/// like "play" sit below the more specific phrases.
const RULES: &[Rule] = &[
    Rule {
        trigger: "hello",
        extract: |_| Ok(Intent::Greeting),
    },
    Rule {
        trigger: "how are you",
        extract: |_| Ok(Intent::StatusQuery),
    },
    Rule {
        trigger: "search for",
        extract: |t| {
            Ok(Intent::KnowledgeQuery {
                topic: remainder_after(t, "search for"),
            })
        },
    },
    Rule {
        trigger: "take a photo",
        extract: |_| Ok(Intent::PhotoRequest),
    },
    Rule {
        trigger: "record a video",
        extract: |_| Ok(Intent::VideoRequest),
    },
    Rule {
        trigger: "play",
        extract: |t| {
            Ok(Intent::PlayRequest {
                song: remainder_after(t, "play"),
            })
        },
    },
    Rule {
        trigger: "read today's news",
        extract: |_| Ok(Intent::NewsRequest),
    },
    Rule {
        trigger: "remind me",
        extract: extract_reminder,
    },
    Rule {
        trigger: "goodbye",
        extract: |_| Ok(Intent::Farewell),
    },
];

/// Classify a transcript into exactly one intent.
///
/// Input is normalized to lowercase before matching, so callers may pass
/// raw transcripts.
///
/// # Errors
///
/// Returns [`Error::MalformedReminder`] when a reminder phrase lacks the
/// "at" separating description from time.
pub fn classify(transcript: &str) -> Result<Intent> {
    let normalized = transcript.to_lowercase();

    for rule in RULES {
        if normalized.contains(rule.trigger) {
            return (rule.extract)(&normalized);
        }
    }

    Ok(Intent::Unrecognized)
}

/// Text after the first occurrence of `trigger`, trimmed
fn remainder_after(transcript: &str, trigger: &str) -> String {
    transcript
        .find(trigger)
        .map(|pos| transcript[pos + trigger.len()..].trim().to_string())
        .unwrap_or_default()
}

/// Split "remind me <description> at <time>" on the LAST " at " so that
/// descriptions containing "at" ("look at documents") parse correctly.
fn extract_reminder(transcript: &str) -> Result<Intent> {
    let remainder = remainder_after(transcript, "remind me");

    let split_at = remainder
        .rfind(" at ")
        .ok_or_else(|| Error::MalformedReminder(remainder.clone()))?;

    let description = remainder[..split_at].trim().to_string();
    let time_text = remainder[split_at + 4..].trim().to_string();

    Ok(Intent::ReminderRequest {
        description,
        time_text,
    })
}
