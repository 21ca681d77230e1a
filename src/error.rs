//! Error types for the Chime assistant

use thiserror::Error;

/// Result type alias for Chime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Chime assistant
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Nothing usable was recognized from a capture attempt
    #[error("nothing recognized")]
    Recognition,

    /// Knowledge topic was ambiguous or has no page
    #[error("no information found for topic: {0}")]
    LookupNotFound(String),

    /// Knowledge collaborator failed for any other reason
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    /// Reminder time did not match the "H:MM AM/PM" clock format
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// Reminder phrase was missing the word "at" between description and time
    #[error("malformed reminder: {0}")]
    MalformedReminder(String),

    /// News category outside the fixed category set
    #[error("invalid news category: {0}")]
    InvalidCategory(String),

    /// Speech synthesis error
    #[error("speech error: {0}")]
    Speech(String),

    /// Camera / media capture error
    #[error("media error: {0}")]
    Media(String),

    /// Music search or playback error
    #[error("music error: {0}")]
    Music(String),

    /// News fetch error
    #[error("news error: {0}")]
    News(String),

    /// Any other external collaborator failure
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Render this error as a line suitable for speaking to the user.
    ///
    /// Every routing-level failure maps to a spoken message; none of them
    /// escape the session loop.
    #[must_use]
    pub fn spoken_message(&self) -> String {
        match self {
            Self::Recognition => "Sorry, I didn't catch that.".to_string(),
            Self::LookupNotFound(_) => {
                "Sorry, I couldn't find any information on that topic.".to_string()
            }
            Self::LookupFailed(_) => {
                "An error occurred while searching for the topic.".to_string()
            }
            Self::InvalidTimeFormat(_) => {
                "Invalid time format. Please specify the reminder time in \
                 'hour:minute AM/PM' format, for example, '10:30 AM'."
                    .to_string()
            }
            Self::MalformedReminder(_) => {
                "I couldn't tell the reminder from its time. Say it like \
                 'remind me to call mom at 10:30 AM'."
                    .to_string()
            }
            Self::InvalidCategory(_) => "Sorry, that's not a valid category.".to_string(),
            Self::Media(_) => "Sorry, I couldn't use the camera.".to_string(),
            Self::Music(_) => "Sorry, I couldn't play the music.".to_string(),
            Self::News(_) => "Sorry, I couldn't fetch the news.".to_string(),
            _ => "Sorry, something went wrong with that command.".to_string(),
        }
    }
}
