//! Conversation turns.
//!
//! A [`Message`] is one entry in the widget's log. Errors are not a separate
//! kind: a failed request produces an ordinary assistant message carrying
//! [`FALLBACK_MESSAGE`].

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text shown in place of an assistant reply when a request fails.
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Greeting rendered when the log is empty. Never stored or sent.
pub const GREETING: &str =
    "👋 Hi! I'm your AI customer support assistant. How can I help you today?";

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the widget.
    User,
    /// The remote assistant service (or the fallback text).
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Rendering identity. Not transmitted to the service.
    pub id: String,
    /// Message content.
    pub content: String,
    /// Role of the author.
    pub role: Role,
    /// ISO-8601 point in time, kept verbatim as reported.
    pub timestamp: String,
}

impl Message {
    /// Create a user message stamped with the local clock.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role: Role::User,
            timestamp: now_iso8601(),
        }
    }

    /// Create an assistant message with the timestamp the service reported.
    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            role: Role::Assistant,
            timestamp: timestamp.into(),
        }
    }

    /// Create the assistant message substituted for a failed request.
    pub fn fallback() -> Self {
        Self::assistant(FALLBACK_MESSAGE, now_iso8601())
    }

    /// Parse the timestamp.
    ///
    /// Accepts RFC 3339 as well as the offset-less form Python's `isoformat()`
    /// produces; naive values are read as local time.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(ts);
        }
        let naive = NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        naive
            .and_local_timezone(Local)
            .earliest()
            .map(|ts| ts.fixed_offset())
    }

    /// Local time of day for display, e.g. `14:05:09`.
    pub fn time_of_day(&self) -> Option<String> {
        self.parsed_timestamp()
            .map(|ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string())
    }
}

/// Current time formatted like a browser's `toISOString()`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let user = Message::user("Hello");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Hello");
        assert!(user.timestamp.ends_with('Z'));

        let reply = Message::assistant("Hi!", "2024-05-01T10:00:00Z");
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.timestamp, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Message::user("same");
        let b = Message::user("same");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_fallback_is_assistant() {
        let msg = Message::fallback();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, FALLBACK_MESSAGE);
        assert!(msg.parsed_timestamp().is_some());
    }

    #[test]
    fn test_parsed_timestamp_formats() {
        let rfc = Message::assistant("x", "2024-05-01T10:00:00.123+02:00");
        assert!(rfc.parsed_timestamp().is_some());

        let naive = Message::assistant("x", "2024-05-01T10:00:00.123456");
        assert!(naive.parsed_timestamp().is_some());
        assert!(naive.time_of_day().is_some());

        let junk = Message::assistant("x", "yesterday");
        assert!(junk.parsed_timestamp().is_none());
        assert!(junk.time_of_day().is_none());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"assistant\"").unwrap(),
            Role::Assistant
        );
        assert!(serde_json::from_str::<Role>("\"system\"").is_err());
    }
}
