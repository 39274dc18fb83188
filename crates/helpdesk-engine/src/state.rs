//! Controller state aggregate.
//!
//! [`ControllerState`] is everything a renderer needs. It is owned by the
//! [`Controller`](crate::Controller) and only mutated through its methods;
//! renderers get a shared reference.

use serde::Serialize;

use crate::message::{Message, GREETING};
use crate::visibility::Visibility;

/// State of one mounted widget.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControllerState {
    /// Conversation log in append order.
    pub(crate) messages: Vec<Message>,
    /// Most recent session id reported by the service.
    pub(crate) session_id: Option<String>,
    /// Uncommitted input text.
    pub(crate) draft: String,
    /// True exactly while a request is in flight.
    pub(crate) pending: bool,
    /// Panel visibility.
    pub(crate) visibility: Visibility,
}

/// One row of the transcript as the renderer should show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayItem<'a> {
    /// Presentation-only welcome shown while the log is empty.
    Greeting(&'static str),
    /// A stored message.
    Turn(&'a Message),
}

impl ControllerState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    /// Whether the send action is enabled.
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty() && !self.pending
    }

    /// Transcript rows, with the greeting synthesized when the log is empty.
    pub fn display_items(&self) -> Vec<DisplayItem<'_>> {
        if self.messages.is_empty() {
            return vec![DisplayItem::Greeting(GREETING)];
        }
        self.messages.iter().map(DisplayItem::Turn).collect()
    }
}
