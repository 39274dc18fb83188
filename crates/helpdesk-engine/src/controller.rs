//! Conversation controller.
//!
//! Owns the [`ControllerState`] and runs the send cycle for each user turn:
//!
//! 1. [`Controller::begin_submit`] appends the user message, clears the draft,
//!    raises `pending` and hands back a [`PendingTurn`] holding the request.
//! 2. The host sends the request, inline or on a spawned task.
//! 3. [`Controller::complete`] appends the reply (or the fallback message),
//!    adopts the session id and lowers `pending`, all in one call.
//!
//! [`Controller::submit`] runs the three steps back to back for hosts that
//! can simply await.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::StaleResponsePolicy;
use crate::diagnostics::{Diagnostics, FailureRecord};
use crate::message::Message;
use crate::state::ControllerState;
use crate::transport::{ChatRequest, ChatResponse, ChatTransport, FailureKind, TransportError};

/// Key presses the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    /// The commit key.
    Enter,
    /// Anything else.
    Other,
}

/// A turn whose request has been prepared but not yet settled.
///
/// Not `Clone`: [`Controller::complete`] consumes it, so each turn settles once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending turn must be completed or the widget stays busy"]
pub struct PendingTurn {
    request: ChatRequest,
    generation: u64,
}

impl PendingTurn {
    /// The request to deliver.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Deliver the request over `transport`.
    pub async fn dispatch(
        &self,
        transport: &dyn ChatTransport,
    ) -> Result<ChatResponse, TransportError> {
        transport.send(&self.request).await
    }
}

/// How a settled turn changed the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant reply was appended.
    Replied,
    /// The request failed and the fallback message was appended.
    FellBack(FailureKind),
    /// The log was cleared while the request was in flight and the reply
    /// was dropped.
    Discarded,
    /// No request was in flight; the log was left alone.
    NotPending,
}

/// Interaction controller for one mounted widget.
pub struct Controller {
    state: ControllerState,
    transport: Arc<dyn ChatTransport>,
    stale_responses: StaleResponsePolicy,
    /// Bumped by every clear; stamps each pending turn.
    generation: u64,
    diagnostics: Diagnostics,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("stale_responses", &self.stale_responses)
            .field("generation", &self.generation)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Mount a controller with empty state.
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            state: ControllerState::default(),
            transport,
            stale_responses: StaleResponsePolicy::default(),
            generation: 0,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Set the policy for replies that settle after a clear.
    #[must_use]
    pub fn with_stale_responses(mut self, policy: StaleResponsePolicy) -> Self {
        self.stale_responses = policy;
        self
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Shared handle to the transport, for hosts that send on another task.
    pub fn transport(&self) -> Arc<dyn ChatTransport> {
        Arc::clone(&self.transport)
    }

    /// Expand the panel.
    pub fn open(&mut self) {
        self.state.visibility.open();
    }

    /// Collapse the panel. Messages, session and in-flight work are kept.
    pub fn close(&mut self) {
        self.state.visibility.close();
    }

    /// Flip between the trigger and the panel.
    pub fn toggle(&mut self) {
        self.state.visibility.toggle();
    }

    /// Replace the draft. Any string is accepted.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.state.draft = text.into();
    }

    /// Start a turn.
    ///
    /// Returns `None` without touching state when the trimmed draft is empty
    /// or a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<PendingTurn> {
        if !self.state.can_send() {
            return None;
        }

        let draft = std::mem::take(&mut self.state.draft);
        let request = ChatRequest {
            message: draft.trim().to_string(),
            session_id: self.state.session_id.clone(),
        };
        self.state.messages.push(Message::user(draft));
        self.state.pending = true;

        debug!(
            generation = self.generation,
            session_id = request.session_id.as_deref().unwrap_or("<none>"),
            "turn started"
        );

        Some(PendingTurn {
            request,
            generation: self.generation,
        })
    }

    /// Settle a turn with the result of its request.
    ///
    /// Failures never escape: they become the fallback message and a
    /// diagnostics record. `pending` is always false afterwards.
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        result: Result<ChatResponse, TransportError>,
    ) -> TurnOutcome {
        if !self.state.pending {
            debug!(generation = turn.generation, "ignoring turn with nothing in flight");
            return TurnOutcome::NotPending;
        }

        let stale = turn.generation != self.generation;

        let outcome = if stale && self.stale_responses == StaleResponsePolicy::Discard {
            if let Err(e) = &result {
                self.record_failure(e);
            }
            debug!(generation = turn.generation, "dropping reply to cleared conversation");
            TurnOutcome::Discarded
        } else {
            match result {
                Ok(reply) => {
                    self.state
                        .messages
                        .push(Message::assistant(reply.response, reply.timestamp));
                    self.state.session_id = Some(reply.session_id);
                    TurnOutcome::Replied
                }
                Err(e) => {
                    self.record_failure(&e);
                    self.state.messages.push(Message::fallback());
                    TurnOutcome::FellBack(e.kind())
                }
            }
        };

        self.state.pending = false;
        outcome
    }

    /// Run a whole turn, awaiting the transport inline.
    ///
    /// Returns `None` when the guard rejected the submit.
    pub async fn submit(&mut self) -> Option<TurnOutcome> {
        let turn = self.begin_submit()?;
        let transport = self.transport();
        let result = turn.dispatch(transport.as_ref()).await;
        Some(self.complete(turn, result))
    }

    /// Start a turn if `key` is the commit key and Shift is not held.
    pub fn begin_submit_on_enter(&mut self, key: InputKey, shift_held: bool) -> Option<PendingTurn> {
        if key == InputKey::Enter && !shift_held {
            self.begin_submit()
        } else {
            None
        }
    }

    /// [`submit`](Self::submit) bound to the commit key.
    pub async fn submit_on_enter(&mut self, key: InputKey, shift_held: bool) -> Option<TurnOutcome> {
        if key == InputKey::Enter && !shift_held {
            self.submit().await
        } else {
            None
        }
    }

    /// Forget the conversation. Visibility and the pending flag are kept;
    /// an in-flight request is not cancelled.
    pub fn clear(&mut self) {
        self.state.messages.clear();
        self.state.session_id = None;
        self.generation += 1;
        info!(
            generation = self.generation,
            pending = self.state.pending,
            "conversation cleared"
        );
    }

    /// Continue a conversation the service already knows, e.g. one started
    /// by an earlier process. The next request carries `session_id`.
    pub fn resume_session(&mut self, session_id: impl Into<String>) {
        self.state.session_id = Some(session_id.into());
    }

    fn record_failure(&mut self, error: &TransportError) {
        warn!(kind = %error.kind(), error = %error, "chat turn failed");
        self.diagnostics.push(FailureRecord::from_error(error));
    }
}
