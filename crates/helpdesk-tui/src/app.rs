//! Application state and update logic for the helpdesk TUI.

use helpdesk_engine::{
    ChatResponse, Controller, InputKey, PendingTurn, TransportError, TurnOutcome,
};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::event::Action;
use crate::input::TextInputState;
use crate::theme::Theme;
use crate::widgets::{ChatPanel, Trigger};

/// Application state.
#[derive(Debug)]
pub struct App {
    /// The widget controller. Owns all conversation state.
    pub controller: Controller,

    /// Draft editor; its content mirrors the controller's draft.
    pub input: TextInputState,

    /// Theme colors.
    pub theme: Theme,

    /// Tick counter for the typing animation.
    pub tick: usize,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// The dispatched turn and the task delivering it. At most one, since
    /// the controller refuses a second submit while pending.
    in_flight: Option<(PendingTurn, JoinHandle<Result<ChatResponse, TransportError>>)>,
}

impl App {
    /// Create a new app around a mounted controller.
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            input: TextInputState::new(),
            theme: Theme::default(),
            tick: 0,
            should_quit: false,
            in_flight: None,
        }
    }

    /// Handle an action.
    ///
    /// Returns the turn to dispatch when the action submitted the draft.
    pub fn handle_action(&mut self, action: Action) -> Option<PendingTurn> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Open => self.controller.open(),
            Action::Close => self.controller.close(),
            Action::Toggle => self.controller.toggle(),
            Action::Clear => self.controller.clear(),
            Action::Enter { shift_held } => {
                if let Some(turn) = self
                    .controller
                    .begin_submit_on_enter(InputKey::Enter, shift_held)
                {
                    self.input.clear();
                    return Some(turn);
                }
                if shift_held {
                    self.edit(|input| input.insert('\n'));
                }
            }
            Action::Newline => self.edit(|input| input.insert('\n')),
            Action::Insert(c) => self.edit(|input| input.insert(c)),
            Action::Backspace => self.edit(TextInputState::backspace),
            Action::Delete => self.edit(TextInputState::delete),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::None => {}
        }
        None
    }

    /// Apply the result of a dispatched turn.
    pub fn settle(
        &mut self,
        turn: PendingTurn,
        result: Result<ChatResponse, TransportError>,
    ) -> TurnOutcome {
        self.controller.complete(turn, result)
    }

    /// Send the turn's request on a spawned task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, turn: PendingTurn) {
        let transport = self.controller.transport();
        let request = turn.request().clone();
        let handle = tokio::spawn(async move { transport.send(&request).await });
        self.in_flight = Some((turn, handle));
    }

    /// Whether a dispatched request has not been settled yet.
    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Settle the in-flight turn if its task has finished.
    ///
    /// A task that panicked or was cancelled settles as a transport failure.
    pub async fn poll_in_flight(&mut self) -> Option<TurnOutcome> {
        if !self
            .in_flight
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_finished())
        {
            return None;
        }
        let (turn, handle) = self.in_flight.take()?;
        let result = handle
            .await
            .unwrap_or_else(|e| Err(TransportError::Other(e.to_string())));
        let outcome = self.settle(turn, result);
        debug!(?outcome, "turn settled");
        Some(outcome)
    }

    /// Abort the in-flight request, if any. Used on quit.
    pub fn abort_in_flight(&mut self) {
        if let Some((_, handle)) = self.in_flight.take() {
            handle.abort();
        }
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Draw the trigger or the panel, depending on visibility.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let state = self.controller.state();
        if state.is_open() {
            ChatPanel::new(state, &self.input, &self.theme)
                .tick(self.tick)
                .render(ChatPanel::area(area), buf);
        } else {
            Trigger::new(&self.theme).render(Trigger::area(area), buf);
        }
    }

    /// Edit the draft. The input is disabled while a request is in flight.
    fn edit(&mut self, f: impl FnOnce(&mut TextInputState)) {
        if self.controller.state().is_pending() {
            return;
        }
        f(&mut self.input);
        self.controller.update_draft(self.input.content());
    }
}
