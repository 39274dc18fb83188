//! Expanded conversation panel.
//!
//! ```text
//! ╭ Customer Support ───── ^L clear · Esc close ╮
//! │Assistant                                    │
//! │  👋 Hi! I'm your AI customer support ...    │
//! │                                             │
//! │┌───────────────────────────────────────────┐│
//! ││> █Type your message...                    ││
//! │└───────────────────────────────────────────┘│
//! ╰─────────────────────────────────────────────╯
//! ```

use helpdesk_engine::ControllerState;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Widget},
};

use super::input_bar::InputBar;
use super::transcript::Transcript;
use crate::input::TextInputState;
use crate::theme::Theme;

/// Panel title.
pub const PANEL_TITLE: &str = "Customer Support";

const PANEL_WIDTH: u16 = 60;
const PANEL_HEIGHT: u16 = 22;

/// Fixed height for the input bar (in lines, including borders).
const INPUT_HEIGHT: u16 = 3;

/// The conversation panel.
pub struct ChatPanel<'a> {
    state: &'a ControllerState,
    input: &'a TextInputState,
    theme: &'a Theme,
    tick: usize,
}

impl<'a> ChatPanel<'a> {
    pub fn new(state: &'a ControllerState, input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            state,
            input,
            theme,
            tick: 0,
        }
    }

    /// Animation tick for the typing indicator.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Where the panel sits inside `screen`: anchored bottom-right.
    pub fn area(screen: Rect) -> Rect {
        let width = PANEL_WIDTH.min(screen.width);
        let height = PANEL_HEIGHT.min(screen.height);
        Rect::new(
            screen.x + screen.width - width,
            screen.y + screen.height - height,
            width,
            height,
        )
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Line::from(format!(" {PANEL_TITLE} ")).style(
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            ))
            .title(
                Line::from(" ^L clear · Esc close ")
                    .style(Style::default().fg(self.theme.muted))
                    .alignment(Alignment::Right),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height <= INPUT_HEIGHT {
            // Not enough space - just show input
            self.input_bar().render(inner, buf);
            return;
        }

        let [transcript_area, input_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)]).areas(inner);

        Transcript::new(self.state.display_items(), self.theme)
            .typing(self.state.is_pending(), self.tick)
            .render(transcript_area, buf);
        self.input_bar().render(input_area, buf);
    }
}

impl<'a> ChatPanel<'a> {
    fn input_bar(&self) -> InputBar<'a> {
        InputBar::new(self.input, self.theme)
            .loading(self.state.is_pending())
            .can_send(self.state.can_send())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_is_bottom_right() {
        let screen = Rect::new(0, 0, 100, 40);
        assert_eq!(ChatPanel::area(screen), Rect::new(40, 18, 60, 22));
    }

    #[test]
    fn test_area_fills_small_screens() {
        let screen = Rect::new(0, 0, 40, 12);
        assert_eq!(ChatPanel::area(screen), screen);
    }
}
