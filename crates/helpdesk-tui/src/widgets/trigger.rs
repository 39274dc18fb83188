//! Collapsed call-to-action shown while the panel is closed.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::theme::Theme;

/// Trigger label.
pub const TRIGGER_LABEL: &str = "💬 Need help?";

const TRIGGER_WIDTH: u16 = 18;
const TRIGGER_HEIGHT: u16 = 3;

/// The trigger affordance.
pub struct Trigger<'a> {
    theme: &'a Theme,
}

impl<'a> Trigger<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Where the trigger sits inside `screen`: the bottom-right corner.
    pub fn area(screen: Rect) -> Rect {
        let width = TRIGGER_WIDTH.min(screen.width);
        let height = TRIGGER_HEIGHT.min(screen.height);
        Rect::new(
            screen.x + screen.width - width,
            screen.y + screen.height - height,
            width,
            height,
        )
    }
}

impl Widget for Trigger<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.primary))
            .style(Style::default().bg(self.theme.surface));

        Paragraph::new(TRIGGER_LABEL)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            )
            .block(block)
            .render(area, buf);
    }
}
