//! Scrollback of the conversation.
//!
//! Renders [`DisplayItem`]s oldest first and keeps the newest line in view,
//! the way a web widget scrolls its message list to the bottom.

use helpdesk_engine::{DisplayItem, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// Left indent of message bodies.
const BODY_INDENT: &str = "  ";

/// Transcript of the conversation with an optional typing indicator.
pub struct Transcript<'a> {
    items: Vec<DisplayItem<'a>>,
    theme: &'a Theme,
    typing: bool,
    tick: usize,
}

impl<'a> Transcript<'a> {
    pub fn new(items: Vec<DisplayItem<'a>>, theme: &'a Theme) -> Self {
        Self {
            items,
            theme,
            typing: false,
            tick: 0,
        }
    }

    /// Show the typing indicator, animated by `tick`.
    #[must_use]
    pub fn typing(mut self, typing: bool, tick: usize) -> Self {
        self.typing = typing;
        self.tick = tick;
        self
    }

    /// Build every line of the transcript for the given width.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let body_width = usize::from(width).saturating_sub(BODY_INDENT.len()).max(1);
        let mut lines = Vec::new();

        for item in &self.items {
            let (speaker, color, content, time) = match item {
                DisplayItem::Greeting(text) => ("Assistant", self.theme.assistant, *text, None),
                DisplayItem::Turn(message) => match message.role {
                    Role::User => ("You", self.theme.user, message.content.as_str(), message.time_of_day()),
                    Role::Assistant => (
                        "Assistant",
                        self.theme.assistant,
                        message.content.as_str(),
                        message.time_of_day(),
                    ),
                },
            };

            let mut header = vec![Span::styled(
                speaker,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )];
            if let Some(time) = time {
                header.push(Span::styled(
                    format!(" · {time}"),
                    Style::default().fg(self.theme.muted),
                ));
            }
            lines.push(Line::from(header));

            for paragraph in content.split('\n') {
                if paragraph.is_empty() {
                    lines.push(Line::from(""));
                    continue;
                }
                for wrapped in textwrap::wrap(paragraph, body_width) {
                    lines.push(Line::from(Span::styled(
                        format!("{BODY_INDENT}{wrapped}"),
                        Style::default().fg(self.theme.text),
                    )));
                }
            }
            lines.push(Line::from(""));
        }

        if self.typing {
            let dots = ["●", "● ●", "● ● ●"][self.tick % 3];
            lines.push(Line::from(vec![
                Span::styled(
                    "Assistant",
                    Style::default()
                        .fg(self.theme.assistant)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {dots}"), Style::default().fg(self.theme.muted)),
            ]));
        }

        lines
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lines = self.lines(area.width);
        let scroll = lines.len().saturating_sub(usize::from(area.height));
        Paragraph::new(lines)
            .scroll((scroll.min(usize::from(u16::MAX)) as u16, 0))
            .render(area, buf);
    }
}
