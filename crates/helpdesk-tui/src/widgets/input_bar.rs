//! Draft input bar at the bottom of the panel.
//!
//! Shows the draft with a block cursor, the placeholder when empty, and a
//! waiting indicator while a request is in flight (input is disabled then).

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::input::TextInputState;
use crate::theme::Theme;

/// Placeholder shown in an empty input.
pub const PLACEHOLDER: &str = "Type your message...";

/// Input bar for the draft.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    loading: bool,
    can_send: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            loading: false,
            can_send: false,
        }
    }

    /// Set whether a request is in flight.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Set whether the send action is enabled.
    #[must_use]
    pub fn can_send(mut self, can_send: bool) -> Self {
        self.can_send = can_send;
        self
    }

    /// Build the draft lines and return which one holds the cursor.
    fn build_input_lines(&self) -> (Vec<Line<'static>>, usize) {
        let content = self.input.content();
        let cursor_pos = self.input.cursor;
        let text_style = Style::default().fg(self.theme.text);

        let text_lines: Vec<&str> = content.split('\n').collect();

        let mut char_count = 0;
        let mut cursor_line = 0;
        let mut cursor_col = 0;
        for (line_idx, line) in text_lines.iter().enumerate() {
            let line_len = line.chars().count();
            if cursor_pos <= char_count + line_len {
                cursor_line = line_idx;
                cursor_col = cursor_pos - char_count;
                break;
            }
            // +1 for the newline character
            char_count += line_len + 1;
        }

        let mut lines = Vec::with_capacity(text_lines.len());
        for (line_idx, line_text) in text_lines.iter().enumerate() {
            let prefix = if line_idx == 0 { "> " } else { "  " };
            let mut spans = vec![Span::styled(prefix, Style::default().fg(self.theme.primary))];

            if line_idx == cursor_line {
                let chars: Vec<char> = line_text.chars().collect();
                let before: String = chars[..cursor_col].iter().collect();
                let after: String = chars[cursor_col..].iter().collect();
                spans.push(Span::styled(before, text_style));
                spans.push(Span::styled("█", text_style));
                spans.push(Span::styled(after, text_style));
            } else {
                spans.push(Span::styled((*line_text).to_string(), text_style));
            }
            lines.push(Line::from(spans));
        }

        (lines, cursor_line)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.loading {
            Style::default().fg(self.theme.border)
        } else {
            Style::default().fg(self.theme.border_focused)
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if self.can_send {
            block = block.title(Line::from(" Enter ➤ ").alignment(Alignment::Right));
        }

        let inner_height = area.height.saturating_sub(2) as usize;

        let paragraph = if self.loading {
            Paragraph::new("● Waiting for reply...")
                .block(block)
                .style(Style::default().fg(self.theme.muted))
        } else if self.input.is_empty() {
            let line = Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.primary)),
                Span::styled("█", Style::default().fg(self.theme.text)),
                Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)),
            ]);
            Paragraph::new(line).block(block)
        } else {
            let (lines, cursor_line) = self.build_input_lines();

            // Keep the cursor line visible
            let scroll_offset = if lines.len() <= inner_height {
                0
            } else {
                cursor_line.saturating_sub(inner_height.saturating_sub(1))
            };

            Paragraph::new(lines)
                .block(block)
                .scroll((scroll_offset as u16, 0))
        };

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn typed(text: &str) -> TextInputState {
        let mut input = TextInputState::new();
        text.chars().for_each(|c| input.insert(c));
        input
    }

    fn render(bar: InputBar<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_placeholder_when_empty() {
        let input = TextInputState::new();
        let theme = Theme::default();
        let out = render(InputBar::new(&input, &theme), 40, 3);
        assert!(out.contains(PLACEHOLDER));
        assert!(!out.contains("Enter"));
    }

    #[test]
    fn test_shows_draft_and_send_hint() {
        let input = typed("Hello");
        let theme = Theme::default();
        let out = render(InputBar::new(&input, &theme).can_send(true), 40, 3);
        assert!(out.contains("> Hello█"));
        assert!(out.contains("Enter"));
    }

    #[test]
    fn test_cursor_in_middle_of_second_line() {
        let mut input = typed("one\ntwo");
        input.move_left();
        let theme = Theme::default();
        let out = render(InputBar::new(&input, &theme), 40, 4);
        assert!(out.contains("> one"));
        assert!(out.contains("  tw█o"));
    }

    #[test]
    fn test_loading_hides_draft() {
        let input = typed("queued text");
        let theme = Theme::default();
        let out = render(InputBar::new(&input, &theme).loading(true), 40, 3);
        assert!(out.contains("Waiting for reply"));
        assert!(!out.contains("queued text"));
    }
}
