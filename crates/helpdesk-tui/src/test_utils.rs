//! Test utilities for rendering the widget headlessly.

use crate::app::App;
use crate::event::Action;
use helpdesk_engine::{ChatTransport, Controller, WidgetConfig};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 100;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 30;

/// Create a test app. Nothing is sent unless a test dispatches a turn.
pub fn create_test_app() -> App {
    let controller =
        helpdesk_engine::connect(&WidgetConfig::default()).expect("Failed to build controller");
    App::new(controller)
}

/// Create a test app whose turns go to `transport`.
pub fn create_test_app_with_transport(transport: Arc<dyn ChatTransport>) -> App {
    App::new(Controller::new(transport))
}

/// Feed `text` to the app one key at a time.
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_action(Action::Insert(c));
    }
}

/// Render the app on a test terminal and return the screen contents.
pub fn render_app_to_string(app: &App) -> String {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
        .draw(|frame| app.render(frame.area(), frame.buffer_mut()))
        .expect("Failed to draw");
    buffer_to_string(terminal.backend().buffer())
}

/// Convert a buffer to a string, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}
