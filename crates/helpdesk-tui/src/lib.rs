//! helpdesk-tui: Terminal host for the helpdesk support widget
//!
//! This crate draws the widget in a terminal:
//! - A collapsed "Need help?" trigger in the bottom-right corner
//! - The expanded panel with transcript, typing indicator and input bar
//! - Keyboard handling, with replies awaited on a background task

mod app;
mod event;
mod input;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widgets;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use helpdesk_engine;
pub use input::TextInputState;
pub use theme::Theme;
pub use widgets::{ChatPanel, InputBar, Transcript, Trigger, PANEL_TITLE, PLACEHOLDER, TRIGGER_LABEL};

use crossterm::{
    cursor::Show as ShowCursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use helpdesk_engine::WidgetConfig;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tracing::info;

/// Tick rate of the event loop; drives the typing animation.
const TICK_RATE_MS: u64 = 100;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the widget in the terminal until the user quits.
pub async fn run_tui(config: &WidgetConfig) -> Result<(), Box<dyn std::error::Error>> {
    let controller = helpdesk_engine::connect(config)?;
    info!(base_url = %config.base_url, "widget mounted");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.render(area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => {
                    let action = key_to_action(key, app.controller.state().is_open());
                    if let Some(turn) = app.handle_action(action) {
                        app.dispatch(turn);
                    }
                }
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        app.poll_in_flight().await;

        if app.should_quit {
            app.abort_in_flight();
            break;
        }
    }

    Ok(())
}
