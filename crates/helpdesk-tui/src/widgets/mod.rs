//! Widgets for the collapsed trigger and the expanded panel.

mod input_bar;
mod panel;
mod transcript;
mod trigger;

pub use input_bar::{InputBar, PLACEHOLDER};
pub use panel::{ChatPanel, PANEL_TITLE};
pub use transcript::Transcript;
pub use trigger::{Trigger, TRIGGER_LABEL};
