//! Visibility gate: whether the conversation panel is shown.

use serde::{Deserialize, Serialize};

/// Collapsed to the trigger affordance, or expanded to the full panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the call-to-action trigger is shown.
    #[default]
    Collapsed,
    /// The conversation panel is shown.
    Expanded,
}

impl Visibility {
    /// Show the panel. No-op when already expanded.
    pub fn open(&mut self) {
        *self = Self::Expanded;
    }

    /// Hide the panel. No-op when already collapsed.
    pub fn close(&mut self) {
        *self = Self::Collapsed;
    }

    /// Flip between the two states.
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        };
    }

    pub fn is_open(self) -> bool {
        self == Self::Expanded
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collapsed => write!(f, "collapsed"),
            Self::Expanded => write!(f, "expanded"),
        }
    }
}
