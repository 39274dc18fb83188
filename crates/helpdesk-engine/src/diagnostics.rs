//! Failure diagnostics.
//!
//! The user only ever sees the fallback message. The underlying cause is kept
//! here, bounded, for the host to log or display in a debug view.

use serde::Serialize;
use std::collections::VecDeque;

use crate::message::now_iso8601;
use crate::transport::{FailureKind, TransportError};

/// Maximum number of failures to keep.
const MAX_FAILURES: usize = 50;

/// One failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    /// Failure classification.
    pub kind: FailureKind,
    /// Human-readable cause.
    pub detail: String,
    /// When the failure was observed.
    pub timestamp: String,
}

impl FailureRecord {
    pub fn from_error(error: &TransportError) -> Self {
        Self {
            kind: error.kind(),
            detail: error.to_string(),
            timestamp: now_iso8601(),
        }
    }
}

/// Bounded log of recent failures, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    failures: VecDeque<FailureRecord>,
}

impl Diagnostics {
    /// Record a failure, removing the oldest if at capacity.
    pub fn push(&mut self, record: FailureRecord) {
        if self.failures.len() >= MAX_FAILURES {
            self.failures.pop_front();
        }
        self.failures.push_back(record);
    }

    pub fn last(&self) -> Option<&FailureRecord> {
        self.failures.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FailureRecord> {
        self.failures.iter()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}
