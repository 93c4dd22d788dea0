//! Host update notifications.

use serde::{Deserialize, Serialize};

/// Why the host invoked the update handler.
///
/// Only confirmed bars are processed; intra-bar ticks never touch detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateReason {
    /// A price change inside the forming bar.
    NewTick,
    /// The forming bar closed and a new one opened.
    NewBar,
    /// Historical bars were loaded or appended.
    HistoryUpdate,
}

impl UpdateReason {
    /// Returns true if this notification carries a confirmed bar.
    pub fn is_confirmed(self) -> bool {
        !matches!(self, UpdateReason::NewTick)
    }
}
