//! Action tuning parameters.
//!
//! Every action occupies its agent for a number of ticks after dispatch. The
//! defaults here apply when a request does not override the duration through
//! its `duration_in_ticks` argument.

use serde::{Deserialize, Serialize};
use tickgrid_types::ActionKind;

/// Default busy window per action, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDurations {
    /// Duration of [`ActionKind::GrabObject`].
    pub grab_object: u64,
    /// Duration of [`ActionKind::DropObject`].
    pub drop_object: u64,
    /// Duration of [`ActionKind::OpenDoor`].
    pub open_door: u64,
    /// Duration of [`ActionKind::CloseDoor`].
    pub close_door: u64,
    /// Duration of [`ActionKind::Idle`].
    pub idle: u64,
}

impl ActionDurations {
    /// Default duration for `kind`.
    pub const fn get(&self, kind: ActionKind) -> u64 {
        match kind {
            ActionKind::GrabObject => self.grab_object,
            ActionKind::DropObject => self.drop_object,
            ActionKind::OpenDoor => self.open_door,
            ActionKind::CloseDoor => self.close_door,
            ActionKind::Idle => self.idle,
        }
    }
}

impl Default for ActionDurations {
    fn default() -> Self {
        Self {
            grab_object: 1,
            drop_object: 1,
            open_door: 1,
            close_door: 1,
            idle: 1,
        }
    }
}
