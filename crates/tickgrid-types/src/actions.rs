//! Action request and result types for agent-to-world communication.
//!
//! An agent names an action by string and supplies keyword arguments; the
//! world resolves the name against the closed [`ActionKind`] catalog and
//! answers with an [`ActionResult`]. Every action kind owns a closed set of
//! result variants so callers branch on the variant, never on the message.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ObjectId;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The closed catalog of actions the world knows how to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Pick up an object within range.
    GrabObject,
    /// Put a carried object down at the agent's location.
    DropObject,
    /// Open a door within range.
    OpenDoor,
    /// Close a door within range.
    CloseDoor,
    /// Do nothing for the action's duration.
    Idle,
}

impl ActionKind {
    /// Every action kind, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::GrabObject,
        Self::DropObject,
        Self::OpenDoor,
        Self::CloseDoor,
        Self::Idle,
    ];

    /// Canonical name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GrabObject => "GrabObject",
            Self::DropObject => "DropObject",
            Self::OpenDoor => "OpenDoor",
            Self::CloseDoor => "CloseDoor",
            Self::Idle => "Idle",
        }
    }

    /// Look up an action by name.
    ///
    /// Matching ignores ASCII case and an optional trailing `Action`, so
    /// `"grabobject"` and `"GrabObjectAction"` both resolve to
    /// [`ActionKind::GrabObject`].
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let base = lowered.strip_suffix("action").unwrap_or(lowered.as_str());
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(base))
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Keyword arguments accompanying an action request.
///
/// Each action reads the fields it understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export, export_to = "bindings/")]
pub struct ActionArgs {
    /// Target object. Grab picks a random object in range when absent.
    pub object_id: Option<ObjectId>,
    /// Grab reach in cells.
    pub grab_range: Option<u64>,
    /// Door reach in cells.
    pub door_range: Option<u64>,
    /// Override for the action's busy window.
    pub duration_in_ticks: Option<u64>,
}

impl ActionArgs {
    /// Arguments targeting a specific object.
    pub fn targeting(object_id: impl Into<ObjectId>) -> Self {
        Self {
            object_id: Some(object_id.into()),
            ..Self::default()
        }
    }

    /// Set the grab range.
    #[must_use]
    pub const fn with_grab_range(mut self, range: u64) -> Self {
        self.grab_range = Some(range);
        self
    }

    /// Set the door range.
    #[must_use]
    pub const fn with_door_range(mut self, range: u64) -> Self {
        self.door_range = Some(range);
        self
    }
}

/// An action an agent asks the world to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// Action name as produced by the agent or input layer.
    pub action_name: String,
    /// Keyword arguments.
    #[serde(default)]
    pub args: ActionArgs,
}

impl ActionRequest {
    /// Build a request for a catalog action.
    pub fn new(kind: ActionKind, args: ActionArgs) -> Self {
        Self {
            action_name: kind.name().to_owned(),
            args,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a grab attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GrabResult {
    /// The object is now carried by the agent.
    Success {
        /// The object that was picked up.
        object_id: ObjectId,
    },
    /// No eligible object within the grab range.
    NotInRange,
    /// The target is an agent.
    Agent,
    /// The agent already holds an object.
    CarriesObject,
    /// Another agent already holds the target.
    ObjectCarried,
    /// The target cannot be picked up.
    ObjectUnmovable,
    /// The target is neither a registered agent nor object.
    UnknownObjectType,
}

impl GrabResult {
    /// Human-readable description.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Grab action success",
            Self::NotInRange => "Object not in range",
            Self::Agent => "This is an agent, cannot be picked up",
            Self::CarriesObject => "Agent already carries an object",
            Self::ObjectCarried => "Object is already carried",
            Self::ObjectUnmovable => "Object is not movable",
            Self::UnknownObjectType => "obj_id is no Agent and no Object, unknown what to do",
        }
    }

    /// Whether the grab took effect.
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Outcome of a drop attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DropResult {
    /// The object was put down.
    Success {
        /// The object that was dropped.
        object_id: ObjectId,
    },
    /// The agent holds nothing.
    NothingCarried,
    /// The agent does not hold the named object.
    ObjectNotCarried,
    /// The named object is not registered.
    UnknownObject,
}

impl DropResult {
    /// Human-readable description.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Drop action success",
            Self::NothingCarried => "Agent is not carrying anything",
            Self::ObjectNotCarried => "Agent is not carrying this object",
            Self::UnknownObject => "Object does not exist",
        }
    }

    /// Whether the drop took effect.
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Outcome of an open or close door attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DoorResult {
    /// The door changed state.
    Success,
    /// No door was named.
    NoDoorSpecified,
    /// The door is farther than the door range.
    NotInRange,
    /// The target exists but is not a door.
    NotADoor,
    /// Opening a door that is open.
    AlreadyOpen,
    /// Closing a door that is closed.
    AlreadyClosed,
    /// Something stands in the doorway.
    Blocked,
    /// The named object is not registered.
    UnknownObject,
}

impl DoorResult {
    /// Human-readable description.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Door action success",
            Self::NoDoorSpecified => "No door specified",
            Self::NotInRange => "Door not in range",
            Self::NotADoor => "Object is not a door",
            Self::AlreadyOpen => "Door is already open",
            Self::AlreadyClosed => "Door is already closed",
            Self::Blocked => "Door is blocked",
            Self::UnknownObject => "Object does not exist",
        }
    }

    /// Whether the door changed state.
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Outcome of an idle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum IdleResult {
    /// Idling always succeeds.
    Success,
}

impl IdleResult {
    /// Human-readable description.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Success => "Idle action success",
        }
    }
}

/// The result of resolving one action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionResult {
    /// Result of [`ActionKind::GrabObject`].
    Grab(GrabResult),
    /// Result of [`ActionKind::DropObject`].
    Drop(DropResult),
    /// Result of [`ActionKind::OpenDoor`] or [`ActionKind::CloseDoor`].
    Door(DoorResult),
    /// Result of [`ActionKind::Idle`].
    Idle(IdleResult),
    /// The action is not in the agent's action set.
    NotAllowed {
        /// The refused action.
        action: ActionKind,
    },
}

impl ActionResult {
    /// Human-readable description.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Grab(r) => r.message(),
            Self::Drop(r) => r.message(),
            Self::Door(r) => r.message(),
            Self::Idle(r) => r.message(),
            Self::NotAllowed { .. } => "Action is not in the agent's action set",
        }
    }

    /// Whether the action took effect.
    pub const fn succeeded(&self) -> bool {
        match self {
            Self::Grab(r) => r.succeeded(),
            Self::Drop(r) => r.succeeded(),
            Self::Door(r) => r.succeeded(),
            Self::Idle(_) => true,
            Self::NotAllowed { .. } => false,
        }
    }
}

impl From<GrabResult> for ActionResult {
    fn from(result: GrabResult) -> Self {
        Self::Grab(result)
    }
}

impl From<DropResult> for ActionResult {
    fn from(result: DropResult) -> Self {
        Self::Drop(result)
    }
}

impl From<DoorResult> for ActionResult {
    fn from(result: DoorResult) -> Self {
        Self::Door(result)
    }
}

impl From<IdleResult> for ActionResult {
    fn from(result: IdleResult) -> Self {
        Self::Idle(result)
    }
}
