//! The action contract and the catalog that dispatches it.
//!
//! # Submodules
//!
//! - [`grab`] -- pick up an object in range.
//! - [`drop`] -- put a carried object down.
//! - [`door`] -- open and close doors.
//! - [`idle`] -- do nothing for a while.

pub mod door;
pub mod drop;
pub mod grab;
pub mod idle;

use tickgrid_types::{ActionArgs, ActionKind, ActionResult, ObjectId};
use tickgrid_world::GridWorld;

use crate::config::ActionDurations;

pub use door::{CloseDoor, OpenDoor};
pub use drop::DropObject;
pub use grab::GrabObject;
pub use idle::Idle;

/// An action an agent can ask the world to perform.
pub trait Action {
    /// The closed set of results this action produces.
    type Outcome: Into<ActionResult>;

    /// Catalog entry of this action.
    const KIND: ActionKind;

    /// Check whether the action is legal right now. Never mutates the world.
    ///
    /// # Errors
    ///
    /// Returns the failure outcome when the action is not possible.
    fn is_possible(
        &self,
        world: &GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<(), Self::Outcome>;

    /// Re-validate and, if still legal, apply the action's effects.
    ///
    /// # Errors
    ///
    /// Returns the failure outcome, with the world untouched, when the
    /// action is no longer possible.
    fn mutate(
        &self,
        world: &mut GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<Self::Outcome, Self::Outcome>;

    /// Ticks the agent stays busy after dispatching this action.
    fn duration_in_ticks(&self, args: &ActionArgs, durations: &ActionDurations) -> u64 {
        args.duration_in_ticks
            .unwrap_or_else(|| durations.get(Self::KIND))
    }
}

/// Dispatch table from [`ActionKind`] to the concrete action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCatalog {
    durations: ActionDurations,
}

impl ActionCatalog {
    /// Create a catalog with the given default durations.
    pub const fn new(durations: ActionDurations) -> Self {
        Self { durations }
    }

    /// The default durations in use.
    pub const fn durations(&self) -> &ActionDurations {
        &self.durations
    }

    /// Run the legality check of `kind`.
    ///
    /// # Errors
    ///
    /// Returns the action's failure result when it is not possible.
    pub fn check(
        &self,
        kind: ActionKind,
        world: &GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<(), ActionResult> {
        match kind {
            ActionKind::GrabObject => check_with(&GrabObject, world, agent_id, args),
            ActionKind::DropObject => check_with(&DropObject, world, agent_id, args),
            ActionKind::OpenDoor => check_with(&OpenDoor, world, agent_id, args),
            ActionKind::CloseDoor => check_with(&CloseDoor, world, agent_id, args),
            ActionKind::Idle => check_with(&Idle, world, agent_id, args),
        }
    }

    /// Resolve `kind` against the world, applying its effects on success.
    pub fn apply(
        &self,
        kind: ActionKind,
        world: &mut GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> ActionResult {
        match kind {
            ActionKind::GrabObject => apply_with(&GrabObject, world, agent_id, args),
            ActionKind::DropObject => apply_with(&DropObject, world, agent_id, args),
            ActionKind::OpenDoor => apply_with(&OpenDoor, world, agent_id, args),
            ActionKind::CloseDoor => apply_with(&CloseDoor, world, agent_id, args),
            ActionKind::Idle => apply_with(&Idle, world, agent_id, args),
        }
    }

    /// Busy window for a dispatched `kind`.
    pub fn duration_in_ticks(&self, kind: ActionKind, args: &ActionArgs) -> u64 {
        match kind {
            ActionKind::GrabObject => GrabObject.duration_in_ticks(args, &self.durations),
            ActionKind::DropObject => DropObject.duration_in_ticks(args, &self.durations),
            ActionKind::OpenDoor => OpenDoor.duration_in_ticks(args, &self.durations),
            ActionKind::CloseDoor => CloseDoor.duration_in_ticks(args, &self.durations),
            ActionKind::Idle => Idle.duration_in_ticks(args, &self.durations),
        }
    }

    /// Actions in the agent's action set that pass their check with default
    /// arguments.
    pub fn possible_actions(&self, world: &GridWorld, agent_id: &ObjectId) -> Vec<ActionKind> {
        let Some(agent) = world.agent(agent_id) else {
            return Vec::new();
        };
        let args = ActionArgs::default();
        agent
            .action_set
            .iter()
            .copied()
            .filter(|&kind| self.check(kind, world, agent_id, &args).is_ok())
            .collect()
    }
}

fn check_with<A: Action>(
    action: &A,
    world: &GridWorld,
    agent_id: &ObjectId,
    args: &ActionArgs,
) -> Result<(), ActionResult> {
    action.is_possible(world, agent_id, args).map_err(Into::into)
}

fn apply_with<A: Action>(
    action: &A,
    world: &mut GridWorld,
    agent_id: &ObjectId,
    args: &ActionArgs,
) -> ActionResult {
    match action.mutate(world, agent_id, args) {
        Ok(outcome) | Err(outcome) => outcome.into(),
    }
}
