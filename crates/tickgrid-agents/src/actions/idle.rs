//! The do-nothing action. Its only effect is the busy window.

use tickgrid_types::{ActionArgs, ActionKind, IdleResult, ObjectId};
use tickgrid_world::GridWorld;

use super::Action;

/// Stay put for the action's duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Action for Idle {
    type Outcome = IdleResult;

    const KIND: ActionKind = ActionKind::Idle;

    fn is_possible(
        &self,
        _world: &GridWorld,
        _agent_id: &ObjectId,
        _args: &ActionArgs,
    ) -> Result<(), IdleResult> {
        Ok(())
    }

    fn mutate(
        &self,
        _world: &mut GridWorld,
        _agent_id: &ObjectId,
        _args: &ActionArgs,
    ) -> Result<IdleResult, IdleResult> {
        Ok(IdleResult::Success)
    }
}
