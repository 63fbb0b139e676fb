//! Dropping carried objects.
//!
//! The inverse of grabbing: the carry relation is removed on both sides and
//! the object is left on the agent's cell. Without an `object_id` the most
//! recently grabbed object is dropped.

use tickgrid_types::{ActionArgs, ActionKind, DropResult, ObjectId};
use tickgrid_world::GridWorld;

use super::Action;

/// Put down a carried object.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropObject;

impl Action for DropObject {
    type Outcome = DropResult;

    const KIND: ActionKind = ActionKind::DropObject;

    fn is_possible(
        &self,
        world: &GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<(), DropResult> {
        resolve(world, agent_id, args.object_id.as_ref()).map(|_| ())
    }

    fn mutate(
        &self,
        world: &mut GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<DropResult, DropResult> {
        let object_id = resolve(world, agent_id, args.object_id.as_ref())?;
        let (agent, object) = world
            .agent_and_object_mut(agent_id, &object_id)
            .ok_or(DropResult::UnknownObject)?;
        agent.carrying.retain(|held| held != &object_id);
        object.carried.retain(|holder| holder != agent_id);
        object.location = agent.location;

        tracing::debug!(agent_id = %agent_id, object_id = %object_id, "object dropped");
        Ok(DropResult::Success { object_id })
    }
}

fn resolve(
    world: &GridWorld,
    agent_id: &ObjectId,
    object_id: Option<&ObjectId>,
) -> Result<ObjectId, DropResult> {
    let agent = world.agent(agent_id).ok_or(DropResult::UnknownObject)?;
    let last = agent.carrying.last().ok_or(DropResult::NothingCarried)?;
    let object_id = object_id.unwrap_or(last);
    if world.object(object_id).is_none() {
        return Err(DropResult::UnknownObject);
    }
    if !agent.carrying.contains(object_id) {
        return Err(DropResult::ObjectNotCarried);
    }
    Ok(object_id.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tickgrid_types::Location;
    use tickgrid_world::EnvObject;

    use super::*;
    use crate::actions::GrabObject;
    use crate::test_support::{agent_at, empty_world};

    fn id(s: &str) -> ObjectId {
        ObjectId::from(s)
    }

    fn world_carrying_box() -> GridWorld {
        let mut world = empty_world();
        world.register_agent(agent_at("a", Location::new(2, 2))).unwrap();
        world
            .register_env_object(EnvObject::new("box", "box", Location::new(2, 2)))
            .unwrap();
        world
            .register_env_object(EnvObject::new("ball", "ball", Location::new(7, 7)))
            .unwrap();
        GrabObject
            .mutate(&mut world, &id("a"), &ActionArgs::targeting("box"))
            .unwrap();
        world
    }

    #[test]
    fn drop_clears_both_sides_and_places_object() {
        let mut world = world_carrying_box();
        world.agent_mut(&id("a")).unwrap().location = Location::new(3, 2);

        assert_eq!(
            DropObject.mutate(&mut world, &id("a"), &ActionArgs::default()),
            Ok(DropResult::Success { object_id: id("box") })
        );
        assert!(world.agent(&id("a")).unwrap().carrying.is_empty());
        let object = world.object(&id("box")).unwrap();
        assert!(object.carried.is_empty());
        assert_eq!(object.location, Location::new(3, 2));
    }

    #[test]
    fn nothing_to_drop() {
        let mut world = world_carrying_box();
        DropObject
            .mutate(&mut world, &id("a"), &ActionArgs::default())
            .unwrap();
        assert_eq!(
            DropObject.is_possible(&world, &id("a"), &ActionArgs::default()),
            Err(DropResult::NothingCarried)
        );
    }

    #[test]
    fn named_object_must_be_carried() {
        let mut world = world_carrying_box();
        assert_eq!(
            DropObject.mutate(&mut world, &id("a"), &ActionArgs::targeting("ball")),
            Err(DropResult::ObjectNotCarried)
        );
        assert_eq!(
            DropObject.mutate(&mut world, &id("a"), &ActionArgs::targeting("ghost")),
            Err(DropResult::UnknownObject)
        );
        assert_eq!(world.agent(&id("a")).unwrap().carrying, vec![id("box")]);
    }

    #[test]
    fn dropped_object_can_be_grabbed_again() {
        let mut world = world_carrying_box();
        DropObject
            .mutate(&mut world, &id("a"), &ActionArgs::default())
            .unwrap();
        assert!(GrabObject
            .mutate(&mut world, &id("a"), &ActionArgs::targeting("box"))
            .is_ok());
    }
}
