//! Opening and closing doors.
//!
//! A door's traversability follows its open state. Closing fails while an
//! agent stands in the doorway.

use tickgrid_types::{ActionArgs, ActionKind, DoorResult, ObjectId};
use tickgrid_world::GridWorld;

use super::Action;

/// Door reach when the request gives none.
pub const DEFAULT_DOOR_RANGE: u64 = 1;

/// Open a door within `door_range`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenDoor;

/// Close a door within `door_range`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseDoor;

impl Action for OpenDoor {
    type Outcome = DoorResult;

    const KIND: ActionKind = ActionKind::OpenDoor;

    fn is_possible(
        &self,
        world: &GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<(), DoorResult> {
        resolve(world, agent_id, args, true).map(|_| ())
    }

    fn mutate(
        &self,
        world: &mut GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<DoorResult, DoorResult> {
        set_door(world, agent_id, args, true)
    }
}

impl Action for CloseDoor {
    type Outcome = DoorResult;

    const KIND: ActionKind = ActionKind::CloseDoor;

    fn is_possible(
        &self,
        world: &GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<(), DoorResult> {
        resolve(world, agent_id, args, false).map(|_| ())
    }

    fn mutate(
        &self,
        world: &mut GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<DoorResult, DoorResult> {
        set_door(world, agent_id, args, false)
    }
}

fn set_door(
    world: &mut GridWorld,
    agent_id: &ObjectId,
    args: &ActionArgs,
    open: bool,
) -> Result<DoorResult, DoorResult> {
    let door_id = resolve(world, agent_id, args, open)?;
    let door = world
        .object_mut(&door_id)
        .ok_or(DoorResult::UnknownObject)?;
    if !door.set_door_open(open) {
        return Err(DoorResult::NotADoor);
    }
    tracing::debug!(agent_id = %agent_id, door_id = %door_id, open, "door toggled");
    Ok(DoorResult::Success)
}

fn resolve(
    world: &GridWorld,
    agent_id: &ObjectId,
    args: &ActionArgs,
    open: bool,
) -> Result<ObjectId, DoorResult> {
    let door_id = args.object_id.as_ref().ok_or(DoorResult::NoDoorSpecified)?;
    let agent = world.agent(agent_id).ok_or(DoorResult::UnknownObject)?;
    let Some(door) = world.object(door_id) else {
        return Err(if world.agent(door_id).is_some() {
            DoorResult::NotADoor
        } else {
            DoorResult::UnknownObject
        });
    };
    let is_open = door.door_state().ok_or(DoorResult::NotADoor)?;

    let range = args.door_range.unwrap_or(DEFAULT_DOOR_RANGE);
    if agent.location.distance_to(door.location) > range {
        return Err(DoorResult::NotInRange);
    }

    match (open, is_open) {
        (true, true) => Err(DoorResult::AlreadyOpen),
        (false, false) => Err(DoorResult::AlreadyClosed),
        (false, true) if world.agent_at(door.location) => Err(DoorResult::Blocked),
        _ => Ok(door_id.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tickgrid_types::Location;
    use tickgrid_world::EnvObject;

    use super::*;
    use crate::test_support::{agent_at, empty_world};

    fn id(s: &str) -> ObjectId {
        ObjectId::from(s)
    }

    fn world_with_door(door_at: Location, is_open: bool) -> GridWorld {
        let mut world = empty_world();
        world.register_agent(agent_at("a", Location::new(0, 0))).unwrap();
        world
            .register_env_object(EnvObject::door("door", "door", door_at, is_open))
            .unwrap();
        world
            .register_env_object(EnvObject::new("box", "box", Location::new(1, 0)))
            .unwrap();
        world
    }

    #[test]
    fn open_then_close_toggles_traversability() {
        let mut world = world_with_door(Location::new(1, 0), false);
        let args = ActionArgs::targeting("door");

        assert_eq!(OpenDoor.mutate(&mut world, &id("a"), &args), Ok(DoorResult::Success));
        let door = world.object(&id("door")).unwrap();
        assert_eq!(door.door_state(), Some(true));
        assert!(door.is_traversable);

        assert_eq!(CloseDoor.mutate(&mut world, &id("a"), &args), Ok(DoorResult::Success));
        let door = world.object(&id("door")).unwrap();
        assert_eq!(door.door_state(), Some(false));
        assert!(!door.is_traversable);
    }

    #[test]
    fn state_must_change() {
        let world = world_with_door(Location::new(1, 0), true);
        let args = ActionArgs::targeting("door");
        assert_eq!(
            OpenDoor.is_possible(&world, &id("a"), &args),
            Err(DoorResult::AlreadyOpen)
        );
        let world = world_with_door(Location::new(1, 0), false);
        assert_eq!(
            CloseDoor.is_possible(&world, &id("a"), &args),
            Err(DoorResult::AlreadyClosed)
        );
    }

    #[test]
    fn door_must_be_named_and_near() {
        let mut world = world_with_door(Location::new(3, 0), false);
        assert_eq!(
            OpenDoor.mutate(&mut world, &id("a"), &ActionArgs::default()),
            Err(DoorResult::NoDoorSpecified)
        );
        assert_eq!(
            OpenDoor.mutate(&mut world, &id("a"), &ActionArgs::targeting("door")),
            Err(DoorResult::NotInRange)
        );
        let far_reach = ActionArgs::targeting("door").with_door_range(3);
        assert_eq!(
            OpenDoor.mutate(&mut world, &id("a"), &far_reach),
            Ok(DoorResult::Success)
        );
    }

    #[test]
    fn only_doors_open() {
        let mut world = world_with_door(Location::new(1, 0), false);
        assert_eq!(
            OpenDoor.mutate(&mut world, &id("a"), &ActionArgs::targeting("box")),
            Err(DoorResult::NotADoor)
        );
        assert_eq!(
            OpenDoor.mutate(&mut world, &id("a"), &ActionArgs::targeting("a")),
            Err(DoorResult::NotADoor)
        );
        assert_eq!(
            OpenDoor.mutate(&mut world, &id("a"), &ActionArgs::targeting("ghost")),
            Err(DoorResult::UnknownObject)
        );
    }

    #[test]
    fn agent_in_doorway_blocks_closing() {
        let mut world = world_with_door(Location::new(0, 0), true);
        assert_eq!(
            CloseDoor.mutate(&mut world, &id("a"), &ActionArgs::targeting("door")),
            Err(DoorResult::Blocked)
        );
        assert_eq!(world.object(&id("door")).unwrap().door_state(), Some(true));
    }
}
