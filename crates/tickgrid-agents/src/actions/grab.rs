//! Grabbing objects.
//!
//! An agent holds at most one object and an object is held by at most one
//! agent. A grab either names its target or lets the world pick one of the
//! eligible objects in range, using the world's seeded generator.
//!
//! Checks, in order:
//! 1. The agent already carries something: [`GrabResult::CarriesObject`].
//! 2. Collect every entity within `grab_range` of the agent, minus the agent.
//! 3. Without a target, keep only movable registered objects; none left is
//!    [`GrabResult::NotInRange`]. One of them is chosen uniformly at random
//!    and then goes through the carried check below.
//! 4. A target that is an agent: [`GrabResult::Agent`].
//! 5. A target that is neither agent nor object:
//!    [`GrabResult::UnknownObjectType`].
//! 6. A target some agent already holds: [`GrabResult::ObjectCarried`].
//! 7. A target outside the range set: [`GrabResult::NotInRange`].
//! 8. A target that is not movable: [`GrabResult::ObjectUnmovable`].
//!
//! Agent and carried checks come before the range check so those outcomes
//! hold wherever the target stands.

use rand::seq::IndexedRandom;
use tickgrid_types::{ActionArgs, ActionKind, GrabResult, ObjectId, Range};
use tickgrid_world::{EnvObject, GridWorld};

use super::Action;

/// Range used by `mutate` when the request gives none.
pub const DEFAULT_GRAB_RANGE: u64 = 0;

/// Pick up an object.
///
/// Arguments: `object_id` (optional target) and `grab_range` (reach in
/// cells). `is_possible` treats a missing range as unbounded; `mutate` uses
/// [`DEFAULT_GRAB_RANGE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GrabObject;

/// A target that passed every check, or the pool a random target is drawn
/// from.
enum Target {
    Explicit(ObjectId),
    AnyOf(Vec<ObjectId>),
}

impl Action for GrabObject {
    type Outcome = GrabResult;

    const KIND: ActionKind = ActionKind::GrabObject;

    fn is_possible(
        &self,
        world: &GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<(), GrabResult> {
        let range = Range::from(args.grab_range);
        match resolve(world, agent_id, args.object_id.as_ref(), range)? {
            Target::Explicit(_) => Ok(()),
            Target::AnyOf(pool) if pool.iter().any(|id| !is_carried(world, id)) => Ok(()),
            Target::AnyOf(_) => Err(GrabResult::ObjectCarried),
        }
    }

    fn mutate(
        &self,
        world: &mut GridWorld,
        agent_id: &ObjectId,
        args: &ActionArgs,
    ) -> Result<GrabResult, GrabResult> {
        let range = Range::Bounded(args.grab_range.unwrap_or(DEFAULT_GRAB_RANGE));
        let object_id = match resolve(world, agent_id, args.object_id.as_ref(), range)? {
            Target::Explicit(id) => id,
            Target::AnyOf(pool) => {
                let picked = pool
                    .choose(world.rng_mut())
                    .cloned()
                    .ok_or(GrabResult::NotInRange)?;
                if is_carried(world, &picked) {
                    return Err(GrabResult::ObjectCarried);
                }
                picked
            }
        };

        let (agent, object) = world
            .agent_and_object_mut(agent_id, &object_id)
            .ok_or(GrabResult::UnknownObjectType)?;
        agent.carrying.push(object_id.clone());
        object.carried.push(agent_id.clone());
        object.location = agent.location;

        tracing::debug!(agent_id = %agent_id, object_id = %object_id, "object grabbed");
        Ok(GrabResult::Success { object_id })
    }
}

fn resolve(
    world: &GridWorld,
    agent_id: &ObjectId,
    object_id: Option<&ObjectId>,
    range: Range,
) -> Result<Target, GrabResult> {
    let agent = world
        .agent(agent_id)
        .ok_or(GrabResult::UnknownObjectType)?;
    if agent.is_carrying() {
        return Err(GrabResult::CarriesObject);
    }

    let mut in_range = world.objects_in_range(agent.location, range);
    in_range.remove(agent_id);

    let Some(object_id) = object_id else {
        let pool: Vec<ObjectId> = in_range
            .iter()
            .filter(|id| world.object(id).is_some_and(|obj| obj.movable))
            .cloned()
            .collect();
        if pool.is_empty() {
            return Err(GrabResult::NotInRange);
        }
        return Ok(Target::AnyOf(pool));
    };

    if world.agent(object_id).is_some() {
        return Err(GrabResult::Agent);
    }
    let object = world
        .object(object_id)
        .ok_or(GrabResult::UnknownObjectType)?;
    if object.is_carried() {
        return Err(GrabResult::ObjectCarried);
    }
    if !in_range.contains(object_id) {
        return Err(GrabResult::NotInRange);
    }
    grabbable(object)?;
    Ok(Target::Explicit(object_id.clone()))
}

fn is_carried(world: &GridWorld, object_id: &ObjectId) -> bool {
    world.object(object_id).is_some_and(EnvObject::is_carried)
}

fn grabbable(object: &EnvObject) -> Result<(), GrabResult> {
    if object.is_carried() {
        Err(GrabResult::ObjectCarried)
    } else if !object.movable {
        Err(GrabResult::ObjectUnmovable)
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]
mod tests {
    use tickgrid_types::{GridShape, Location};

    use super::*;
    use crate::test_support::{agent_at, empty_world};

    fn id(s: &str) -> ObjectId {
        ObjectId::from(s)
    }

    fn world_with_box(box_at: Location) -> GridWorld {
        let mut world = empty_world();
        world.register_agent(agent_at("a", Location::new(0, 0))).unwrap();
        world
            .register_env_object(EnvObject::new("box", "box", box_at))
            .unwrap();
        world
    }

    #[test]
    fn grab_at_same_cell_succeeds() {
        let mut world = world_with_box(Location::new(0, 0));
        let args = ActionArgs::targeting("box").with_grab_range(1);
        assert_eq!(GrabObject.is_possible(&world, &id("a"), &args), Ok(()));

        let result = GrabObject.mutate(&mut world, &id("a"), &args);
        assert_eq!(result, Ok(GrabResult::Success { object_id: id("box") }));

        let agent = world.agent(&id("a")).unwrap();
        let object = world.object(&id("box")).unwrap();
        assert_eq!(agent.carrying, vec![id("box")]);
        assert_eq!(object.carried, vec![id("a")]);
        assert_eq!(object.location, agent.location);
    }

    #[test]
    fn grab_teleports_object_to_agent() {
        let mut world = world_with_box(Location::new(1, 0));
        let args = ActionArgs::targeting("box").with_grab_range(1);
        GrabObject.mutate(&mut world, &id("a"), &args).unwrap();
        assert_eq!(world.object(&id("box")).unwrap().location, Location::new(0, 0));
    }

    #[test]
    fn carrying_agent_cannot_grab_even_in_range() {
        let mut world = world_with_box(Location::new(0, 0));
        world.agent_mut(&id("a")).unwrap().carrying.push(id("other"));
        let args = ActionArgs::targeting("box").with_grab_range(1);

        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &args),
            Err(GrabResult::CarriesObject)
        );
        let object = world.object(&id("box")).unwrap();
        assert!(object.carried.is_empty());
        assert_eq!(object.location, Location::new(0, 0));
        assert_eq!(world.agent(&id("a")).unwrap().carrying, vec![id("other")]);
    }

    #[test]
    fn carried_object_fails_regardless_of_range() {
        for range in [0, 1, 100] {
            let mut world = world_with_box(Location::new(5, 5));
            world.register_agent(agent_at("b", Location::new(5, 5))).unwrap();
            GrabObject
                .mutate(&mut world, &id("b"), &ActionArgs::targeting("box"))
                .unwrap();

            let args = ActionArgs::targeting("box").with_grab_range(range);
            assert_eq!(
                GrabObject.is_possible(&world, &id("a"), &args),
                Err(GrabResult::ObjectCarried)
            );
            assert_eq!(
                GrabObject.mutate(&mut world, &id("a"), &args),
                Err(GrabResult::ObjectCarried)
            );
        }
    }

    #[test]
    fn agents_are_never_grabbable() {
        for at in [Location::new(0, 0), Location::new(9, 9)] {
            let mut world = empty_world();
            world.register_agent(agent_at("a", Location::new(0, 0))).unwrap();
            world.register_agent(agent_at("b", at)).unwrap();
            let args = ActionArgs::targeting("b").with_grab_range(1);
            assert_eq!(
                GrabObject.mutate(&mut world, &id("a"), &args),
                Err(GrabResult::Agent)
            );
        }
    }

    #[test]
    fn self_grab_is_an_agent_grab() {
        let mut world = world_with_box(Location::new(0, 0));
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &ActionArgs::targeting("a")),
            Err(GrabResult::Agent)
        );
    }

    #[test]
    fn zero_range_without_object_on_cell_is_not_in_range() {
        let world = world_with_box(Location::new(1, 0));
        let args = ActionArgs::default().with_grab_range(0);
        assert_eq!(
            GrabObject.is_possible(&world, &id("a"), &args),
            Err(GrabResult::NotInRange)
        );
    }

    #[test]
    fn explicit_target_out_of_range() {
        let mut world = world_with_box(Location::new(3, 0));
        let args = ActionArgs::targeting("box").with_grab_range(2);
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &args),
            Err(GrabResult::NotInRange)
        );
    }

    #[test]
    fn mutate_defaults_to_zero_range_while_check_is_unbounded() {
        let mut world = world_with_box(Location::new(4, 4));
        let args = ActionArgs::default();
        assert_eq!(GrabObject.is_possible(&world, &id("a"), &args), Ok(()));
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &args),
            Err(GrabResult::NotInRange)
        );
    }

    #[test]
    fn unknown_target() {
        let mut world = world_with_box(Location::new(0, 0));
        let args = ActionArgs::targeting("ghost").with_grab_range(5);
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &args),
            Err(GrabResult::UnknownObjectType)
        );
    }

    #[test]
    fn doors_are_unmovable() {
        let mut world = empty_world();
        world.register_agent(agent_at("a", Location::new(0, 0))).unwrap();
        world
            .register_env_object(EnvObject::door("door", "door", Location::new(0, 0), true))
            .unwrap();
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &ActionArgs::targeting("door")),
            Err(GrabResult::ObjectUnmovable)
        );
        let untargeted = ActionArgs::default().with_grab_range(0);
        assert_eq!(
            GrabObject.is_possible(&world, &id("a"), &untargeted),
            Err(GrabResult::NotInRange)
        );
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &untargeted),
            Err(GrabResult::NotInRange)
        );
    }

    #[test]
    fn random_pick_includes_carried_objects() {
        let shape = GridShape {
            width: 10,
            height: 10,
        };
        let (mut grabbed, mut carried) = (0, 0);
        for seed in 0..40 {
            let mut world = GridWorld::new(shape, seed);
            world.register_agent(agent_at("a", Location::new(0, 0))).unwrap();
            world.register_agent(agent_at("b", Location::new(0, 0))).unwrap();
            for name in ["held", "free"] {
                world
                    .register_env_object(EnvObject::new(name, name, Location::new(0, 0)))
                    .unwrap();
            }
            GrabObject
                .mutate(&mut world, &id("b"), &ActionArgs::targeting("held"))
                .unwrap();

            let args = ActionArgs::default().with_grab_range(0);
            assert_eq!(GrabObject.is_possible(&world, &id("a"), &args), Ok(()));
            match GrabObject.mutate(&mut world, &id("a"), &args) {
                Ok(GrabResult::Success { object_id }) => {
                    assert_eq!(object_id, id("free"));
                    grabbed += 1;
                }
                Err(GrabResult::ObjectCarried) => {
                    assert!(world.agent(&id("a")).unwrap().carrying.is_empty());
                    carried += 1;
                }
                other => panic!("unexpected grab result {other:?}"),
            }
        }
        assert!(grabbed > 0);
        assert!(carried > 0);
    }

    #[test]
    fn random_pick_with_only_carried_objects_is_not_possible() {
        let mut world = world_with_box(Location::new(0, 0));
        world.register_agent(agent_at("b", Location::new(0, 0))).unwrap();
        GrabObject
            .mutate(&mut world, &id("b"), &ActionArgs::targeting("box"))
            .unwrap();
        let args = ActionArgs::default().with_grab_range(0);
        assert_eq!(
            GrabObject.is_possible(&world, &id("a"), &args),
            Err(GrabResult::ObjectCarried)
        );
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &args),
            Err(GrabResult::ObjectCarried)
        );
    }

    #[test]
    fn random_pick_skips_agents_and_is_seed_deterministic() {
        let build = || {
            let mut world = world_with_box(Location::new(0, 1));
            world.register_agent(agent_at("b", Location::new(0, 0))).unwrap();
            world
        };
        let args = ActionArgs::default().with_grab_range(1);
        for _ in 0..5 {
            let mut world = build();
            assert_eq!(
                GrabObject.mutate(&mut world, &id("a"), &args),
                Ok(GrabResult::Success { object_id: id("box") })
            );
        }
    }

    #[test]
    fn random_pick_draws_from_world_generator() {
        let build = || {
            let mut world = empty_world();
            world.register_agent(agent_at("a", Location::new(5, 5))).unwrap();
            for (n, (x, y)) in [(4, 5), (6, 5), (5, 4), (5, 6)].into_iter().enumerate() {
                world
                    .register_env_object(EnvObject::new(
                        format!("box_{n}"),
                        "box",
                        Location::new(x, y),
                    ))
                    .unwrap();
            }
            world
        };
        let args = ActionArgs::default().with_grab_range(1);
        let first = GrabObject.mutate(&mut build(), &id("a"), &args);
        let second = GrabObject.mutate(&mut build(), &id("a"), &args);
        assert!(first.as_ref().is_ok_and(GrabResult::succeeded));
        assert_eq!(first, second);
    }

    #[test]
    fn check_never_touches_the_world() {
        let world = world_with_box(Location::new(0, 0));
        let before = format!("{world:?}");
        let _ = GrabObject.is_possible(&world, &id("a"), &ActionArgs::default());
        assert_eq!(format!("{world:?}"), before);
    }

    #[test]
    fn at_most_one_object_per_agent() {
        let mut world = world_with_box(Location::new(0, 0));
        world
            .register_env_object(EnvObject::new("box2", "box", Location::new(0, 0)))
            .unwrap();
        let args = ActionArgs::default().with_grab_range(1);
        assert!(GrabObject.mutate(&mut world, &id("a"), &args).is_ok());
        assert_eq!(
            GrabObject.mutate(&mut world, &id("a"), &args),
            Err(GrabResult::CarriesObject)
        );
        assert_eq!(world.agent(&id("a")).unwrap().carrying.len(), 1);
    }
}
