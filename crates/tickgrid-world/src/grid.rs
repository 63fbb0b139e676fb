//! The grid world: registries, clock, and the run's random generator.
//!
//! [`GridWorld`] is the single owner of every agent avatar and environment
//! object, keyed by [`ObjectId`] in one shared id space. Actions borrow it
//! for the duration of one call and never hold on to references between
//! ticks. The random generator lives here too, seeded once per run, so a
//! fixed seed reproduces every tie-break.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tickgrid_types::{GridShape, Location, ObjectId, PropertyMap, Range};

use crate::avatar::{AgentAvatar, AGENT_CLASS};
use crate::clock::WorldClock;
use crate::error::WorldError;
use crate::object::EnvObject;

/// The authoritative world state.
#[derive(Debug)]
pub struct GridWorld {
    shape: GridShape,
    seed: u64,
    clock: WorldClock,
    registered_agents: BTreeMap<ObjectId, AgentAvatar>,
    environment_objects: BTreeMap<ObjectId, EnvObject>,
    rng: StdRng,
}

impl GridWorld {
    /// Create an empty world of the given shape with a seeded generator.
    pub fn new(shape: GridShape, seed: u64) -> Self {
        Self {
            shape,
            seed,
            clock: WorldClock::new(),
            registered_agents: BTreeMap::new(),
            environment_objects: BTreeMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Grid dimensions.
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Seed the generator was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Current tick.
    pub const fn curr_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Advance the clock by one tick and return the new tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Clock`] on tick overflow.
    pub fn advance_tick(&mut self) -> Result<u64, WorldError> {
        Ok(self.clock.advance()?)
    }

    /// Add an agent to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateId`] if the id is taken by an agent or
    /// an object, and [`WorldError::OutOfBounds`] if the agent is off-grid.
    pub fn register_agent(&mut self, avatar: AgentAvatar) -> Result<(), WorldError> {
        self.check_placement(avatar.id(), avatar.location)?;
        tracing::debug!(agent_id = %avatar.id(), location = %avatar.location, "agent registered");
        self.registered_agents.insert(avatar.id().clone(), avatar);
        Ok(())
    }

    /// Add an environment object to the registry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::register_agent`].
    pub fn register_env_object(&mut self, object: EnvObject) -> Result<(), WorldError> {
        self.check_placement(object.id(), object.location)?;
        tracing::debug!(object_id = %object.id(), location = %object.location, "object registered");
        self.environment_objects.insert(object.id().clone(), object);
        Ok(())
    }

    fn check_placement(&self, id: &ObjectId, location: Location) -> Result<(), WorldError> {
        if self.contains(id) {
            return Err(WorldError::DuplicateId(id.clone()));
        }
        if !self.shape.contains(location) {
            return Err(WorldError::OutOfBounds {
                id: id.clone(),
                location,
            });
        }
        Ok(())
    }

    /// Whether `id` names a registered agent or object.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.registered_agents.contains_key(id) || self.environment_objects.contains_key(id)
    }

    /// All agents, keyed by id.
    pub const fn registered_agents(&self) -> &BTreeMap<ObjectId, AgentAvatar> {
        &self.registered_agents
    }

    /// All environment objects, keyed by id.
    pub const fn environment_objects(&self) -> &BTreeMap<ObjectId, EnvObject> {
        &self.environment_objects
    }

    /// Agent ids in ascending order.
    pub fn agent_ids(&self) -> Vec<ObjectId> {
        self.registered_agents.keys().cloned().collect()
    }

    /// Look up an agent.
    pub fn agent(&self, id: &ObjectId) -> Option<&AgentAvatar> {
        self.registered_agents.get(id)
    }

    /// Look up an agent mutably.
    pub fn agent_mut(&mut self, id: &ObjectId) -> Option<&mut AgentAvatar> {
        self.registered_agents.get_mut(id)
    }

    /// Look up an environment object.
    pub fn object(&self, id: &ObjectId) -> Option<&EnvObject> {
        self.environment_objects.get(id)
    }

    /// Look up an environment object mutably.
    pub fn object_mut(&mut self, id: &ObjectId) -> Option<&mut EnvObject> {
        self.environment_objects.get_mut(id)
    }

    /// Borrow an agent and an object mutably at the same time.
    pub fn agent_and_object_mut(
        &mut self,
        agent_id: &ObjectId,
        object_id: &ObjectId,
    ) -> Option<(&mut AgentAvatar, &mut EnvObject)> {
        let agent = self.registered_agents.get_mut(agent_id)?;
        let object = self.environment_objects.get_mut(object_id)?;
        Some((agent, object))
    }

    /// Ids of every agent and object within `range` of `center`.
    pub fn objects_in_range(&self, center: Location, range: Range) -> BTreeSet<ObjectId> {
        let agents = self
            .registered_agents
            .values()
            .filter(|agent| range.contains(center.distance_to(agent.location)))
            .map(|agent| agent.id().clone());
        let objects = self
            .environment_objects
            .values()
            .filter(|obj| range.contains(center.distance_to(obj.location)))
            .map(|obj| obj.id().clone());
        agents.chain(objects).collect()
    }

    /// Whether any agent stands on `location`.
    pub fn agent_at(&self, location: Location) -> bool {
        self.registered_agents
            .values()
            .any(|agent| agent.location == location)
    }

    /// The part of the world an agent perceives, as property maps.
    ///
    /// The agent always perceives itself. Every other entity is included when
    /// the agent's sense capability has a range for its class that covers
    /// the distance.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if `agent_id` is not registered.
    pub fn perceive(&self, agent_id: &ObjectId) -> Result<BTreeMap<ObjectId, PropertyMap>, WorldError> {
        let me = self
            .registered_agents
            .get(agent_id)
            .ok_or_else(|| WorldError::AgentNotFound(agent_id.clone()))?;
        let sense = &me.sense_capability;
        let visible = |class: &str, location: Location| {
            sense
                .range_for(class)
                .is_some_and(|range| range.contains(me.location.distance_to(location)))
        };

        let mut state = BTreeMap::new();
        for (id, agent) in &self.registered_agents {
            if id == agent_id || visible(AGENT_CLASS, agent.location) {
                state.insert(id.clone(), agent.properties());
            }
        }
        for (id, obj) in &self.environment_objects {
            if visible(obj.class_name(), obj.location) {
                state.insert(id.clone(), obj.properties());
            }
        }
        Ok(state)
    }

    /// The run's random generator.
    pub const fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
