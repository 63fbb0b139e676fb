//! World factory: a blueprint from which grid worlds are built.
//!
//! The factory collects agent, object, and door specifications, fills in
//! defaults for anything left unset, and turns them into a registered
//! [`GridWorld`]. One factory can stamp out several worlds; each draws its
//! own seed from the factory's master generator, so the sequence of worlds
//! is reproducible from the master seed alone.
//!
//! Besides single entities the factory lays out shapes (lines, areas, and
//! walled rooms with doors), teams of agents, and prospects: entities that
//! only appear in a world with a given probability. Prospect rolls,
//! [`RandomLocation`]s and [`RandomProperty`]s all draw from the master
//! generator while a world is built.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tickgrid_types::{keys, ActionKind, GridShape, Location, ObjectId, PropertyMap, PropertyValue, Range};
use tickgrid_world::{AgentAvatar, AvatarError, EnvObject, GridWorld, SenseCapability, WorldError};

use crate::config::SimulationConfig;
use crate::random::{offset, RandomError, RandomLocation, RandomProperty};

/// Default agent colour.
pub const DEFAULT_AGENT_COLOUR: &str = "#92f441";

/// Custom property holding an agent's team name.
pub const TEAM: &str = "team";

/// Errors that can occur while building a world.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// Two agents were given the same name.
    #[error("duplicate agent name: {0}")]
    DuplicateAgentName(String),

    /// An avatar could not be constructed.
    #[error("avatar error: {source}")]
    Avatar {
        /// The underlying avatar error.
        #[from]
        source: AvatarError,
    },

    /// Registration in the world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A random field could not be sampled.
    #[error("random field error: {source}")]
    Random {
        /// The underlying sampling error.
        #[from]
        source: RandomError,
    },

    /// A room needs at least one free cell inside its walls.
    #[error("room {name} is {width}x{height}; both sides must exceed 2")]
    RoomTooSmall {
        /// The room.
        name: String,
        /// Requested width.
        width: u64,
        /// Requested height.
        height: u64,
    },

    /// An area must cover at least one cell.
    #[error("area {name} is {width}x{height}; both sides must be at least 1")]
    EmptyArea {
        /// The area.
        name: String,
        /// Requested width.
        width: u64,
        /// Requested height.
        height: u64,
    },

    /// A room door was placed off the room's walls.
    #[error("room {name} has a door at {location}, which is not in a wall")]
    DoorNotInWall {
        /// The room.
        name: String,
        /// The offending door cell.
        location: Location,
    },
}

/// Blueprint for one agent. Unset fields take the factory defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentSpec {
    /// Display name. Must be unique among agents.
    pub name: String,
    /// Starting cell.
    pub location: Location,
    /// Whether others may share the agent's cell. Default `true`.
    #[serde(default)]
    pub is_traversable: Option<bool>,
    /// Visual size. Default `1.0`.
    #[serde(default)]
    pub size: Option<f64>,
    /// Visual colour. Default [`DEFAULT_AGENT_COLOUR`].
    #[serde(default)]
    pub colour: Option<String>,
    /// Visual shape index. Default `1`.
    #[serde(default)]
    pub shape: Option<i64>,
    /// Ticks between actions. Default `1`.
    #[serde(default)]
    pub agent_speed_in_ticks: Option<u64>,
    /// Allowed actions. Default: the whole catalog.
    #[serde(default)]
    pub actions: Option<Vec<ActionKind>>,
    /// Keys the agent may change on its own avatar.
    #[serde(default)]
    pub writable: Vec<String>,
    /// Perception range per class name (`"*"` for any); `None` means
    /// unbounded. Default: everything, unbounded.
    #[serde(default)]
    pub sense: Option<BTreeMap<String, Option<u64>>>,
    /// Extra properties.
    #[serde(default)]
    pub custom: PropertyMap,
    /// Extra properties drawn per world. Override `custom` on shared keys.
    #[serde(default)]
    pub random_custom: BTreeMap<String, RandomProperty>,
    /// Area the starting cell is drawn from. Overrides `location`.
    #[serde(default)]
    pub random_location: Option<RandomLocation>,
    /// Chance that the agent appears in a built world. Default: always.
    #[serde(default)]
    pub probability: Option<f64>,
}

impl AgentSpec {
    /// An agent with every optional field left to the defaults.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            is_traversable: None,
            size: None,
            colour: None,
            shape: None,
            agent_speed_in_ticks: None,
            actions: None,
            writable: Vec::new(),
            sense: None,
            custom: PropertyMap::new(),
            random_custom: BTreeMap::new(),
            random_location: None,
            probability: None,
        }
    }
}

/// Blueprint for a plain object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectSpec {
    /// Display name. Need not be unique.
    pub name: String,
    /// Starting cell.
    pub location: Location,
    /// Default `true`.
    #[serde(default)]
    pub is_traversable: Option<bool>,
    /// Default `true`.
    #[serde(default)]
    pub movable: Option<bool>,
    /// Extra properties.
    #[serde(default)]
    pub custom: PropertyMap,
    /// Extra properties drawn per world. Override `custom` on shared keys.
    #[serde(default)]
    pub random_custom: BTreeMap<String, RandomProperty>,
    /// Area the cell is drawn from. Overrides `location`.
    #[serde(default)]
    pub random_location: Option<RandomLocation>,
    /// Chance that the object appears in a built world. Default: always.
    #[serde(default)]
    pub probability: Option<f64>,
}

impl ObjectSpec {
    /// A traversable, movable object.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            is_traversable: None,
            movable: None,
            custom: PropertyMap::new(),
            random_custom: BTreeMap::new(),
            random_location: None,
            probability: None,
        }
    }

    /// A traversable object agents cannot pick up, marking a region.
    fn area_tile(name: &str, location: Location) -> Self {
        Self {
            is_traversable: Some(true),
            movable: Some(false),
            ..Self::new(name, location)
        }
    }

    /// A wall segment: blocks movement and cannot be picked up.
    fn wall(name: &str, location: Location) -> Self {
        Self {
            is_traversable: Some(false),
            movable: Some(false),
            ..Self::new(name, location)
        }
    }
}

/// Blueprint for a door.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DoorSpec {
    /// Display name.
    pub name: String,
    /// Cell of the door.
    pub location: Location,
    /// Starting state. Default closed.
    #[serde(default)]
    pub is_open: bool,
}

/// Blueprint for a walled room.
///
/// The room's outer ring of cells becomes walls, except where a door is
/// listed; every door must sit on that ring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomSpec {
    /// Display name; walls, doors, and tiles are named after it.
    pub name: String,
    /// Top-left wall cell.
    pub top_left: Location,
    /// Outer width, walls included. Must exceed 2.
    pub width: u64,
    /// Outer height, walls included. Must exceed 2.
    pub height: u64,
    /// Wall cells replaced by doors.
    #[serde(default)]
    pub door_locations: Vec<Location>,
    /// Starting state of every door. Default closed.
    #[serde(default)]
    pub doors_open: bool,
    /// Fill the inside with area tiles.
    #[serde(default)]
    pub with_area_tiles: bool,
}

/// World-level settings for the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSettings {
    /// Grid dimensions.
    pub shape: GridShape,
    /// Master seed.
    pub seed: u64,
}

/// Blueprint for grid worlds.
#[derive(Debug)]
pub struct WorldFactory {
    settings: WorldSettings,
    rng: StdRng,
    agents: Vec<AgentSpec>,
    objects: Vec<ObjectSpec>,
    doors: Vec<DoorSpec>,
    worlds_created: u64,
}

impl WorldFactory {
    /// Create an empty blueprint.
    pub fn new(settings: WorldSettings) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(settings.seed),
            agents: Vec::new(),
            objects: Vec::new(),
            doors: Vec::new(),
            worlds_created: 0,
        }
    }

    /// Create a blueprint from the `world`, `agents`, `objects`, and `doors`
    /// sections of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::DuplicateAgentName`] if two agents share a name
    /// and the [`Self::add_room`] errors for a malformed room.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, FactoryError> {
        let mut factory = Self::new(WorldSettings {
            shape: config.world.shape,
            seed: config.world.seed,
        });
        for agent in &config.agents {
            factory.add_agent(agent.clone())?;
        }
        for object in &config.objects {
            factory.add_env_object(object.clone());
        }
        for door in &config.doors {
            factory.add_door(door.clone());
        }
        for room in &config.rooms {
            factory.add_room(room)?;
        }
        Ok(factory)
    }

    /// Add an agent.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::DuplicateAgentName`] if the name is taken.
    pub fn add_agent(&mut self, spec: AgentSpec) -> Result<(), FactoryError> {
        if self.agents.iter().any(|a| a.name == spec.name) {
            return Err(FactoryError::DuplicateAgentName(spec.name));
        }
        self.agents.push(spec);
        Ok(())
    }

    /// Add an agent that appears in each built world with chance
    /// `probability`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_agent`].
    pub fn add_agent_prospect(
        &mut self,
        spec: AgentSpec,
        probability: f64,
    ) -> Result<(), FactoryError> {
        self.add_agent(AgentSpec {
            probability: Some(probability),
            ..spec
        })
    }

    /// Add several agents sharing the custom [`TEAM`] property.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::DuplicateAgentName`] on the first taken name;
    /// agents before it stay added.
    pub fn add_team(
        &mut self,
        specs: impl IntoIterator<Item = AgentSpec>,
        team_name: &str,
    ) -> Result<(), FactoryError> {
        for mut spec in specs {
            spec.custom.insert(TEAM.to_owned(), team_name.into());
            self.add_agent(spec)?;
        }
        Ok(())
    }

    /// Add a plain object.
    pub fn add_env_object(&mut self, spec: ObjectSpec) {
        self.objects.push(spec);
    }

    /// Add an object that appears in each built world with chance
    /// `probability`.
    pub fn add_env_object_prospect(&mut self, spec: ObjectSpec, probability: f64) {
        self.add_env_object(ObjectSpec {
            probability: Some(probability),
            ..spec
        });
    }

    /// Add one object per cell on the straight line from `start` to `end`,
    /// both ends included.
    pub fn add_line(&mut self, name: &str, start: Location, end: Location) {
        self.add_multiple_objects(name, &line_locations(start, end));
    }

    /// Cover a `width` by `height` rectangle with area tiles.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::EmptyArea`] when either side is zero.
    pub fn add_area(
        &mut self,
        name: &str,
        top_left: Location,
        width: u64,
        height: u64,
    ) -> Result<(), FactoryError> {
        if width == 0 || height == 0 {
            return Err(FactoryError::EmptyArea {
                name: name.to_owned(),
                width,
                height,
            });
        }
        for dx in 0..width {
            for dy in 0..height {
                self.add_env_object(ObjectSpec::area_tile(name, offset(top_left, dx, dy)));
            }
        }
        Ok(())
    }

    /// Add a walled room with doors and optional area tiles.
    ///
    /// Walls are added in cell order, then doors in the listed order, then
    /// the tiles. Nothing is added when the room is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::RoomTooSmall`] unless both sides exceed 2 and
    /// [`FactoryError::DoorNotInWall`] for a door off the outer ring.
    pub fn add_room(&mut self, room: &RoomSpec) -> Result<(), FactoryError> {
        if room.width <= 2 || room.height <= 2 {
            return Err(FactoryError::RoomTooSmall {
                name: room.name.clone(),
                width: room.width,
                height: room.height,
            });
        }
        let right = room.width.saturating_sub(1);
        let bottom = room.height.saturating_sub(1);
        let top_left = room.top_left;
        let top_right = offset(top_left, right, 0);
        let bottom_left = offset(top_left, 0, bottom);
        let bottom_right = offset(top_left, right, bottom);

        let mut walls: BTreeSet<Location> = [
            (top_left, top_right),
            (top_right, bottom_right),
            (bottom_left, bottom_right),
            (top_left, bottom_left),
        ]
        .into_iter()
        .flat_map(|(start, end)| line_locations(start, end))
        .collect();
        for &door in &room.door_locations {
            if !walls.remove(&door) {
                return Err(FactoryError::DoorNotInWall {
                    name: room.name.clone(),
                    location: door,
                });
            }
        }

        let wall_name = format!("{} wall", room.name);
        for location in walls {
            self.add_env_object(ObjectSpec::wall(&wall_name, location));
        }
        for &location in &room.door_locations {
            self.add_door(DoorSpec {
                name: format!("{} door", room.name),
                location,
                is_open: room.doors_open,
            });
        }
        if room.with_area_tiles {
            self.add_area(
                &format!("{} area", room.name),
                offset(top_left, 1, 1),
                room.width.saturating_sub(2),
                room.height.saturating_sub(2),
            )?;
        }
        Ok(())
    }

    /// Add one object per location, all with the same name.
    pub fn add_multiple_objects(&mut self, name: &str, locations: &[Location]) {
        for &location in locations {
            self.add_env_object(ObjectSpec::new(name, location));
        }
    }

    /// Add a door.
    pub fn add_door(&mut self, spec: DoorSpec) {
        self.doors.push(spec);
    }

    /// Number of worlds built so far.
    pub const fn worlds_created(&self) -> u64 {
        self.worlds_created
    }

    /// Build the next world from the blueprint.
    ///
    /// Ids are derived from names plus a sequence number that runs over
    /// agents, then objects, then doors, in insertion order. A prospect that
    /// does not appear takes no sequence number. Draws from the master
    /// generator happen in the same order: the world seed, then per entity
    /// its prospect roll, location, and random properties by key.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Avatar`] for an agent with invalid properties,
    /// [`FactoryError::Random`] for a random field that cannot be sampled,
    /// and [`FactoryError::World`] for an entity off the grid.
    pub fn build(&mut self) -> Result<GridWorld, FactoryError> {
        let seed: u64 = self.rng.random();
        let mut world = GridWorld::new(self.settings.shape, seed);
        let mut seq: u64 = 0;
        let mut next_id = |name: &str| {
            let id = ObjectId::from_name(name, seq);
            seq = seq.saturating_add(1);
            id
        };
        let rng = &mut self.rng;

        for spec in &self.agents {
            if !is_placed(rng, spec.probability) {
                continue;
            }
            let location = draw_location(rng, spec.location, spec.random_location.as_ref())?;
            let custom = draw_custom(rng, &spec.custom, &spec.random_custom)?;
            let avatar = create_agent(next_id(&spec.name), spec, location, custom)?;
            world.register_agent(avatar)?;
        }
        for spec in &self.objects {
            if !is_placed(rng, spec.probability) {
                continue;
            }
            let location = draw_location(rng, spec.location, spec.random_location.as_ref())?;
            let mut object = EnvObject::new(next_id(&spec.name), spec.name.clone(), location);
            object.is_traversable = spec.is_traversable.unwrap_or(true);
            object.movable = spec.movable.unwrap_or(true);
            object.custom = draw_custom(rng, &spec.custom, &spec.random_custom)?;
            world.register_env_object(object)?;
        }
        for spec in &self.doors {
            let door = EnvObject::door(next_id(&spec.name), spec.name.clone(), spec.location, spec.is_open);
            world.register_env_object(door)?;
        }

        self.worlds_created = self.worlds_created.saturating_add(1);
        tracing::info!(
            world_seed = seed,
            agents = world.registered_agents().len(),
            objects = world.environment_objects().len(),
            worlds_created = self.worlds_created,
            "World built"
        );
        Ok(world)
    }

    /// Build `count` worlds in sequence.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build`].
    pub fn worlds(&mut self, count: usize) -> Result<Vec<GridWorld>, FactoryError> {
        (0..count).map(|_| self.build()).collect()
    }
}

/// Turn per-class ranges into a sense capability. `None` is unbounded.
pub fn create_sense_capability(ranges: &BTreeMap<String, Option<u64>>) -> SenseCapability {
    ranges
        .iter()
        .fold(SenseCapability::nothing(), |sense, (class, range)| {
            sense.with(class.clone(), Range::from(*range))
        })
}

/// Roll a prospect. Entities without a probability always appear.
fn is_placed(rng: &mut StdRng, probability: Option<f64>) -> bool {
    probability.is_none_or(|chance| rng.random::<f64>() <= chance)
}

fn draw_location(
    rng: &mut StdRng,
    fixed: Location,
    random: Option<&RandomLocation>,
) -> Result<Location, RandomError> {
    random.map_or(Ok(fixed), |area| area.sample(rng))
}

fn draw_custom(
    rng: &mut StdRng,
    fixed: &PropertyMap,
    random: &BTreeMap<String, RandomProperty>,
) -> Result<PropertyMap, RandomError> {
    let mut custom = fixed.clone();
    for (key, property) in random {
        custom.insert(key.clone(), property.sample(rng)?);
    }
    Ok(custom)
}

/// Points on the line from `start` to `end` (Bresenham), ends included.
fn line_locations(start: Location, end: Location) -> Vec<Location> {
    let dx = i128::from(start.x.abs_diff(end.x));
    let dy = i128::from(start.y.abs_diff(end.y));
    let step_x: i64 = if end.x >= start.x { 1 } else { -1 };
    let step_y: i64 = if end.y >= start.y { 1 } else { -1 };
    let neg_dy = 0_i128.saturating_sub(dy);

    let mut err = dx.saturating_sub(dy);
    let mut current = start;
    let mut line = vec![start];
    while current != end {
        let doubled = err.saturating_mul(2);
        if doubled > neg_dy {
            err = err.saturating_sub(dy);
            current.x = current.x.saturating_add(step_x);
        }
        if doubled < dx {
            err = err.saturating_add(dx);
            current.y = current.y.saturating_add(step_y);
        }
        line.push(current);
    }
    line
}

fn create_agent(
    id: ObjectId,
    spec: &AgentSpec,
    location: Location,
    custom: PropertyMap,
) -> Result<AgentAvatar, AvatarError> {
    let mut props = custom;
    let speed = spec.agent_speed_in_ticks.unwrap_or(1);
    let fields = [
        (keys::NAME, PropertyValue::from(spec.name.clone())),
        (keys::LOCATION, location.into()),
        (keys::IS_TRAVERSABLE, spec.is_traversable.unwrap_or(true).into()),
        (keys::SIZE, spec.size.unwrap_or(1.0).into()),
        (
            keys::COLOUR,
            spec.colour
                .clone()
                .unwrap_or_else(|| DEFAULT_AGENT_COLOUR.to_owned())
                .into(),
        ),
        (keys::SHAPE, spec.shape.unwrap_or(1).into()),
        (
            keys::AGENT_SPEED_IN_TICKS,
            PropertyValue::Int(i64::try_from(speed).unwrap_or(i64::MAX)),
        ),
    ];
    for (key, value) in fields {
        props.insert(key.to_owned(), value);
    }

    let mut avatar = AgentAvatar::new(id, props)?;
    if let Some(actions) = &spec.actions {
        avatar.action_set = actions.iter().copied().collect();
    }
    avatar.properties_agent_writable = spec.writable.iter().cloned().collect::<BTreeSet<_>>();
    if let Some(sense) = &spec.sense {
        avatar.sense_capability = create_sense_capability(sense);
    }
    Ok(avatar)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use tickgrid_world::{ObjectKind, ALL_CLASSES};

    use super::*;

    fn settings() -> WorldSettings {
        WorldSettings {
            shape: GridShape {
                width: 8,
                height: 8,
            },
            seed: 3,
        }
    }

    #[test]
    fn agent_defaults() {
        let mut factory = WorldFactory::new(settings());
        factory
            .add_agent(AgentSpec::new("Alice", Location::new(1, 1)))
            .unwrap();
        let world = factory.build().unwrap();
        let alice = world.agent(&ObjectId::from("alice_0")).unwrap();
        assert!(alice.is_traversable);
        assert_eq!(alice.colour, DEFAULT_AGENT_COLOUR);
        assert_eq!(alice.shape, 1);
        assert_eq!(alice.agent_speed_in_ticks, 1);
        assert_eq!(alice.action_set.len(), ActionKind::ALL.len());
        assert!(alice.properties_agent_writable.is_empty());
        assert_eq!(alice.sense_capability, SenseCapability::everything());
    }

    #[test]
    fn duplicate_agent_names_are_rejected() {
        let mut factory = WorldFactory::new(settings());
        factory
            .add_agent(AgentSpec::new("alice", Location::new(0, 0)))
            .unwrap();
        assert!(matches!(
            factory.add_agent(AgentSpec::new("alice", Location::new(1, 0))),
            Err(FactoryError::DuplicateAgentName(name)) if name == "alice"
        ));
    }

    #[test]
    fn repeated_object_names_get_distinct_ids() {
        let mut factory = WorldFactory::new(settings());
        factory.add_multiple_objects("Red Box", &[Location::new(0, 0), Location::new(1, 0)]);
        factory.add_door(DoorSpec {
            name: "door".to_owned(),
            location: Location::new(2, 0),
            is_open: false,
        });
        let world = factory.build().unwrap();
        let ids: Vec<&str> = world
            .environment_objects()
            .keys()
            .map(ObjectId::as_str)
            .collect();
        assert_eq!(ids, vec!["door_2", "red_box_0", "red_box_1"]);
        let door = world.object(&ObjectId::from("door_2")).unwrap();
        assert!(!door.movable);
        assert_eq!(door.door_state(), Some(false));
        assert!(world.object(&ObjectId::from("red_box_0")).unwrap().movable);
    }

    #[test]
    fn off_grid_entity_fails_the_build() {
        let mut factory = WorldFactory::new(settings());
        factory.add_env_object(ObjectSpec::new("box", Location::new(8, 8)));
        assert!(matches!(factory.build(), Err(FactoryError::World { .. })));
    }

    #[test]
    fn spec_overrides_apply() {
        let mut factory = WorldFactory::new(settings());
        let mut spec = AgentSpec::new("bob", Location::new(0, 0));
        spec.actions = Some(vec![ActionKind::Idle]);
        spec.writable = vec![keys::COLOUR.to_owned()];
        spec.agent_speed_in_ticks = Some(3);
        spec.sense = Some(BTreeMap::from([(ALL_CLASSES.to_owned(), Some(2))]));
        factory.add_agent(spec).unwrap();

        let world = factory.build().unwrap();
        let bob = world.agent(&ObjectId::from("bob_0")).unwrap();
        assert_eq!(bob.action_set.iter().copied().collect::<Vec<_>>(), vec![ActionKind::Idle]);
        assert!(bob.properties_agent_writable.contains(keys::COLOUR));
        assert_eq!(bob.agent_speed_in_ticks, 3);
        assert_eq!(bob.sense_capability.range_for("Door"), Some(Range::Bounded(2)));
    }

    #[test]
    fn worlds_are_reproducible_from_master_seed() {
        let seeds = |factory: &mut WorldFactory| -> Vec<u64> {
            factory
                .worlds(3)
                .unwrap()
                .iter()
                .map(GridWorld::seed)
                .collect()
        };
        let first = seeds(&mut WorldFactory::new(settings()));
        let second = seeds(&mut WorldFactory::new(settings()));
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    fn ids(world: &GridWorld) -> Vec<String> {
        world
            .registered_agents()
            .keys()
            .chain(world.environment_objects().keys())
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn seeded_prospects_build_the_same_worlds() {
        let blueprint = || {
            let mut factory = WorldFactory::new(settings());
            for i in 0..6 {
                factory
                    .add_agent_prospect(AgentSpec::new(format!("scout {i}"), Location::new(i, 0)), 0.5)
                    .unwrap();
                factory.add_env_object_prospect(ObjectSpec::new("gem", Location::new(i, 1)), 0.5);
            }
            factory
        };
        let run = |factory: &mut WorldFactory| -> Vec<Vec<String>> {
            factory.worlds(4).unwrap().iter().map(ids).collect()
        };
        let first = run(&mut blueprint());
        assert_eq!(first, run(&mut blueprint()));
        assert!(first.iter().all(|world_ids| world_ids.len() <= 12));
    }

    #[test]
    fn certain_and_impossible_prospects() {
        let mut factory = WorldFactory::new(settings());
        factory.add_env_object_prospect(ObjectSpec::new("ghost", Location::new(0, 0)), -1.0);
        factory.add_env_object_prospect(ObjectSpec::new("rock", Location::new(1, 0)), 1.0);
        let world = factory.build().unwrap();
        // The skipped ghost takes no sequence number.
        assert_eq!(ids(&world), vec!["rock_0"]);
    }

    #[test]
    fn random_fields_are_drawn_per_world_from_the_master_seed() {
        let blueprint = || {
            let mut factory = WorldFactory::new(settings());
            let mut spec = ObjectSpec::new("gem", Location::new(0, 0));
            spec.random_location = Some(RandomLocation {
                top_left: Location::new(2, 2),
                width: 3,
                height: 3,
            });
            spec.random_custom.insert(
                "colour".to_owned(),
                RandomProperty::uniform(vec!["red".into(), "blue".into()]),
            );
            factory.add_env_object(spec);
            factory
        };
        let draw = |factory: &mut WorldFactory| {
            factory
                .worlds(5)
                .unwrap()
                .iter()
                .map(|world| world.object(&ObjectId::from("gem_0")).unwrap().clone())
                .collect::<Vec<_>>()
        };
        let first = draw(&mut blueprint());
        assert_eq!(first, draw(&mut blueprint()));
        for gem in &first {
            assert!((2..5).contains(&gem.location.x) && (2..5).contains(&gem.location.y));
            assert!(gem.custom.contains_key("colour"));
        }
    }

    #[test]
    fn team_members_share_the_team_property() {
        let mut factory = WorldFactory::new(settings());
        factory
            .add_team(
                [
                    AgentSpec::new("red one", Location::new(0, 0)),
                    AgentSpec::new("red two", Location::new(1, 0)),
                ],
                "red",
            )
            .unwrap();
        let world = factory.build().unwrap();
        for agent in world.registered_agents().values() {
            assert_eq!(agent.custom.get(TEAM), Some(&PropertyValue::from("red")));
        }
        assert_eq!(world.registered_agents().len(), 2);
    }

    #[test]
    fn line_covers_every_cell_between_the_ends() {
        let mut factory = WorldFactory::new(settings());
        factory.add_line("fence", Location::new(0, 0), Location::new(3, 0));
        factory.add_line("slope", Location::new(4, 4), Location::new(6, 5));
        let world = factory.build().unwrap();
        let cells = |name: &str| -> Vec<Location> {
            world
                .environment_objects()
                .values()
                .filter(|obj| obj.name == name)
                .map(|obj| obj.location)
                .collect()
        };
        let mut fence = cells("fence");
        fence.sort();
        assert_eq!(
            fence,
            (0..4).map(|x| Location::new(x, 0)).collect::<Vec<_>>()
        );
        let slope = cells("slope");
        assert_eq!(slope.len(), 3);
        assert!(slope.contains(&Location::new(4, 4)));
        assert!(slope.contains(&Location::new(6, 5)));
    }

    #[test]
    fn area_tiles_are_fixed_and_traversable() {
        let mut factory = WorldFactory::new(settings());
        factory.add_area("rug", Location::new(1, 1), 2, 3).unwrap();
        assert!(matches!(
            factory.add_area("void", Location::new(0, 0), 0, 2),
            Err(FactoryError::EmptyArea { .. })
        ));
        let world = factory.build().unwrap();
        let tiles: Vec<_> = world.environment_objects().values().collect();
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|tile| tile.is_traversable && !tile.movable));
    }

    fn kitchen() -> RoomSpec {
        RoomSpec {
            name: "kitchen".to_owned(),
            top_left: Location::new(1, 1),
            width: 4,
            height: 3,
            door_locations: vec![Location::new(2, 1)],
            doors_open: true,
            with_area_tiles: true,
        }
    }

    #[test]
    fn room_has_walls_doors_and_tiles() {
        let mut factory = WorldFactory::new(settings());
        factory.add_room(&kitchen()).unwrap();
        let world = factory.build().unwrap();
        let objects = world.environment_objects();

        let walls: Vec<_> = objects.values().filter(|obj| obj.name == "kitchen wall").collect();
        // 4x3 ring has 10 cells, one of which is the door.
        assert_eq!(walls.len(), 9);
        assert!(walls.iter().all(|wall| !wall.is_traversable && !wall.movable));
        assert!(!walls.iter().any(|wall| wall.location == Location::new(2, 1)));

        let door = objects.values().find(|obj| obj.name == "kitchen door").unwrap();
        assert_eq!(door.location, Location::new(2, 1));
        assert_eq!(door.kind, ObjectKind::Door { is_open: true });

        let mut tiles: Vec<Location> = objects
            .values()
            .filter(|obj| obj.name == "kitchen area")
            .map(|obj| obj.location)
            .collect();
        tiles.sort();
        assert_eq!(tiles, vec![Location::new(2, 2), Location::new(3, 2)]);
    }

    #[test]
    fn malformed_rooms_are_rejected_without_side_effects() {
        let mut factory = WorldFactory::new(settings());
        let narrow = RoomSpec {
            width: 2,
            ..kitchen()
        };
        assert!(matches!(
            factory.add_room(&narrow),
            Err(FactoryError::RoomTooSmall { width: 2, .. })
        ));
        let inner_door = RoomSpec {
            door_locations: vec![Location::new(2, 2)],
            ..kitchen()
        };
        assert!(matches!(
            factory.add_room(&inner_door),
            Err(FactoryError::DoorNotInWall { location, .. }) if location == Location::new(2, 2)
        ));
        assert!(factory.build().unwrap().environment_objects().is_empty());
    }
}
