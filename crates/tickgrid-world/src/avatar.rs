//! The world-owned mirror of an agent.
//!
//! An [`AgentAvatar`] is the authoritative record of an agent's body: where
//! it is, what it carries, what it may do, and whether it is still busy with
//! its previous action. The agent's own decision process only ever sees a
//! copy of [`AgentAvatar::properties`] and hands back edits, which
//! [`AgentAvatar::set_agent_changed_properties`] filters through the
//! writable-key policy.
//!
//! Avatars hold no handle back into the world. Everything they relate to is
//! referenced by [`ObjectId`] and looked up through the registries.

use std::collections::BTreeSet;

use tickgrid_types::{
    keys, ActionArgs, ActionKind, ActionResult, GridShape, Location, ObjectId, PropertyMap,
    PropertyValue,
};

use crate::error::AvatarError;
use crate::sense::SenseCapability;

/// Class name reported for agents.
pub const AGENT_CLASS: &str = "AgentAvatar";

/// Properties every avatar must be constructed with.
pub const REQUIRED_PROPERTIES: [&str; 7] = [
    keys::LOCATION,
    keys::SIZE,
    keys::IS_TRAVERSABLE,
    keys::COLOUR,
    keys::SHAPE,
    keys::NAME,
    keys::AGENT_SPEED_IN_TICKS,
];

/// Keys only the world may change, whatever the writable set says.
const WORLD_CONTROLLED: [&str; 3] = [keys::OBJ_ID, keys::CLASS_NAME, keys::CARRYING];

/// When the agent's last action started and how long it lasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LastAction {
    /// Tick the action was dispatched.
    pub tick: u64,
    /// Busy window of the action.
    pub duration_in_ticks: u64,
}

/// The most recently dispatched action, kept for observers.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentAction {
    /// Which action ran.
    pub action: ActionKind,
    /// Arguments it ran with.
    pub args: ActionArgs,
    /// Tick it was dispatched.
    pub started_at: u64,
    /// What the world answered.
    pub result: ActionResult,
}

/// Authoritative state of one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentAvatar {
    id: ObjectId,
    /// Display name.
    pub name: String,
    /// Current cell.
    pub location: Location,
    /// Whether other entities may share the cell.
    pub is_traversable: bool,
    /// Visual size.
    pub size: f64,
    /// Visual colour.
    pub colour: String,
    /// Visual shape index.
    pub shape: i64,
    /// Minimum ticks between two dispatched actions.
    pub agent_speed_in_ticks: u64,
    /// Objects held by the agent. At most one.
    pub carrying: Vec<ObjectId>,
    /// Scenario-specific extra properties.
    pub custom: PropertyMap,
    /// Perception filter applied by the world.
    pub sense_capability: SenseCapability,
    /// Actions this agent may request.
    pub action_set: BTreeSet<ActionKind>,
    /// Keys the agent may change on its own avatar.
    pub properties_agent_writable: BTreeSet<String>,
    blocked: bool,
    last_action: LastAction,
    current_action: Option<CurrentAction>,
}

impl AgentAvatar {
    /// Build an avatar from a raw property map.
    ///
    /// Every key in [`REQUIRED_PROPERTIES`] must be present with a value of
    /// the right kind. `carrying` is optional. Any other key lands in the
    /// custom map. The avatar starts idle, may request every catalog action,
    /// perceives everything, and may write nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::MissingProperty`] for an absent required key and
    /// [`AvatarError::InvalidPropertyType`] for a value of the wrong kind.
    pub fn new(id: impl Into<ObjectId>, mut props: PropertyMap) -> Result<Self, AvatarError> {
        let id = id.into();
        for key in REQUIRED_PROPERTIES {
            if !props.contains_key(key) {
                return Err(AvatarError::MissingProperty {
                    agent: id,
                    property: key,
                });
            }
        }

        let carrying = match props.remove(keys::CARRYING) {
            Some(value) => value
                .as_id_list()
                .ok_or_else(|| invalid(&id, keys::CARRYING))?,
            None => Vec::new(),
        };
        props.remove(keys::OBJ_ID);
        props.remove(keys::CLASS_NAME);

        let mut avatar = Self {
            id,
            name: String::new(),
            location: Location::default(),
            is_traversable: true,
            size: 1.0,
            colour: String::new(),
            shape: 0,
            agent_speed_in_ticks: 1,
            carrying,
            custom: PropertyMap::new(),
            sense_capability: SenseCapability::everything(),
            action_set: ActionKind::ALL.into_iter().collect(),
            properties_agent_writable: BTreeSet::new(),
            blocked: false,
            last_action: LastAction::default(),
            current_action: None,
        };
        for (key, value) in props {
            avatar.apply_property(&key, value)?;
        }
        Ok(avatar)
    }

    /// The agent's id.
    pub const fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Whether the agent holds any object.
    pub fn is_carrying(&self) -> bool {
        !self.carrying.is_empty()
    }

    /// Blocked flag as of the last [`Self::check_agent_busy`].
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Start tick and duration of the last dispatched action.
    pub const fn last_action(&self) -> LastAction {
        self.last_action
    }

    /// The last dispatched action and its result, for observers.
    pub const fn current_action(&self) -> Option<&CurrentAction> {
        self.current_action.as_ref()
    }

    /// Record the action just dispatched.
    pub fn record_action(&mut self, action: CurrentAction) {
        self.current_action = Some(action);
    }

    /// Mark the agent busy from `curr_tick` for `action_duration` ticks.
    pub const fn set_agent_busy(&mut self, curr_tick: u64, action_duration: u64) {
        self.last_action = LastAction {
            tick: curr_tick,
            duration_in_ticks: action_duration,
        };
    }

    /// Recompute and return the blocked flag for `curr_tick`.
    ///
    /// The agent is free once both the last action's duration and its own
    /// speed have elapsed since the action started.
    pub const fn check_agent_busy(&mut self, curr_tick: u64) -> bool {
        let start = self.last_action.tick;
        let action_done = curr_tick >= start.saturating_add(self.last_action.duration_in_ticks);
        let speed_done = curr_tick >= start.saturating_add(self.agent_speed_in_ticks);
        self.blocked = !(action_done && speed_done);
        self.blocked
    }

    /// Merged property view handed to the agent as its local copy.
    pub fn properties(&self) -> PropertyMap {
        let mut props = self.custom.clone();
        props.insert(keys::OBJ_ID.to_owned(), PropertyValue::Text(self.id.0.clone()));
        props.insert(keys::CLASS_NAME.to_owned(), AGENT_CLASS.into());
        props.insert(keys::NAME.to_owned(), self.name.clone().into());
        props.insert(keys::LOCATION.to_owned(), self.location.into());
        props.insert(keys::IS_TRAVERSABLE.to_owned(), self.is_traversable.into());
        props.insert(keys::SIZE.to_owned(), self.size.into());
        props.insert(keys::COLOUR.to_owned(), self.colour.clone().into());
        props.insert(keys::SHAPE.to_owned(), self.shape.into());
        props.insert(
            keys::AGENT_SPEED_IN_TICKS.to_owned(),
            PropertyValue::Int(i64::try_from(self.agent_speed_in_ticks).unwrap_or(i64::MAX)),
        );
        props.insert(keys::CARRYING.to_owned(), PropertyValue::id_list(&self.carrying));
        props
    }

    /// Apply the agent's edited copy of its properties.
    ///
    /// Keys are visited in order. A key the avatar does not have fails with
    /// [`AvatarError::PropertyRemoved`]; an unchanged value is skipped; a
    /// changed value for a key outside `properties_agent_writable` fails with
    /// [`AvatarError::NotWritable`]. The whole map is validated before any
    /// write, so on error the avatar is left untouched.
    ///
    /// Returns the keys that changed.
    ///
    /// # Errors
    ///
    /// See above, plus [`AvatarError::InvalidPropertyType`] when a writable
    /// first-class key receives a value of the wrong kind and
    /// [`AvatarError::OffGrid`] when a new location falls outside `shape`.
    pub fn set_agent_changed_properties(
        &mut self,
        new_props: &PropertyMap,
        shape: GridShape,
    ) -> Result<Vec<String>, AvatarError> {
        let current = self.properties();
        let mut staged = self.clone();
        let mut changed = Vec::new();

        for (key, value) in new_props {
            let Some(existing) = current.get(key) else {
                return Err(AvatarError::PropertyRemoved {
                    agent: self.id.clone(),
                    property: key.clone(),
                });
            };
            if existing == value {
                continue;
            }
            if WORLD_CONTROLLED.contains(&key.as_str())
                || !self.properties_agent_writable.contains(key)
            {
                return Err(AvatarError::NotWritable {
                    agent: self.id.clone(),
                    property: key.clone(),
                });
            }
            staged.apply_property(key, value.clone())?;
            changed.push(key.clone());
        }
        if !shape.contains(staged.location) {
            return Err(AvatarError::OffGrid {
                agent: self.id.clone(),
                location: staged.location,
            });
        }

        *self = staged;
        Ok(changed)
    }

    fn apply_property(&mut self, key: &str, value: PropertyValue) -> Result<(), AvatarError> {
        match key {
            keys::LOCATION => {
                self.location = value.as_location().ok_or_else(|| invalid(&self.id, key))?;
            }
            keys::IS_TRAVERSABLE => {
                self.is_traversable = value.as_bool().ok_or_else(|| invalid(&self.id, key))?;
            }
            keys::NAME => {
                value.as_text().ok_or_else(|| invalid(&self.id, key))?;
                if let PropertyValue::Text(name) = value {
                    self.name = name;
                }
            }
            keys::SIZE => {
                self.size = value.as_float().ok_or_else(|| invalid(&self.id, key))?;
            }
            keys::COLOUR => {
                value.as_text().ok_or_else(|| invalid(&self.id, key))?;
                if let PropertyValue::Text(colour) = value {
                    self.colour = colour;
                }
            }
            keys::SHAPE => {
                self.shape = value.as_int().ok_or_else(|| invalid(&self.id, key))?;
            }
            keys::AGENT_SPEED_IN_TICKS => {
                self.agent_speed_in_ticks = value
                    .as_int()
                    .and_then(|speed| u64::try_from(speed).ok())
                    .ok_or_else(|| invalid(&self.id, key))?;
            }
            _ => {
                self.custom.insert(key.to_owned(), value);
            }
        }
        Ok(())
    }
}

fn invalid(id: &ObjectId, key: &str) -> AvatarError {
    AvatarError::InvalidPropertyType {
        agent: id.clone(),
        property: key.to_owned(),
    }
}
