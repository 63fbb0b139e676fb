//! Open property maps for objects and agents.
//!
//! Well-known properties live in typed fields on the world structs; anything
//! else is carried as a [`PropertyValue`] in a [`PropertyMap`]. The same map
//! type is what perception hands to agents and what agents hand back when
//! they edit their local copy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grid::Location;
use crate::ids::ObjectId;

/// Property keys with a meaning fixed by the engine.
pub mod keys {
    /// Grid cell of the entity.
    pub const LOCATION: &str = "location";
    /// Whether other entities may share the cell.
    pub const IS_TRAVERSABLE: &str = "is_traversable";
    /// Display name.
    pub const NAME: &str = "name";
    /// Visual size of an agent.
    pub const SIZE: &str = "size";
    /// Visual colour (hex string).
    pub const COLOUR: &str = "colour";
    /// Visual shape index.
    pub const SHAPE: &str = "shape";
    /// Minimum ticks between two actions of an agent.
    pub const AGENT_SPEED_IN_TICKS: &str = "agent_speed_in_ticks";
    /// Ids of the objects an agent holds.
    pub const CARRYING: &str = "carrying";
    /// Ids of the agents holding an object.
    pub const CARRIED: &str = "carried";
    /// Whether an object can be picked up.
    pub const MOVABLE: &str = "movable";
    /// Open state of a door.
    pub const IS_OPEN: &str = "is_open";
    /// Kind of entity, used by sense capabilities.
    pub const CLASS_NAME: &str = "class_name";
    /// Id of the entity.
    pub const OBJ_ID: &str = "obj_id";
}

/// A single property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum PropertyValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
    /// Grid cell.
    Location(Location),
    /// Ordered list of values.
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// The boolean inside, if this is a [`PropertyValue::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer inside, if this is a [`PropertyValue::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// A float view of numeric values (`Int` widens).
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The text inside, if this is a [`PropertyValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The location inside, if this is a [`PropertyValue::Location`].
    pub const fn as_location(&self) -> Option<Location> {
        match self {
            Self::Location(loc) => Some(*loc),
            _ => None,
        }
    }

    /// Interpret a list of text values as object ids.
    pub fn as_id_list(&self) -> Option<Vec<ObjectId>> {
        match self {
            Self::List(items) => items
                .iter()
                .map(|item| item.as_text().map(ObjectId::from))
                .collect(),
            _ => None,
        }
    }

    /// Encode a list of ids as a property value.
    pub fn id_list(ids: &[ObjectId]) -> Self {
        Self::List(ids.iter().map(|id| Self::Text(id.0.clone())).collect())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Location> for PropertyValue {
    fn from(value: Location) -> Self {
        Self::Location(value)
    }
}

/// Property name to value.
pub type PropertyMap = BTreeMap<String, PropertyValue>;
