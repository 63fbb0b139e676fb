//! Environment objects: boxes, doors, and anything else that is not an agent.
//!
//! An [`EnvObject`] has a handful of first-class fields the action engine
//! reads and writes directly, plus a residual [`PropertyMap`] for scenario
//! specific extras. [`EnvObject::properties`] merges the two into the view
//! that perception hands out.

use tickgrid_types::{keys, Location, ObjectId, PropertyMap, PropertyValue};

/// Class name reported for plain objects.
pub const ENV_OBJECT_CLASS: &str = "EnvObject";

/// Class name reported for doors.
pub const DOOR_CLASS: &str = "Door";

/// What kind of object this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A plain object with no behaviour of its own.
    Generic,
    /// A door that can be opened and closed.
    Door {
        /// Whether the door is currently open.
        is_open: bool,
    },
}

/// A non-agent entity registered in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvObject {
    id: ObjectId,
    /// Display name.
    pub name: String,
    /// Current cell.
    pub location: Location,
    /// Whether other entities may occupy the same cell.
    pub is_traversable: bool,
    /// Whether agents may pick this object up.
    pub movable: bool,
    /// Agents currently holding this object. At most one.
    pub carried: Vec<ObjectId>,
    /// Object kind.
    pub kind: ObjectKind,
    /// Scenario-specific extra properties.
    pub custom: PropertyMap,
}

impl EnvObject {
    /// Create a traversable, movable, generic object.
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            is_traversable: true,
            movable: true,
            carried: Vec::new(),
            kind: ObjectKind::Generic,
            custom: PropertyMap::new(),
        }
    }

    /// Create a door. Doors are never movable; an open door is traversable.
    pub fn door(
        id: impl Into<ObjectId>,
        name: impl Into<String>,
        location: Location,
        is_open: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            is_traversable: is_open,
            movable: false,
            carried: Vec::new(),
            kind: ObjectKind::Door { is_open },
            custom: PropertyMap::new(),
        }
    }

    /// The object's id.
    pub const fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Class name used by sense capabilities.
    pub const fn class_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Generic => ENV_OBJECT_CLASS,
            ObjectKind::Door { .. } => DOOR_CLASS,
        }
    }

    /// Open state, or `None` if this is not a door.
    pub const fn door_state(&self) -> Option<bool> {
        match self.kind {
            ObjectKind::Door { is_open } => Some(is_open),
            ObjectKind::Generic => None,
        }
    }

    /// Set a door's open state and its traversability with it.
    ///
    /// Returns `false` and leaves the object alone if it is not a door.
    pub fn set_door_open(&mut self, open: bool) -> bool {
        match &mut self.kind {
            ObjectKind::Door { is_open } => {
                *is_open = open;
                self.is_traversable = open;
                true
            }
            ObjectKind::Generic => false,
        }
    }

    /// Whether some agent currently holds this object.
    pub fn is_carried(&self) -> bool {
        !self.carried.is_empty()
    }

    /// Merged property view: first-class fields over the custom map.
    pub fn properties(&self) -> PropertyMap {
        let mut props = self.custom.clone();
        props.insert(keys::OBJ_ID.to_owned(), PropertyValue::Text(self.id.0.clone()));
        props.insert(keys::NAME.to_owned(), PropertyValue::Text(self.name.clone()));
        props.insert(keys::LOCATION.to_owned(), self.location.into());
        props.insert(keys::IS_TRAVERSABLE.to_owned(), self.is_traversable.into());
        props.insert(keys::MOVABLE.to_owned(), self.movable.into());
        props.insert(keys::CARRIED.to_owned(), PropertyValue::id_list(&self.carried));
        props.insert(keys::CLASS_NAME.to_owned(), self.class_name().into());
        if let Some(is_open) = self.door_state() {
            props.insert(keys::IS_OPEN.to_owned(), is_open.into());
        }
        props
    }
}
