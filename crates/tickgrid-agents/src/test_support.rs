//! Shared fixtures for action tests.

use tickgrid_types::{keys, GridShape, Location, PropertyMap};
use tickgrid_world::{AgentAvatar, GridWorld};

#[allow(clippy::unwrap_used)]
pub fn agent_at(id: &str, location: Location) -> AgentAvatar {
    let mut props = PropertyMap::new();
    props.insert(keys::LOCATION.to_owned(), location.into());
    props.insert(keys::SIZE.to_owned(), 1.0.into());
    props.insert(keys::IS_TRAVERSABLE.to_owned(), true.into());
    props.insert(keys::COLOUR.to_owned(), "#92f441".into());
    props.insert(keys::SHAPE.to_owned(), 1_i64.into());
    props.insert(keys::NAME.to_owned(), id.into());
    props.insert(keys::AGENT_SPEED_IN_TICKS.to_owned(), 1_i64.into());
    AgentAvatar::new(id, props).unwrap()
}

pub fn empty_world() -> GridWorld {
    GridWorld::new(
        GridShape {
            width: 10,
            height: 10,
        },
        42,
    )
}
