//! World state for the tickgrid simulation.
//!
//! This crate owns everything the action engine reads and writes:
//!
//! - [`GridWorld`]: the registries of agents and objects, the tick clock,
//!   and the seeded random generator.
//! - [`AgentAvatar`]: the world-side record of an agent, including the
//!   busy state machine and the writable-property policy.
//! - [`EnvObject`]: non-agent entities such as boxes and doors.
//! - [`SenseCapability`]: per-class perception ranges.

pub mod avatar;
pub mod clock;
pub mod error;
pub mod grid;
pub mod object;
pub mod sense;

pub use avatar::{AgentAvatar, CurrentAction, LastAction, AGENT_CLASS, REQUIRED_PROPERTIES};
pub use clock::{ClockError, WorldClock};
pub use error::{AvatarError, WorldError};
pub use grid::GridWorld;
pub use object::{EnvObject, ObjectKind, DOOR_CLASS, ENV_OBJECT_CLASS};
pub use sense::{SenseCapability, ALL_CLASSES};
