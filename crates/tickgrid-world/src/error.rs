//! Error types for the `tickgrid-world` crate.
//!
//! These cover structural misuse: bad registrations, lookups of ids that do
//! not exist, avatars built from incomplete property sets, and agents writing
//! properties they do not own. Action legality is never reported here; it is
//! a value ([`tickgrid_types::ActionResult`]).

use tickgrid_types::{Location, ObjectId};

use crate::clock::ClockError;

/// Errors that can occur during world registry operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An id is already used by an object or an agent.
    #[error("duplicate id: {0}")]
    DuplicateId(ObjectId),

    /// A location lies outside the grid.
    #[error("{id} placed outside the grid at {location}")]
    OutOfBounds {
        /// The entity being placed.
        id: ObjectId,
        /// The offending location.
        location: Location,
    },

    /// No agent is registered under this id.
    #[error("agent not found: {0}")]
    AgentNotFound(ObjectId),

    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Errors raised by an agent avatar on construction or property sync.
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    /// A required property was not supplied at construction.
    #[error("agent {agent} is missing required property {property}")]
    MissingProperty {
        /// The agent being built.
        agent: ObjectId,
        /// The absent property.
        property: &'static str,
    },

    /// A property holds a value of the wrong kind.
    #[error("agent {agent} property {property} has an invalid value")]
    InvalidPropertyType {
        /// The agent concerned.
        agent: ObjectId,
        /// The offending property.
        property: String,
    },

    /// The agent's copy contains a key the avatar does not have.
    #[error("agent {agent} tried to remove or rename property {property}")]
    PropertyRemoved {
        /// The agent concerned.
        agent: ObjectId,
        /// The unknown key.
        property: String,
    },

    /// The agent changed a property it may not write.
    #[error("agent {agent} tried to change non-writable property {property}")]
    NotWritable {
        /// The agent concerned.
        agent: ObjectId,
        /// The protected key.
        property: String,
    },

    /// The agent moved itself outside the grid.
    #[error("agent {agent} tried to move outside the grid to {location}")]
    OffGrid {
        /// The agent concerned.
        agent: ObjectId,
        /// The rejected location.
        location: Location,
    },
}
