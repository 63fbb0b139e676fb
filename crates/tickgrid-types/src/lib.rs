//! Shared type definitions for the tickgrid simulation.
//!
//! This crate is the single source of truth for the values that cross crate
//! boundaries: identifiers, grid coordinates, property maps, and the action
//! request/result vocabulary. Types flow to `TypeScript` via `ts-rs` for the
//! visualizer.
//!
//! # Modules
//!
//! - [`ids`] -- [`ObjectId`], shared by objects and agents
//! - [`grid`] -- [`Location`], [`Range`], [`GridShape`] and the distance metric
//! - [`properties`] -- [`PropertyValue`] and [`PropertyMap`]
//! - [`actions`] -- [`ActionKind`] catalog, requests, and typed results

pub mod actions;
pub mod grid;
pub mod ids;
pub mod properties;

// Re-export all public types at crate root for convenience.
pub use actions::{
    ActionArgs, ActionKind, ActionRequest, ActionResult, DoorResult, DropResult, GrabResult,
    IdleResult,
};
pub use grid::{GridShape, Location, Range};
pub use ids::ObjectId;
pub use properties::{PropertyMap, PropertyValue, keys};
