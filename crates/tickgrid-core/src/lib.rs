//! Core engine for the tickgrid simulation.
//!
//! This crate ties the world and the action catalog together:
//!
//! - [`config`]: YAML configuration with a seed override from the environment.
//! - [`factory`]: builds reproducible worlds from agent and object specs.
//! - [`random`]: spec fields sampled per world from the master seed.
//! - [`decision`]: the [`DecisionSource`](decision::DecisionSource) seam and
//!   the stub and scripted sources.
//! - [`tick`]: the six-phase tick cycle.
//! - [`runner`]: the paced, bounded run loop.
//! - [`action_log`]: a read-only observer that records what agents did.

pub mod action_log;
pub mod config;
pub mod decision;
pub mod factory;
pub mod random;
pub mod runner;
pub mod tick;

pub use action_log::{ActionLog, ActionLogRow};
pub use config::{ConfigError, SimulationConfig};
pub use decision::{
    AgentDecision, AgentView, DecisionError, DecisionSource, ScriptStep, ScriptedDecisionSource,
    StubDecisionSource,
};
pub use factory::{
    AgentSpec, DoorSpec, FactoryError, ObjectSpec, RoomSpec, WorldFactory, WorldSettings,
};
pub use random::{RandomError, RandomLocation, RandomProperty};
pub use runner::{
    run_simulation, NoOpCallback, RunControl, RunnerError, SimulationEndReason, SimulationResult,
    TickCallback,
};
pub use tick::{run_tick, TickError, TickSummary};
