//! Action resolution for the tickgrid simulation.
//!
//! Actions follow a two-phase contract. [`Action::is_possible`] is a pure
//! legality check against a shared borrow of the world; [`Action::mutate`]
//! re-validates against the world as it is at that moment and only then
//! applies effects. Every legality failure is a typed result variant, never
//! an error.
//!
//! The [`ActionCatalog`] maps each [`tickgrid_types::ActionKind`] to its
//! implementation and folds the per-action outcomes into
//! [`tickgrid_types::ActionResult`].

pub mod actions;
pub mod config;

pub use actions::{Action, ActionCatalog};
pub use config::ActionDurations;

#[cfg(test)]
mod test_support;
