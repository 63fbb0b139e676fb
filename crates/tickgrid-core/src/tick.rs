//! Tick cycle: the engine loop that drives the tickgrid simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Wake** -- recompute every avatar's busy flag for the current tick.
//!    Busy agents sit the tick out.
//!
//! 2. **Perception** -- build an [`AgentView`] for each idle agent: its own
//!    properties, what it perceives, and the actions currently possible.
//!
//! 3. **Decision** -- hand the views to the [`DecisionSource`] and collect
//!    one optional request per agent plus its edited property copy.
//!
//! 4. **Sync** -- push each agent's property edits through the avatar's
//!    writable-key policy. A violation aborts the tick.
//!
//! 5. **Resolution** -- in agent-id order, resolve each request against the
//!    world as it stands at that moment. Every dispatched request marks its
//!    agent busy and is recorded as the agent's current action.
//!
//! 6. **Advance** -- move the clock to the next tick.
//!
//! The cycle is deterministic given the same world, seed, and decisions.

use std::collections::BTreeMap;

use tickgrid_agents::ActionCatalog;
use tickgrid_types::{ActionKind, ActionResult, ObjectId};
use tickgrid_world::{AvatarError, CurrentAction, GridWorld, WorldError};
use tracing::{debug, info, warn};

use crate::decision::{AgentDecision, AgentView, DecisionSource};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent's property edits broke the writable-key policy.
    #[error("property sync failed for {agent_id}: {source}")]
    Avatar {
        /// The offending agent.
        agent_id: ObjectId,
        /// The underlying avatar error.
        source: AvatarError,
    },

    /// The decision source failed.
    #[error("decision error: {source}")]
    Decision {
        /// The underlying decision error.
        #[from]
        source: crate::decision::DecisionError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Agents that were still busy and skipped this tick.
    pub blocked_agents: Vec<ObjectId>,
    /// Result of every request resolved this tick.
    pub action_results: BTreeMap<ObjectId, ActionResult>,
}

/// Run one tick.
///
/// # Errors
///
/// Returns [`TickError::Avatar`] when an agent edits a property it may not,
/// [`TickError::Decision`] if the decision source fails, and
/// [`TickError::World`] on clock overflow. The clock does not advance on
/// error.
pub fn run_tick(
    world: &mut GridWorld,
    decision_source: &mut dyn DecisionSource,
    catalog: &ActionCatalog,
) -> Result<TickSummary, TickError> {
    let tick = world.curr_tick();

    // Phase 1: Wake
    let (blocked_agents, idle_agents) = wake(world, tick);

    // Phase 2: Perception
    let mut views = BTreeMap::new();
    for agent_id in &idle_agents {
        let Some(agent) = world.agent(agent_id) else {
            continue;
        };
        views.insert(
            agent_id.clone(),
            AgentView {
                properties: agent.properties(),
                state: world.perceive(agent_id)?,
                possible_actions: catalog.possible_actions(world, agent_id),
            },
        );
    }

    // Phase 3: Decision
    let decisions = decision_source.collect_decisions(tick, &views)?;

    // Phase 4: Sync
    let decisions = sync_properties(world, &views, decisions)?;

    // Phase 5: Resolution
    let mut action_results = BTreeMap::new();
    for (agent_id, decision) in decisions {
        let Some(request) = decision.request else {
            continue;
        };
        let Some(kind) = ActionKind::from_name(&request.action_name) else {
            warn!(tick, agent_id = %agent_id, action = %request.action_name, "Unknown action, ignored");
            continue;
        };
        let allowed = world
            .agent(&agent_id)
            .is_some_and(|agent| agent.action_set.contains(&kind));

        let result = if allowed {
            let result = catalog.apply(kind, world, &agent_id, &request.args);
            let duration = catalog.duration_in_ticks(kind, &request.args);
            if let Some(agent) = world.agent_mut(&agent_id) {
                agent.set_agent_busy(tick, duration);
            }
            result
        } else {
            ActionResult::NotAllowed { action: kind }
        };

        debug!(
            tick,
            agent_id = %agent_id,
            action = %kind,
            succeeded = result.succeeded(),
            result = result.message(),
            "Action resolved"
        );
        if let Some(agent) = world.agent_mut(&agent_id) {
            agent.record_action(CurrentAction {
                action: kind,
                args: request.args,
                started_at: tick,
                result: result.clone(),
            });
        }
        action_results.insert(agent_id, result);
    }

    // Phase 6: Advance
    world.advance_tick()?;

    info!(
        tick,
        idle = idle_agents.len(),
        blocked = blocked_agents.len(),
        resolved = action_results.len(),
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        blocked_agents,
        action_results,
    })
}

/// Split agents into blocked and idle for `tick`, updating their flags.
fn wake(world: &mut GridWorld, tick: u64) -> (Vec<ObjectId>, Vec<ObjectId>) {
    let mut blocked = Vec::new();
    let mut idle = Vec::new();
    for agent_id in world.agent_ids() {
        let Some(agent) = world.agent_mut(&agent_id) else {
            continue;
        };
        if agent.check_agent_busy(tick) {
            blocked.push(agent_id);
        } else {
            idle.push(agent_id);
        }
    }
    (blocked, idle)
}

/// Apply property edits, keeping only decisions from agents that were asked.
fn sync_properties(
    world: &mut GridWorld,
    views: &BTreeMap<ObjectId, AgentView>,
    decisions: BTreeMap<ObjectId, AgentDecision>,
) -> Result<BTreeMap<ObjectId, AgentDecision>, TickError> {
    let mut accepted = BTreeMap::new();
    for (agent_id, decision) in decisions {
        if !views.contains_key(&agent_id) {
            warn!(agent_id = %agent_id, "Decision for an agent that was not asked, ignored");
            continue;
        }
        let shape = world.shape();
        let Some(agent) = world.agent_mut(&agent_id) else {
            continue;
        };
        let changed = agent
            .set_agent_changed_properties(&decision.properties, shape)
            .map_err(|source| TickError::Avatar {
                agent_id: agent_id.clone(),
                source,
            })?;
        if !changed.is_empty() {
            debug!(agent_id = %agent_id, changed = ?changed, "Agent properties updated");
        }
        accepted.insert(agent_id, decision);
    }
    Ok(accepted)
}
