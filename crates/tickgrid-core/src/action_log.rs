//! Per-tick log of what every agent is doing.
//!
//! [`ActionLog`] is a pull-based observer: after each tick it reads
//! [`tickgrid_world::AgentAvatar::current_action`] from every avatar and
//! stores one row per agent. It never changes the world. Rows can be
//! written out as `;`-delimited CSV.

use std::io::Write;

use tickgrid_types::{ActionKind, ObjectId};
use tickgrid_world::GridWorld;

use crate::runner::TickCallback;
use crate::tick::TickSummary;

/// CSV column delimiter.
pub const DELIMITER: char = ';';

/// One agent's current action as seen after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogRow {
    /// Tick the row was taken after.
    pub tick: u64,
    /// The agent.
    pub agent_id: ObjectId,
    /// The agent's most recent action, if it has taken one.
    pub action: Option<ActionKind>,
    /// Tick that action started.
    pub started_at: Option<u64>,
    /// Whether that action succeeded.
    pub succeeded: Option<bool>,
}

/// Collects [`ActionLogRow`]s tick by tick.
#[derive(Debug, Clone, Default)]
pub struct ActionLog {
    rows: Vec<ActionLogRow>,
}

impl ActionLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Every row so far.
    pub fn rows(&self) -> &[ActionLogRow] {
        &self.rows
    }

    /// Rows taken after `tick`.
    pub fn rows_for(&self, tick: u64) -> impl Iterator<Item = &ActionLogRow> {
        self.rows.iter().filter(move |row| row.tick == tick)
    }

    /// Take one row per agent from the world.
    pub fn record(&mut self, tick: u64, world: &GridWorld) {
        for (agent_id, agent) in world.registered_agents() {
            let current = agent.current_action();
            let row = ActionLogRow {
                tick,
                agent_id: agent_id.clone(),
                action: current.map(|c| c.action),
                started_at: current.map(|c| c.started_at),
                succeeded: current.map(|c| c.result.succeeded()),
            };
            if let Some(c) = current.filter(|c| c.started_at == tick) {
                tracing::info!(
                    tick,
                    agent_id = %agent_id,
                    action = %c.action,
                    result = c.result.message(),
                    "Agent action"
                );
            }
            self.rows.push(row);
        }
    }

    /// Write all rows as CSV with a header line.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_csv<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        let d = DELIMITER;
        writeln!(out, "tick{d}agent_id{d}action{d}started_at{d}succeeded")?;
        for row in &self.rows {
            let action = row.action.map(ActionKind::name).unwrap_or_default();
            let started_at = row.started_at.map(|t| t.to_string()).unwrap_or_default();
            let succeeded = row.succeeded.map(|s| s.to_string()).unwrap_or_default();
            writeln!(
                out,
                "{}{d}{}{d}{action}{d}{started_at}{d}{succeeded}",
                row.tick, row.agent_id
            )?;
        }
        Ok(())
    }
}

impl TickCallback for ActionLog {
    fn on_tick(&mut self, summary: &TickSummary, world: &GridWorld) {
        self.record(summary.tick, world);
    }
}
