//! Decision source trait and the built-in sources.
//!
//! During the Decision phase of the tick cycle, the engine presents each
//! idle agent with an [`AgentView`] and collects an [`AgentDecision`] in
//! response. The [`DecisionSource`] trait abstracts where decisions come
//! from: a scripted bot, a human at a keyboard, a learned policy, or a test.
//!
//! A decision carries the agent's (possibly edited) copy of its own
//! properties next to the optional action request. The tick cycle pushes
//! those edits through the avatar's writable-key policy before any action
//! is resolved.

use std::collections::{BTreeMap, VecDeque};

use tickgrid_types::{ActionKind, ActionRequest, ObjectId, PropertyMap, PropertyValue};

/// Errors that can occur during the decision phase.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// An internal error in the decision source.
    #[error("decision source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// What an idle agent is shown before it decides.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    /// The agent's own properties, as a local copy it may edit.
    pub properties: PropertyMap,
    /// Everything the agent perceives, keyed by id.
    pub state: BTreeMap<ObjectId, PropertyMap>,
    /// Actions the agent may take that pass their check with default
    /// arguments.
    pub possible_actions: Vec<ActionKind>,
}

/// An agent's answer for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDecision {
    /// Action to perform, if any.
    pub request: Option<ActionRequest>,
    /// The agent's copy of its properties after its own edits.
    pub properties: PropertyMap,
}

impl AgentDecision {
    /// Do nothing and keep properties as they were.
    pub fn pass(view: &AgentView) -> Self {
        Self {
            request: None,
            properties: view.properties.clone(),
        }
    }
}

/// A source of agent decisions.
///
/// The engine calls [`collect_decisions`] once per tick with a view for every
/// idle agent. Agents missing from the returned map do nothing.
///
/// [`collect_decisions`]: DecisionSource::collect_decisions
pub trait DecisionSource {
    /// Collect decisions from the given agents.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] if the decision process fails entirely.
    fn collect_decisions(
        &mut self,
        tick: u64,
        views: &BTreeMap<ObjectId, AgentView>,
    ) -> Result<BTreeMap<ObjectId, AgentDecision>, DecisionError>;
}

/// A decision source where every agent always passes.
#[derive(Debug, Clone, Default)]
pub struct StubDecisionSource;

impl StubDecisionSource {
    /// Create a new stub decision source.
    pub const fn new() -> Self {
        Self
    }
}

impl DecisionSource for StubDecisionSource {
    fn collect_decisions(
        &mut self,
        _tick: u64,
        views: &BTreeMap<ObjectId, AgentView>,
    ) -> Result<BTreeMap<ObjectId, AgentDecision>, DecisionError> {
        Ok(views
            .iter()
            .map(|(id, view)| (id.clone(), AgentDecision::pass(view)))
            .collect())
    }
}

/// One queued step of a scripted agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptStep {
    /// Request to submit, if any.
    pub request: Option<ActionRequest>,
    /// Property edits to apply to the agent's copy first.
    pub edits: PropertyMap,
}

/// Replays queued steps per agent, one step each time the agent is idle.
///
/// Agents whose queue is empty pass.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisionSource {
    queues: BTreeMap<ObjectId, VecDeque<ScriptStep>>,
}

impl ScriptedDecisionSource {
    /// Create a source with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request for an agent.
    pub fn push_request(&mut self, agent_id: impl Into<ObjectId>, request: ActionRequest) {
        self.push_step(
            agent_id,
            ScriptStep {
                request: Some(request),
                edits: PropertyMap::new(),
            },
        );
    }

    /// Queue a property edit, submitted without an action.
    pub fn push_edit(
        &mut self,
        agent_id: impl Into<ObjectId>,
        key: impl Into<String>,
        value: PropertyValue,
    ) {
        self.push_step(
            agent_id,
            ScriptStep {
                request: None,
                edits: PropertyMap::from([(key.into(), value)]),
            },
        );
    }

    /// Queue an arbitrary step.
    pub fn push_step(&mut self, agent_id: impl Into<ObjectId>, step: ScriptStep) {
        self.queues.entry(agent_id.into()).or_default().push_back(step);
    }

    /// Steps still queued for an agent.
    pub fn remaining(&self, agent_id: &ObjectId) -> usize {
        self.queues.get(agent_id).map_or(0, VecDeque::len)
    }
}

impl DecisionSource for ScriptedDecisionSource {
    fn collect_decisions(
        &mut self,
        tick: u64,
        views: &BTreeMap<ObjectId, AgentView>,
    ) -> Result<BTreeMap<ObjectId, AgentDecision>, DecisionError> {
        let mut decisions = BTreeMap::new();
        for (id, view) in views {
            let Some(step) = self.queues.get_mut(id).and_then(VecDeque::pop_front) else {
                decisions.insert(id.clone(), AgentDecision::pass(view));
                continue;
            };
            let mut properties = view.properties.clone();
            properties.extend(step.edits);
            tracing::trace!(tick, agent_id = %id, request = ?step.request, "scripted step");
            decisions.insert(
                id.clone(),
                AgentDecision {
                    request: step.request,
                    properties,
                },
            );
        }
        Ok(decisions)
    }
}
