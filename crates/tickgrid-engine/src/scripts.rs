//! Turns the `scripts` config section into a decision source.
//!
//! Scripts are keyed by agent name in the config file; the world knows
//! agents by id. Names that match no agent are logged and skipped.

use std::collections::BTreeMap;

use tickgrid_core::ScriptedDecisionSource;
use tickgrid_types::{ActionRequest, ObjectId};
use tickgrid_world::GridWorld;
use tracing::{info, warn};

/// Queue every configured request under the id of the agent with that name.
pub fn scripted_source(
    scripts: &BTreeMap<String, Vec<ActionRequest>>,
    world: &GridWorld,
) -> ScriptedDecisionSource {
    let ids_by_name: BTreeMap<&str, &ObjectId> = world
        .registered_agents()
        .iter()
        .map(|(id, agent)| (agent.name.as_str(), id))
        .collect();

    let mut source = ScriptedDecisionSource::new();
    for (name, requests) in scripts {
        let Some(&agent_id) = ids_by_name.get(name.as_str()) else {
            warn!(agent_name = %name, "Script names no agent, skipping");
            continue;
        };
        for request in requests {
            source.push_request(agent_id.clone(), request.clone());
        }
        info!(agent_name = %name, agent_id = %agent_id, steps = requests.len(), "Script loaded");
    }
    source
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tickgrid_core::{AgentSpec, WorldFactory, WorldSettings};
    use tickgrid_types::{ActionArgs, ActionKind, GridShape, Location};

    use super::*;

    #[test]
    fn scripts_follow_agent_names() {
        let mut factory = WorldFactory::new(WorldSettings {
            shape: GridShape {
                width: 3,
                height: 3,
            },
            seed: 1,
        });
        factory
            .add_agent(AgentSpec::new("Bob", Location::new(0, 0)))
            .unwrap();
        let world = factory.build().unwrap();

        let idle = ActionRequest::new(ActionKind::Idle, ActionArgs::default());
        let scripts = BTreeMap::from([
            ("Bob".to_owned(), vec![idle.clone(), idle.clone()]),
            ("nobody".to_owned(), vec![idle]),
        ]);
        let source = scripted_source(&scripts, &world);

        assert_eq!(source.remaining(&ObjectId::from("bob_0")), 2);
        assert_eq!(source.remaining(&ObjectId::from("nobody")), 0);
    }
}
