// Busy-agent classification

use crate::models::{AgentSnapshot, FleetSnapshot};

/// An agent is busy when it is enabled, connected and attached to a build.
pub fn is_busy(agent: &AgentSnapshot) -> bool {
    agent.enabled && agent.connected && agent.has_active_build
}

/// Number of busy agents in the decoded list. Ignores `total_count`.
pub fn count_busy(fleet: &FleetSnapshot) -> u32 {
    fleet.agents.iter().filter(|a| is_busy(a)).count() as u32
}
