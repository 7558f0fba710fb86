// Agent fleet models

/// One registered agent as reported by a single poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentSnapshot {
    pub enabled: bool,
    pub connected: bool,
    /// Presence of a `build` element on the agent, regardless of its content.
    pub has_active_build: bool,
}

impl AgentSnapshot {
    pub fn new(enabled: bool, connected: bool, has_active_build: bool) -> Self {
        Self {
            enabled,
            connected,
            has_active_build,
        }
    }
}

/// Agents endpoint response.
///
/// `total_count` is the server's `count` field and is reported verbatim; it is
/// never reconciled with `agents.len()`, which depends on the field projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetSnapshot {
    pub total_count: u32,
    pub agents: Vec<AgentSnapshot>,
}
