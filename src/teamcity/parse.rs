// Response decoding for the two REST resources we read.

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::error::{Result, StatsError};
use crate::models::{AgentSnapshot, FleetSnapshot, QueueSnapshot};

pub const QUEUE_ENDPOINT: &str = "build queue";
pub const AGENTS_ENDPOINT: &str = "agents";

#[derive(Debug, Deserialize)]
struct BuildQueueBody {
    count: u32,
}

#[derive(Debug, Deserialize)]
struct AgentsBody {
    count: u32,
    #[serde(default)]
    agent: Option<Vec<AgentBody>>,
}

#[derive(Debug, Deserialize)]
struct AgentBody {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    connected: bool,
    /// Only presence matters; the running build's fields are not read.
    #[serde(default)]
    build: Option<IgnoredAny>,
}

/// Decode `GET /app/rest/buildQueue`.
pub fn parse_build_queue(body: &str) -> Result<QueueSnapshot> {
    let parsed: BuildQueueBody = decode(QUEUE_ENDPOINT, body)?;
    Ok(QueueSnapshot {
        queued_count: parsed.count,
    })
}

/// Decode `GET /app/rest/agents?fields=count,agent(id,enabled,connected,build)`.
pub fn parse_agents(body: &str) -> Result<FleetSnapshot> {
    let parsed: AgentsBody = decode(AGENTS_ENDPOINT, body)?;
    let agents = parsed
        .agent
        .unwrap_or_default()
        .into_iter()
        .map(|a| AgentSnapshot::new(a.enabled, a.connected, a.build.is_some()))
        .collect();
    Ok(FleetSnapshot {
        total_count: parsed.count,
        agents,
    })
}

fn decode<'a, T: Deserialize<'a>>(endpoint: &'static str, body: &'a str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| StatsError::Decode {
        endpoint,
        reason: e.to_string(),
    })
}
