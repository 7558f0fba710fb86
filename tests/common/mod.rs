// Shared test helpers

#![allow(dead_code)]

use agent_stats::error::{Result, StatsError};
use agent_stats::models::{AgentSnapshot, FleetSnapshot, ParsedLine, QueueSnapshot, parse_line};
use agent_stats::sink::ConsoleSink;
use agent_stats::teamcity::StatsSource;
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory stand-in for the TeamCity client.
#[derive(Default)]
pub struct FakeSource {
    pub queued: u32,
    pub total: u32,
    pub agents: Vec<AgentSnapshot>,
    /// The first N fleet fetches fail with HTTP 500.
    pub failing_fleet_calls: u32,
    pub fail_queue: bool,
    /// Simulated latency of the fleet fetch.
    pub fleet_delay: Option<Duration>,
    pub queue_calls: AtomicU32,
    pub fleet_calls: AtomicU32,
}

impl FakeSource {
    pub fn new(queued: u32, total: u32, agents: &[(bool, bool, bool)]) -> Self {
        Self {
            queued,
            total,
            agents: agents
                .iter()
                .map(|&(e, c, b)| AgentSnapshot::new(e, c, b))
                .collect(),
            ..Default::default()
        }
    }

    pub fn queue_calls(&self) -> u32 {
        self.queue_calls.load(Ordering::SeqCst)
    }

    pub fn fleet_calls(&self) -> u32 {
        self.fleet_calls.load(Ordering::SeqCst)
    }
}

impl StatsSource for FakeSource {
    async fn fetch_queue_count(&self) -> Result<QueueSnapshot> {
        self.queue_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queue {
            return Err(StatsError::UnexpectedStatus {
                endpoint: "build queue",
                status: 503,
            });
        }
        Ok(QueueSnapshot {
            queued_count: self.queued,
        })
    }

    async fn fetch_fleet_snapshot(&self) -> Result<FleetSnapshot> {
        let call = self.fleet_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fleet_delay {
            tokio::time::sleep(delay).await;
        }
        if call < self.failing_fleet_calls {
            return Err(StatsError::UnexpectedStatus {
                endpoint: "agents",
                status: 500,
            });
        }
        Ok(FleetSnapshot {
            total_count: self.total,
            agents: self.agents.clone(),
        })
    }
}

/// Cloneable `Write` target that keeps everything written to it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn console(&self) -> Arc<ConsoleSink> {
        Arc::new(ConsoleSink::new(Box::new(self.clone())))
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_string).collect()
    }

    /// Only the CSV stats lines, skipping banner output.
    pub fn stats_lines(&self) -> Vec<ParsedLine> {
        self.lines()
            .iter()
            .filter_map(|l| parse_line(l).ok())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// (queued, total, busy) of a parsed line.
pub fn counts(line: &ParsedLine) -> (u32, u32, u32) {
    (line.queued_count, line.total_agents, line.busy_agents)
}
