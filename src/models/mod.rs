// Snapshot and output record models

mod fleet;
mod queue;
mod record;

pub use fleet::{AgentSnapshot, FleetSnapshot};
pub use queue::QueueSnapshot;
pub use record::{ParsedLine, StatsRecord, TIMESTAMP_FORMAT, parse_line};
