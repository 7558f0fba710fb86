// Output record: one CSV line per successful poll.

use chrono::{DateTime, Local, NaiveDateTime};

use crate::error::{Result, StatsError};

/// Local wall-clock timestamp with millisecond precision. Contains no commas.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const PARSE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const FIELD_SEPARATOR: char = ',';

/// Immutable result of one poll; the unit written to every sink.
///
/// `busy_agents` may exceed `total_agents`: the two come from independent server fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRecord {
    pub timestamp: DateTime<Local>,
    pub queued_count: u32,
    pub total_agents: u32,
    pub busy_agents: u32,
}

impl StatsRecord {
    pub fn new(timestamp: DateTime<Local>, queued_count: u32, total_agents: u32, busy_agents: u32) -> Self {
        Self {
            timestamp,
            queued_count,
            total_agents,
            busy_agents,
        }
    }

    /// `<timestamp>,<queued>,<total>,<busy>` without a trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.queued_count,
            self.total_agents,
            self.busy_agents,
            sep = FIELD_SEPARATOR,
        )
    }
}

/// A stats line read back from console output or the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub timestamp: NaiveDateTime,
    pub queued_count: u32,
    pub total_agents: u32,
    pub busy_agents: u32,
}

/// Parse a line produced by [`StatsRecord::to_line`]. Surrounding whitespace is ignored.
pub fn parse_line(line: &str) -> Result<ParsedLine> {
    let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
    let [timestamp, queued, total, busy] = fields.as_slice() else {
        return Err(decode_error(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };

    let timestamp = NaiveDateTime::parse_from_str(timestamp, PARSE_TIMESTAMP_FORMAT)
        .map_err(|e| decode_error(format!("timestamp {timestamp:?}: {e}")))?;

    Ok(ParsedLine {
        timestamp,
        queued_count: parse_count("queued", queued)?,
        total_agents: parse_count("total", total)?,
        busy_agents: parse_count("busy", busy)?,
    })
}

fn parse_count(field: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|e| decode_error(format!("{field} count {value:?}: {e}")))
}

fn decode_error(reason: String) -> StatsError {
    StatsError::Decode {
        endpoint: "stats line",
        reason,
    }
}
