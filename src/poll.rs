// One poll cycle: fetch queue, fetch fleet, classify, format, emit.
// Failures end the cycle early and are logged; nothing propagates to the scheduler.

use chrono::Local;
use tracing::instrument;

use crate::classify::count_busy;
use crate::error::Result;
use crate::models::StatsRecord;
use crate::sink::Sinks;
use crate::teamcity::StatsSource;

/// What a single cycle achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Record written to every sink.
    Emitted(StatsRecord),
    /// Record built, but at least one sink write failed.
    PartiallyEmitted(StatsRecord),
    /// Fetching or decoding failed; nothing was written.
    Skipped,
}

impl CycleOutcome {
    pub fn record(&self) -> Option<&StatsRecord> {
        match self {
            CycleOutcome::Emitted(r) | CycleOutcome::PartiallyEmitted(r) => Some(r),
            CycleOutcome::Skipped => None,
        }
    }
}

/// Fetch both snapshots in order and build the record.
pub async fn fetch_record<S: StatsSource>(source: &S) -> Result<StatsRecord> {
    let queue = source.fetch_queue_count().await?;
    let fleet = source.fetch_fleet_snapshot().await?;
    let busy = count_busy(&fleet);
    Ok(StatsRecord::new(
        Local::now(),
        queue.queued_count,
        fleet.total_count,
        busy,
    ))
}

/// Run one cycle. Never fails; errors are logged to the error channel.
#[instrument(skip(source, sinks))]
pub async fn run_once<S: StatsSource>(source: &S, sinks: &Sinks, tick: u64) -> CycleOutcome {
    let record = match fetch_record(source).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                error_kind = e.kind(),
                operation = "fetch_stats",
                "Error fetching statistics"
            );
            return CycleOutcome::Skipped;
        }
    };

    let failures = sinks.emit(&record.to_line());
    if failures.is_empty() {
        tracing::debug!(
            queued = record.queued_count,
            total_agents = record.total_agents,
            busy_agents = record.busy_agents,
            "stats emitted"
        );
        return CycleOutcome::Emitted(record);
    }
    for e in &failures {
        tracing::error!(
            error = %e,
            error_kind = e.kind(),
            operation = "emit_stats",
            "Error writing statistics"
        );
    }
    CycleOutcome::PartiallyEmitted(record)
}
