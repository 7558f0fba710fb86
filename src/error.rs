// Error taxonomy for configuration, polling and output.

use std::path::PathBuf;

/// Every failure the monitor can report.
///
/// `Config`, `OutputInit` and `AlreadyStarted` are fatal and only occur before
/// monitoring begins. The rest are contained within a single poll cycle.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("{0}")]
    Config(String),

    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    UnexpectedStatus { endpoint: &'static str, status: u16 },

    #[error("malformed {endpoint} response: {reason}")]
    Decode {
        endpoint: &'static str,
        reason: String,
    },

    #[error("{sink} write failed: {source}")]
    SinkWrite {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("error initializing output file {}: {source}", path.display())]
    OutputInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("monitoring has already been started")]
    AlreadyStarted,
}

impl StatsError {
    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StatsError::Config(_) => "config",
            StatsError::Transport { .. } => "transport",
            StatsError::UnexpectedStatus { .. } => "unexpected_status",
            StatsError::Decode { .. } => "decode",
            StatsError::SinkWrite { .. } => "sink_write",
            StatsError::OutputInit { .. } => "output_init",
            StatsError::AlreadyStarted => "already_started",
        }
    }

    /// True for errors that abort startup rather than a single cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StatsError::Config(_) | StatsError::OutputInit { .. } | StatsError::AlreadyStarted
        )
    }
}

pub type Result<T, E = StatsError> = std::result::Result<T, E>;
