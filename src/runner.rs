// Monitoring lifecycle: Idle -> Running -> Stopped.
// A timer task spawns one poll cycle per tick; stop halts ticking and waits for in-flight cycles.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::config::MonitorConfig;
use crate::error::{Result, StatsError};
use crate::poll;
use crate::sink::{ConsoleSink, FileSink, Sinks};
use crate::teamcity::StatsSource;

const BANNER_RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunnerState::Idle => "idle",
            RunnerState::Running => "running",
            RunnerState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

pub struct Runner<S> {
    config: MonitorConfig,
    source: Arc<S>,
    console: Arc<ConsoleSink>,
    state: RunnerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    timer: Option<JoinHandle<()>>,
}

impl<S: StatsSource> Runner<S> {
    pub fn new(config: MonitorConfig, source: Arc<S>, console: Arc<ConsoleSink>) -> Self {
        Self {
            config,
            source,
            console,
            state: RunnerState::Idle,
            shutdown_tx: None,
            timer: None,
        }
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Validate config, truncate the output file, print the banner and start ticking.
    /// The first poll runs immediately. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.state != RunnerState::Idle {
            return Err(StatsError::AlreadyStarted);
        }
        self.config.validate()?;

        let file = self
            .config
            .output_file
            .as_ref()
            .map(|path| FileSink::initialize(path.clone()))
            .transpose()?;

        self.print_banner();

        let sinks = Arc::new(Sinks::new(self.console.clone(), file));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        self.timer = Some(spawn_timer(
            self.source.clone(),
            sinks,
            self.config.interval(),
            shutdown_rx,
        ));
        self.shutdown_tx = Some(shutdown_tx);
        self.state = RunnerState::Running;
        tracing::info!(
            server = %self.config.server_url,
            interval_secs = self.config.interval_secs,
            "monitoring started"
        );
        Ok(())
    }

    /// Stop scheduling new cycles and wait for in-flight ones. No-op once stopped.
    pub async fn stop(&mut self) {
        let previous = self.state;
        if previous == RunnerState::Stopped {
            return;
        }
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.timer.take()
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "timer task ended abnormally");
        }
        self.state = RunnerState::Stopped;
        tracing::info!(from = %previous, "monitoring stopped");
    }

    /// Start, run until `stop_signal` completes, then stop.
    pub async fn run_until<F: Future<Output = ()>>(mut self, stop_signal: F) -> Result<()> {
        self.start()?;
        self.say("Started monitoring");
        stop_signal.await;
        self.stop().await;
        self.say("Finished monitoring");
        Ok(())
    }

    fn print_banner(&self) {
        self.say("TeamCity Agent Statistics Monitor");
        self.say(&format!("Monitoring server: {}", self.config.server_url));
        self.say(&format!(
            "Update interval: {} seconds",
            self.config.interval_secs
        ));
        if let Some(path) = &self.config.output_file {
            self.say(&format!("Writing statistics to: {}", path.display()));
        }
        self.say("Press Enter or Ctrl+C to exit");
        self.say(BANNER_RULE);
    }

    fn say(&self, line: &str) {
        if let Err(e) = self.console.write_line(line) {
            tracing::warn!(error = %e, "console write failed");
        }
    }
}

fn spawn_timer<S: StatsSource>(
    source: Arc<S>,
    sinks: Arc<Sinks>,
    period: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycles = JoinSet::new();
        let mut tick_no: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => {
                    tracing::debug!("timer shutting down");
                    break;
                }
                _ = tick.tick() => {
                    let source = source.clone();
                    let sinks = sinks.clone();
                    let n = tick_no;
                    tick_no += 1;
                    cycles.spawn(async move {
                        poll::run_once(source.as_ref(), &sinks, n).await;
                    });
                }
                Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "poll cycle panicked");
                    }
                }
            }
        }

        if !cycles.is_empty() {
            tracing::debug!(in_flight = cycles.len(), "waiting for in-flight cycles");
        }
        while let Some(joined) = cycles.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "poll cycle panicked");
            }
        }
    })
}
