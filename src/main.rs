use agent_stats::*;
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the banner and stats lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };
    let app_config = config::AppConfig::load()?;

    if let Err(e) = run(cli, app_config).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: cli::Cli, app_config: config::AppConfig) -> error::Result<()> {
    let monitor_config = cli.into_config()?;
    let client = Arc::new(teamcity::TeamCityClient::new(
        &monitor_config,
        &app_config.http,
    )?);
    let console = Arc::new(sink::ConsoleSink::stdout());

    runner::Runner::new(monitor_config, client, console)
        .run_until(shutdown::wait_for_stop(true))
        .await
}
