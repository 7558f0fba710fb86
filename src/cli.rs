// Command-line surface: <interval_seconds> <teamcity_url> <teamcity_token> [output_file_path]

use std::path::PathBuf;

use clap::Parser;

use crate::config::MonitorConfig;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "agent-stats",
    version,
    about = "Poll a TeamCity server and print queued builds, total agents and busy agents as CSV"
)]
pub struct Cli {
    /// Seconds between polls; must be a positive integer.
    #[arg(allow_negative_numbers = true)]
    pub interval_seconds: String,
    /// TeamCity server root URL, e.g. https://teamcity.example.com
    pub teamcity_url: String,
    /// Access token sent as `Authorization: Bearer <token>`.
    pub teamcity_token: String,
    /// Also append every stats line to this file (truncated at startup).
    pub output_file_path: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Result<MonitorConfig> {
        MonitorConfig::from_args(
            &self.interval_seconds,
            self.teamcity_url,
            self.teamcity_token,
            self.output_file_path,
        )
    }
}
