use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, StatsError};
use crate::version;

/// What to monitor and where to write it. Built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub interval_secs: u64,
    /// Server root without a trailing slash.
    pub server_url: String,
    pub auth_token: String,
    pub output_file: Option<PathBuf>,
}

impl MonitorConfig {
    pub fn new(
        interval_secs: i64,
        server_url: impl Into<String>,
        auth_token: impl Into<String>,
        output_file: Option<PathBuf>,
    ) -> Result<Self> {
        if interval_secs <= 0 {
            return Err(StatsError::Config(format!(
                "Interval must be a positive number of seconds, got {interval_secs}"
            )));
        }
        let mut server_url = server_url.into();
        if server_url.ends_with('/') {
            server_url.pop();
        }
        let config = Self {
            interval_secs: interval_secs as u64,
            server_url,
            auth_token: auth_token.into(),
            output_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Like [`MonitorConfig::new`] but takes the interval as typed on the command line.
    pub fn from_args(
        interval: &str,
        server_url: impl Into<String>,
        auth_token: impl Into<String>,
        output_file: Option<PathBuf>,
    ) -> Result<Self> {
        let interval_secs: i64 = interval.trim().parse().map_err(|_| {
            StatsError::Config(format!("Interval must be a valid integer, got {interval:?}"))
        })?;
        Self::new(interval_secs, server_url, auth_token, output_file)
    }

    pub fn validate(&self) -> Result<()> {
        ensure(
            self.interval_secs > 0,
            "Interval must be a positive number of seconds",
        )?;
        ensure(!self.server_url.is_empty(), "server URL must be non-empty")?;
        ensure(!self.auth_token.is_empty(), "auth token must be non-empty")?;
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Value for the `Authorization` header.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.auth_token)
    }
}

fn ensure(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(StatsError::Config(message.to_string()))
    }
}

/// Optional transport tuning, read from the TOML file named by `CONFIG_FILE`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "version::user_agent")]
    pub user_agent: String,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: version::user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AppConfig {
    /// Defaults unless `CONFIG_FILE` points at a TOML file.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => {
                let s = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading {}: {}", path, e))?;
                Self::load_from_str(&s)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.http.request_timeout_secs > 0,
            "http.request_timeout_secs must be > 0, got {}",
            self.http.request_timeout_secs
        );
        anyhow::ensure!(
            self.http.connect_timeout_secs > 0,
            "http.connect_timeout_secs must be > 0, got {}",
            self.http.connect_timeout_secs
        );
        anyhow::ensure!(
            !self.http.user_agent.is_empty(),
            "http.user_agent must be non-empty"
        );
        Ok(())
    }
}
