// TeamCity REST client: build queue size and agent fleet.

mod parse;

pub use parse::{AGENTS_ENDPOINT, QUEUE_ENDPOINT, parse_agents, parse_build_queue};

use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::instrument;

use crate::config::{HttpConfig, MonitorConfig};
use crate::error::{Result, StatsError};
use crate::models::{FleetSnapshot, QueueSnapshot};

const QUEUE_PATH: &str = "/app/rest/buildQueue";
const AGENTS_PATH: &str = "/app/rest/agents?fields=count,agent(id,enabled,connected,build)";

/// Source of the two snapshots a poll cycle needs.
///
/// Every call is a single attempt; implementations must not retry or cache.
pub trait StatsSource: Send + Sync + 'static {
    fn fetch_queue_count(&self) -> impl Future<Output = Result<QueueSnapshot>> + Send;

    fn fetch_fleet_snapshot(&self) -> impl Future<Output = Result<FleetSnapshot>> + Send;
}

pub struct TeamCityClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl TeamCityClient {
    pub fn new(config: &MonitorConfig, http_config: &HttpConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(http_config.user_agent.as_str())
            .timeout(http_config.request_timeout())
            .connect_timeout(http_config.connect_timeout())
            .build()
            .map_err(|e| StatsError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.server_url.clone(),
            auth_header: config.auth_header(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &'static str, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .map_err(|source| StatsError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| StatsError::Transport { endpoint, source })
    }
}

impl StatsSource for TeamCityClient {
    #[instrument(skip(self), fields(client = "teamcity", operation = "fetch_queue_count"))]
    async fn fetch_queue_count(&self) -> Result<QueueSnapshot> {
        let body = self.get(QUEUE_ENDPOINT, QUEUE_PATH).await?;
        parse_build_queue(&body)
    }

    #[instrument(skip(self), fields(client = "teamcity", operation = "fetch_fleet_snapshot"))]
    async fn fetch_fleet_snapshot(&self) -> Result<FleetSnapshot> {
        let body = self.get(AGENTS_ENDPOINT, AGENTS_PATH).await?;
        parse_agents(&body)
    }
}
