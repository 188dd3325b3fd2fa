use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::models::RawSchedule;
use super::provider::ScheduleProvider;

pub const DEFAULT_STATS_API_URL: &str = "https://statsapi.mlb.com";

/// Hydrations needed for live linescores (runners on base) and team ids.
const SCHEDULE_HYDRATE: &str =
    "game(content(summary,media(epg))),linescore(runners),flags,team,review";

/// Schedule provider backed by the public MLB StatsAPI.
#[derive(Clone)]
pub struct MlbStatsApi {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
}

impl MlbStatsApi {
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(MlbStatsApi {
            http,
            base_url: base_url
                .unwrap_or(DEFAULT_STATS_API_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Schedule endpoint for a single day (`date=MM/DD/YYYY`).
    pub fn schedule_url(&self, date: NaiveDate) -> Result<Url> {
        let day = date.format("%m/%d/%Y").to_string();
        Url::parse_with_params(
            &format!("{}/api/v1/schedule", self.base_url),
            &[
                ("language", "en"),
                ("sportId", "1"),
                ("hydrate", SCHEDULE_HYDRATE),
                ("date", day.as_str()),
            ],
        )
        .with_context(|| format!("Invalid StatsAPI base URL: {}", self.base_url))
    }
}

#[async_trait]
impl ScheduleProvider for MlbStatsApi {
    fn name(&self) -> &str {
        "MLB StatsAPI"
    }

    async fn fetch_schedule(&self, date: NaiveDate) -> Result<RawSchedule> {
        let url = self.schedule_url(date)?;
        debug!("Fetching schedule from {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .context("StatsAPI request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("StatsAPI error {}: {}", status, body);
        }

        resp.json::<RawSchedule>()
            .await
            .context("Failed to parse StatsAPI schedule response")
    }
}
