use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::RawSchedule;

/// Source of a day's raw schedule.
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Fetch and decode the schedule covering `date`.
    async fn fetch_schedule(&self, date: NaiveDate) -> Result<RawSchedule>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
