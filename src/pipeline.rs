use chrono::NaiveDate;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::mlb_stats::ScheduleProvider;
use crate::sabermetrics::is_sentinel;
use crate::transform::{optimus_prime, AllSpark};

/// Date format of requests and of stored document keys.
pub const DOC_DATE_FMT: &str = "%m-%d-%Y";

/// Identity attached to every log line of a request, plus where results go.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub function_name: String,
    pub version: String,
    pub project_id: String,
    pub collection: String,
}

pub fn doc_key(date: NaiveDate) -> String {
    date.format(DOC_DATE_FMT).to_string()
}

/// Fetch the day's schedule, reduce it, and persist it under its date.
/// Nothing is written unless every earlier step succeeded.
#[tracing::instrument(
    name = "game_data_by_day",
    skip_all,
    fields(
        date = %doc_key(date),
        db_collection = %ctx.collection,
        function_name = %ctx.function_name,
        project_id = %ctx.project_id,
        version = %ctx.version,
    )
)]
pub async fn game_data_by_day(
    provider: &dyn ScheduleProvider,
    store: &dyn Store,
    ctx: &RequestContext,
    date: NaiveDate,
) -> Result<AllSpark> {
    let start = Instant::now();

    let schedule = provider.fetch_schedule(date).await.map_err(|e| {
        error!(error = %format!("{:#}", e), "error getting the daily schedule from {}", provider.name());
        AppError::Fetch(e)
    })?;
    debug!(
        elapsed = ?start.elapsed(),
        buckets = schedule.dates.len(),
        "successfully fetched schedule"
    );

    let all = optimus_prime(&schedule, &date).map_err(|e| {
        error!(error = %e, "error matching requested date");
        AppError::from(e)
    })?;
    report_degraded_games(&all);
    debug!(elapsed = ?start.elapsed(), games = all.games.len(), "reduced schedule");

    let document = serde_json::to_value(&all)?;
    store
        .put(&ctx.collection, &doc_key(date), &document)
        .map_err(|e| {
            error!(error = %format!("{:#}", e), "error persisting games");
            AppError::Store(e)
        })?;

    info!(
        elapsed = ?start.elapsed(),
        games = all.games.len(),
        "stored games for {}",
        doc_key(date)
    );
    Ok(all)
}

/// Per-game failures are absorbed by the reducer; surface them here.
fn report_degraded_games(all: &AllSpark) {
    let untimed = all.games.iter().filter(|g| g.game_time.is_none()).count();
    if untimed > 0 {
        warn!("{} game(s) with an unparsable gameDate", untimed);
    }
    let no_leverage: Vec<u64> = all
        .games
        .iter()
        .filter(|g| g.status.in_progress && is_sentinel(g.status.leverage_index))
        .map(|g| g.mlb_id)
        .collect();
    if !no_leverage.is_empty() {
        warn!(games = ?no_leverage, "leverage index unavailable for in-progress game(s)");
    }
}
