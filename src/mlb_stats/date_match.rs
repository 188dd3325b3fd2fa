use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::models::{RawGame, RawSchedule};

/// Date format of `dates[].date` in the schedule payload.
pub const UPSTREAM_DATE_FMT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("no schedule entry found for {date}")]
    DateNotFound { date: NaiveDate },
}

/// Return the games of the first bucket that falls on the same calendar day
/// as `date`. Only year, month and day are compared, so any time-of-day or
/// offset carried by `date` is ignored.
///
/// Buckets whose date does not parse are skipped. When nothing matches,
/// including when every bucket was unparsable, the result is
/// [`MatchError::DateNotFound`].
pub fn games_for_date<'a, D: Datelike>(
    schedule: &'a RawSchedule,
    date: &D,
) -> Result<&'a [RawGame], MatchError> {
    let wanted = (date.year(), date.month(), date.day());

    schedule
        .dates
        .iter()
        .filter_map(|bucket| {
            NaiveDate::parse_from_str(&bucket.date, UPSTREAM_DATE_FMT)
                .ok()
                .map(|parsed| (parsed, bucket))
        })
        .find(|(parsed, _)| (parsed.year(), parsed.month(), parsed.day()) == wanted)
        .map(|(_, bucket)| bucket.games.as_slice())
        .ok_or_else(|| MatchError::DateNotFound {
            date: calendar_day(date),
        })
}

fn calendar_day<D: Datelike>(date: &D) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), date.day()).unwrap_or(NaiveDate::MIN)
}
