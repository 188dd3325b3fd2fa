pub mod client;
pub mod date_match;
pub mod models;
pub mod provider;

pub use client::MlbStatsApi;
pub use date_match::{games_for_date, MatchError};
pub use models::{RawGame, RawSchedule};
pub use provider::ScheduleProvider;
