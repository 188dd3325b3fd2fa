use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sabermetrics::{BaseState, Score};

/// Every game of one calendar day, reduced to what the app needs.
/// This is the document persisted per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllSpark {
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Scheduled start. `None` when the upstream timestamp did not parse.
    #[serde(rename = "gameTime")]
    pub game_time: Option<DateTime<Utc>>,
    /// StatsAPI `gamePk`
    #[serde(rename = "mlbID")]
    pub mlb_id: u64,
    #[serde(rename = "mlbTVLink")]
    pub mlb_tv_link: String,
    pub status: Status,
    pub teams: Teams,
}

/// Fields that change as the game is played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub base_state: BaseState,
    pub count: Count,
    pub inning: u32,
    pub in_progress: bool,
    pub outs: u32,
    pub score: Score,
    pub top_of_inning: bool,
    /// `-1.0` when it could not be computed
    pub leverage_index: f64,
}

/// Balls and strikes on the current batter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub balls: u32,
    pub strikes: u32,
}

/// StatsAPI team ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teams {
    pub away: u64,
    pub home: u64,
}
