//! Subset of the StatsAPI `/api/v1/schedule` payload that the reducer reads.
//!
//! Every field is optional on the wire: absent or `null` numbers decode to 0,
//! strings to "", and anything not listed here is ignored.

use serde::{Deserialize, Deserializer};

/// Decode `null` the same way as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top-level schedule response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawSchedule {
    #[serde(deserialize_with = "nullable")]
    pub dates: Vec<RawDateBucket>,
}

/// All games for one calendar date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawDateBucket {
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub games: Vec<RawGame>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGame {
    #[serde(deserialize_with = "nullable")]
    pub game_pk: u64,
    /// ISO-8601 start time, e.g. `2020-03-01T19:05:00Z`.
    #[serde(deserialize_with = "nullable")]
    pub game_date: String,
    #[serde(deserialize_with = "nullable")]
    pub teams: RawTeams,
    #[serde(deserialize_with = "nullable")]
    pub linescore: Linescore,
    #[serde(deserialize_with = "nullable")]
    pub status: RawGameStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGameStatus {
    #[serde(deserialize_with = "nullable")]
    pub detailed_state: String,
}

/// Detailed states that count as a game being played right now.
const ACTIVE_STATES: [&str; 2] = ["In Progress", "Manager Challenge"];

impl RawGameStatus {
    pub fn in_progress(&self) -> bool {
        ACTIVE_STATES.contains(&self.detailed_state.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTeams {
    #[serde(deserialize_with = "nullable")]
    pub away: RawTeamEntry,
    #[serde(deserialize_with = "nullable")]
    pub home: RawTeamEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTeamEntry {
    #[serde(deserialize_with = "nullable")]
    pub team: RawTeamRef,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTeamRef {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,
}

/// Live game state. Populated once a game starts; zeroed before that.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Linescore {
    #[serde(deserialize_with = "nullable")]
    pub balls: u32,
    #[serde(deserialize_with = "nullable")]
    pub strikes: u32,
    #[serde(deserialize_with = "nullable")]
    pub current_inning: u32,
    #[serde(deserialize_with = "nullable")]
    pub is_top_inning: bool,
    #[serde(deserialize_with = "nullable")]
    pub outs: u32,
    #[serde(deserialize_with = "nullable")]
    pub teams: LinescoreTeams,
    #[serde(deserialize_with = "nullable")]
    pub offense: Offense,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinescoreTeams {
    #[serde(deserialize_with = "nullable")]
    pub away: TeamLinescore,
    #[serde(deserialize_with = "nullable")]
    pub home: TeamLinescore,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TeamLinescore {
    #[serde(deserialize_with = "nullable")]
    pub runs: u32,
}

/// Runners currently on base for the batting team.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Offense {
    #[serde(deserialize_with = "nullable")]
    pub first: Runner,
    #[serde(deserialize_with = "nullable")]
    pub second: Runner,
    #[serde(deserialize_with = "nullable")]
    pub third: Runner,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Runner {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
}

impl Runner {
    pub fn on_base(&self) -> bool {
        self.id > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tolerates_unknown_and_missing_fields() {
        let raw = r#"{
            "copyright": "MLB",
            "totalGames": 1,
            "dates": [{
                "date": "2020-03-01",
                "totalGames": 1,
                "games": [{
                    "gamePk": 12345,
                    "gameDate": "2020-03-01T19:05:00Z",
                    "venue": {"id": 1, "name": "Somewhere"},
                    "teams": {"home": {"team": {"id": 111, "name": "Home"}}},
                    "linescore": {"currentInning": 5, "offense": {"first": {"id": 501, "fullName": "Runner"}}},
                    "status": {"detailedState": "In Progress", "statusCode": "I"}
                }]
            }]
        }"#;
        let schedule: RawSchedule = serde_json::from_str(raw).unwrap();
        let game = &schedule.dates[0].games[0];
        assert_eq!(game.game_pk, 12345);
        assert_eq!(game.teams.home.team.id, 111);
        assert_eq!(game.teams.away.team.id, 0);
        assert_eq!(game.linescore.current_inning, 5);
        assert_eq!(game.linescore.outs, 0);
        assert!(game.linescore.offense.first.on_base());
        assert!(!game.linescore.offense.second.on_base());
    }

    #[test]
    fn test_decode_treats_null_as_absent() {
        let raw = r#"{"dates": [{"date": null, "games": [{
            "gamePk": null,
            "gameDate": null,
            "linescore": {"balls": null, "offense": null, "teams": {"home": null}},
            "status": null
        }]}]}"#;
        let schedule: RawSchedule = serde_json::from_str(raw).unwrap();
        let bucket = &schedule.dates[0];
        assert_eq!(bucket.date, "");
        assert_eq!(bucket.games[0], RawGame::default());
    }

    #[test]
    fn test_empty_payload() {
        let schedule: RawSchedule = serde_json::from_str("{}").unwrap();
        assert!(schedule.dates.is_empty());
        let schedule: RawSchedule = serde_json::from_str(r#"{"dates": null}"#).unwrap();
        assert!(schedule.dates.is_empty());
    }

    #[test]
    fn test_in_progress_allow_list() {
        let status = |s: &str| RawGameStatus {
            detailed_state: s.to_string(),
        };
        assert!(status("In Progress").in_progress());
        assert!(status("Manager Challenge").in_progress());
        assert!(!status("Final").in_progress());
        assert!(!status("in progress").in_progress());
        assert!(!status("Warmup").in_progress());
        assert!(!status("").in_progress());
    }

    #[test]
    fn test_runner_presence() {
        assert!(Runner { id: 7 }.on_base());
        assert!(!Runner { id: 0 }.on_base());
        assert!(!Runner { id: -1 }.on_base());
    }
}
