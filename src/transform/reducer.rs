//! Reduce raw StatsAPI games into the compact `AllSpark` model.

use chrono::{DateTime, Datelike, Utc};

use super::models::{AllSpark, Count, Game, Status, Teams};
use crate::mlb_stats::{games_for_date, MatchError, RawGame, RawSchedule};
use crate::sabermetrics::{leverage_or_sentinel, BaseState, HalfInning, Score};

/// MLB.TV deep link for a game.
pub fn mlb_tv_link(game_pk: u64) -> String {
    format!("https://www.mlb.com/tv/g{}", game_pk)
}

/// Match `date` in the schedule and reduce that day's games.
pub fn optimus_prime<D: Datelike>(schedule: &RawSchedule, date: &D) -> Result<AllSpark, MatchError> {
    let games = games_for_date(schedule, date)?;
    Ok(AllSpark {
        games: reduce_games(games),
    })
}

/// One `Game` per raw game, in upstream order.
pub fn reduce_games(games: &[RawGame]) -> Vec<Game> {
    games.iter().map(reduce_game).collect()
}

pub fn reduce_game(raw: &RawGame) -> Game {
    let ls = &raw.linescore;

    let base_state = BaseState {
        first: ls.offense.first.on_base(),
        second: ls.offense.second.on_base(),
        third: ls.offense.third.on_base(),
    };
    let score = Score {
        away: ls.teams.away.runs,
        home: ls.teams.home.runs,
    };
    let half = HalfInning {
        inning: ls.current_inning,
        top_of_inning: ls.is_top_inning,
    };

    Game {
        game_time: parse_game_time(&raw.game_date),
        mlb_id: raw.game_pk,
        mlb_tv_link: mlb_tv_link(raw.game_pk),
        status: Status {
            base_state,
            count: Count {
                balls: ls.balls,
                strikes: ls.strikes,
            },
            inning: ls.current_inning,
            in_progress: raw.status.in_progress(),
            outs: ls.outs,
            score,
            top_of_inning: ls.is_top_inning,
            leverage_index: leverage_or_sentinel(base_state, score, half, ls.outs),
        },
        teams: Teams {
            away: raw.teams.away.team.id,
            home: raw.teams.home.team.id,
        },
    }
}

fn parse_game_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
