//! Leverage index for a single baseball game state.
//!
//! Leverage measures how much the next plate appearance can move the game:
//! the expected absolute change in home win probability across the possible
//! outcomes of one PA, divided by the league-average swing. A value of 1.0 is
//! an average situation; late, close, runners-on situations climb well above
//! 3.0 while blowouts fall toward 0.0.
//!
//! Model:
//! - **Win probability**: normal model of the final run margin, approximated
//!   with a logistic. The mean is the current differential plus the run
//!   expectancy of the current base-out state for the batting team plus
//!   ~0.5 runs for each remaining half-inning. The variance grows with the
//!   number of half-innings left.
//! - **PA outcomes**: out, walk, single, double, home run at league-average
//!   rates with standard runner advancement.
//! - **Terminal states**: walk-offs and completed games resolve to 0.0 / 1.0.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stored in place of a leverage index when it cannot be computed.
pub const LEVERAGE_SENTINEL: f64 = -1.0;

/// Average absolute win-probability swing of a plate appearance.
const MEAN_ABS_SWING: f64 = 0.035;

/// Expected runs per half-inning from a fresh state (RE24 empty, 0 outs).
const RUNS_PER_HALF: f64 = 0.481;
/// Run variance of a full half-inning.
const RUN_VARIANCE_PER_HALF: f64 = 1.0;
/// Logistic approximation of the standard normal CDF.
const PROBIT_SCALE: f64 = 1.702;

/// Half-innings in regulation (top 1st = 0 ... bottom 9th = 17).
const REGULATION_HALVES: u32 = 18;

/// Run expectancy for the rest of the half-inning (MLB 2010–2015).
/// Rows: outs 0..=2. Columns: `BaseState::index()` 0..=7.
const RUN_EXPECTANCY: [[f64; 8]; 3] = [
    // empty  1B     2B     1B2B   3B     1B3B   2B3B   loaded
    [0.481, 0.859, 1.100, 1.437, 1.350, 1.784, 1.964, 2.292],
    [0.254, 0.509, 0.664, 0.884, 0.950, 1.130, 1.376, 1.541],
    [0.098, 0.214, 0.305, 0.429, 0.353, 0.478, 0.580, 0.752],
];

/// League-average plate appearance outcome rates.
const OUTCOMES: [(Outcome, f64); 5] = [
    (Outcome::Out, 0.68),
    (Outcome::Walk, 0.09),
    (Outcome::Single, 0.15),
    (Outcome::Double, 0.05),
    (Outcome::HomeRun, 0.03),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeverageError {
    #[error("outs must be 0, 1 or 2 (got {0})")]
    InvalidOuts(u32),
    #[error("inning must be 1 or later (got {0})")]
    InvalidInning(u32),
}

/// Which bases currently hold a runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseState {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

impl BaseState {
    /// Binary encoding 0–7: first = 1, second = 2, third = 4.
    pub fn index(self) -> usize {
        usize::from(self.first) | usize::from(self.second) << 1 | usize::from(self.third) << 2
    }

    fn runners(self) -> u32 {
        u32::from(self.first) + u32::from(self.second) + u32::from(self.third)
    }
}

/// Runs scored by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub away: u32,
    pub home: u32,
}

impl Score {
    /// Home minus away.
    pub fn differential(self) -> i64 {
        i64::from(self.home) - i64::from(self.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfInning {
    /// 1-based inning number.
    pub inning: u32,
    pub top_of_inning: bool,
}

impl HalfInning {
    /// Zero-based half-inning index: top of the 1st = 0, bottom of the 9th = 17.
    pub fn index(self) -> Option<u32> {
        let top = self.inning.checked_mul(2)?.checked_sub(2)?;
        Some(if self.top_of_inning { top } else { top + 1 })
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Out,
    Walk,
    Single,
    Double,
    HomeRun,
}

/// Base/out/score snapshot the win-probability model works on.
#[derive(Debug, Clone, Copy)]
struct GameState {
    half: u32,
    outs: u32,
    bases: BaseState,
    /// Home minus away.
    diff: i64,
    /// Set when the third out ends a bottom half of the 9th or later with a leader.
    over: bool,
}

impl GameState {
    fn top(&self) -> bool {
        self.half % 2 == 0
    }

    /// Credit runs to the batting team.
    fn score(&mut self, runs: u32) {
        if self.top() {
            self.diff -= i64::from(runs);
        } else {
            self.diff += i64::from(runs);
        }
    }

    fn apply(mut self, outcome: Outcome) -> GameState {
        let b = self.bases;
        match outcome {
            Outcome::Out => {
                self.outs += 1;
                if self.outs >= 3 {
                    let final_inning = self.half + 1 >= REGULATION_HALVES;
                    self.over = !self.top() && final_inning && self.diff != 0;
                    self.half += 1;
                    self.outs = 0;
                    self.bases = BaseState::default();
                }
            }
            Outcome::Walk => {
                let forced_home = b.first && b.second && b.third;
                self.bases = BaseState {
                    first: true,
                    second: b.second || b.first,
                    third: b.third || (b.first && b.second),
                };
                self.score(u32::from(forced_home));
            }
            Outcome::Single => {
                self.bases = BaseState {
                    first: true,
                    second: b.first,
                    third: false,
                };
                self.score(u32::from(b.second) + u32::from(b.third));
            }
            Outcome::Double => {
                self.bases = BaseState {
                    first: false,
                    second: true,
                    third: b.first,
                };
                self.score(u32::from(b.second) + u32::from(b.third));
            }
            Outcome::HomeRun => {
                self.bases = BaseState::default();
                self.score(b.runners() + 1);
            }
        }
        self
    }

    /// Final result when the game is already decided in this state.
    fn decided(&self) -> Option<f64> {
        let final_inning_or_later = self.half + 1 >= REGULATION_HALVES;
        if !self.top() && final_inning_or_later && self.diff > 0 {
            // Walk-off, or home already ahead once the bottom half begins.
            return Some(1.0);
        }
        if self.over {
            return Some(if self.diff > 0 { 1.0 } else { 0.0 });
        }
        None
    }

    /// Half-innings still to be played after the current one, as (home, away).
    fn remaining_halves(&self) -> (u32, u32) {
        let after = if self.half + 1 < REGULATION_HALVES {
            REGULATION_HALVES - 1 - self.half
        } else if self.top() {
            1
        } else {
            0
        };
        let (next_side, other_side) = (after.div_ceil(2), after / 2);
        if self.top() {
            (next_side, other_side)
        } else {
            (other_side, next_side)
        }
    }

    fn home_win_probability(&self) -> f64 {
        if let Some(p) = self.decided() {
            return p;
        }
        let current = RUN_EXPECTANCY[self.outs as usize][self.bases.index()];
        let (home_halves, away_halves) = self.remaining_halves();

        let batting = if self.top() { -current } else { current };
        let mean = self.diff as f64
            + batting
            + RUNS_PER_HALF * (f64::from(home_halves) - f64::from(away_halves));
        let variance = RUN_VARIANCE_PER_HALF
            * (f64::from(home_halves + away_halves) + current / RUNS_PER_HALF);

        sigmoid(PROBIT_SCALE * mean / variance.max(0.05).sqrt())
    }
}

/// Leverage index of the next plate appearance.
///
/// Errors when `outs` is outside 0..=2 (e.g. a record captured as the third
/// out is recorded) or when the inning has not started.
pub fn leverage_index(
    base_state: BaseState,
    score: Score,
    half: HalfInning,
    outs: u32,
) -> Result<f64, LeverageError> {
    if outs > 2 {
        return Err(LeverageError::InvalidOuts(outs));
    }
    let half_index = half
        .index()
        .ok_or(LeverageError::InvalidInning(half.inning))?;

    let state = GameState {
        half: half_index,
        outs,
        bases: base_state,
        diff: score.differential(),
        over: false,
    };
    let before = state.home_win_probability();
    let swing: f64 = OUTCOMES
        .iter()
        .map(|&(outcome, rate)| {
            let after = state.apply(outcome).home_win_probability();
            rate * (after - before).abs()
        })
        .sum();

    Ok(swing / MEAN_ABS_SWING)
}

/// Whether a stored leverage value is the failure sentinel.
pub fn is_sentinel(leverage: f64) -> bool {
    leverage < 0.0
}

/// [`leverage_index`] with failures folded into [`LEVERAGE_SENTINEL`].
pub fn leverage_or_sentinel(
    base_state: BaseState,
    score: Score,
    half: HalfInning,
    outs: u32,
) -> f64 {
    leverage_index(base_state, score, half, outs).unwrap_or(LEVERAGE_SENTINEL)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
