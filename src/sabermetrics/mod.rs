pub mod leverage;

pub use leverage::{is_sentinel, leverage_or_sentinel, BaseState, HalfInning, Score};
