//! `hoops_core`: deterministic basketball possession simulation.
//!
//! No IO. All randomness via the passed-in Rng.

pub mod box_score;
pub mod clock;
mod content;
pub mod defense;
mod engine;
mod error;
pub mod fouls;
mod id;
pub mod possession;
pub mod probability;
pub mod rebound;
pub mod shot;
pub mod stamina;
pub mod substitution;
pub mod turnover;
mod types;
mod validation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use box_score::{compile_box_score, BoxScore, PlayerBox, TeamBox};
pub use clock::GameClock;
pub use content::*;
pub use engine::{quarter_opening_offense, simulate_game, tip_off, tip_off_winner, GameSimulator};
pub use error::ConfigError;
pub use id::generate_game_id;
pub use possession::{run_intentional_foul, run_possession, OnCourt, Unit};
pub use stamina::StaminaTable;
pub use substitution::LineupManager;
pub use types::*;
pub use validation::{game_minutes, validate_content, validate_team};

#[cfg(test)]
mod tests;
