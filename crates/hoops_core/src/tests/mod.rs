use super::*;
use crate::test_fixtures::{base_content, make_rng, uniform_team};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod determinism;
mod reconciliation;
mod rotation;

// --- Shared test helpers ------------------------------------------------

fn test_content() -> EngineContent {
    base_content()
}

fn average_teams() -> (Team, Team) {
    (uniform_team("Home", 50), uniform_team("Away", 50))
}

fn play(home: &Team, away: &Team, content: &EngineContent, seed: u64) -> GameResult {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    simulate_game(home, away, content, &mut rng).unwrap()
}

/// A full game between two uniform-50 rosters on production tuning.
fn average_game(seed: u64) -> GameResult {
    let content = test_content();
    let (home, away) = average_teams();
    play(&home, &away, &content, seed)
}

fn points_for(result: &GameResult, side: Side) -> u32 {
    result
        .possessions()
        .filter(|possession| possession.offense == side)
        .map(|possession| possession.points_scored)
        .sum()
}
