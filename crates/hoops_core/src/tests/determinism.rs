use super::*;

#[test]
fn identical_seeds_produce_identical_games() {
    assert_eq!(
        average_game(42),
        average_game(42),
        "identical seeds must produce identical game results"
    );
}

#[test]
fn identical_seeds_serialize_identically() {
    let a = serde_json::to_string(&average_game(7)).unwrap();
    let b = serde_json::to_string(&average_game(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seeds_produce_different_games() {
    let a = average_game(42);
    let b = average_game(1234);
    assert_ne!(a.game_id, b.game_id);
    let log = |result: &GameResult| -> Vec<(PossessionOutcome, u32)> {
        result
            .possessions()
            .map(|p| (p.outcome, p.clock_seconds))
            .collect()
    };
    assert_ne!(log(&a), log(&b), "different seeds should diverge");
}

#[test]
fn stepping_by_hand_matches_simulate_game() {
    let content = test_content();
    let (home, away) = average_teams();
    let mut rng = make_rng();
    let mut sim = GameSimulator::new(&home, &away, &content, &mut rng).unwrap();
    while !sim.is_finished() {
        while sim.play_possession(&mut rng).is_some() {}
        sim.end_quarter();
    }
    let stepped = sim.finish(&mut rng);
    assert_eq!(stepped, play(&home, &away, &content, 42));
}
