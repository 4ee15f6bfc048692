//! Checks on the production `content/*.json` tuning files.

use hoops_core::probability::{composite, event_probability};
use hoops_core::test_fixtures::{
    base_constants, base_probabilities, base_weights, uniform_player, uniform_team,
};
use hoops_core::{EngineContent, Event, Mechanic, Position};
use hoops_world::{game_rng, load_content};
use std::sync::OnceLock;

fn content_dir() -> String {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    format!("{manifest}/../../content")
}

fn production_content() -> &'static EngineContent {
    static CONTENT: OnceLock<EngineContent> = OnceLock::new();
    CONTENT.get_or_init(|| {
        load_content(&content_dir()).expect("load_content should succeed for production content")
    })
}

#[test]
fn content_loads_successfully() {
    let content = production_content();
    assert!(!content.content_version.is_empty());
}

#[test]
fn production_tuning_matches_test_fixtures() {
    let content = production_content();
    assert_eq!(content.constants, base_constants());
    assert_eq!(content.weights, base_weights());
    assert_eq!(content.probabilities, base_probabilities());
}

#[test]
fn average_player_has_average_composites() {
    let content = production_content();
    let player = uniform_player("Average", Position::SF, 50);
    for mechanic in Mechanic::ALL {
        let c = composite(&player, content.weights.get(mechanic));
        assert!((c - 50.0).abs() < 1e-9, "{mechanic:?} composite {c}");
    }
}

#[test]
fn every_curve_stays_in_unit_interval() {
    let content = production_content();
    for event in Event::ALL {
        let params = content.probabilities.get(event);
        for rating in [0.0, 25.0, 50.0, 75.0, 100.0] {
            let p = event_probability(params, rating).value;
            assert!((0.0..=1.0).contains(&p), "{event:?} at {rating}: {p}");
        }
    }
}

#[test]
fn production_content_plays_a_full_game() {
    let content = production_content();
    let home = uniform_team("Home", 50);
    let away = uniform_team("Away", 50);
    let mut rng = game_rng(12345);
    let result = hoops_core::simulate_game(&home, &away, content, &mut rng).unwrap();
    assert_eq!(result.quarters.len(), 4);
    let total = result.final_score.home + result.final_score.away;
    assert!((120..=300).contains(&total), "total points {total}");
}
