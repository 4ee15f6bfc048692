use super::*;
use std::collections::{BTreeMap, BTreeSet};

fn distinct(lineup: &Lineup) -> bool {
    lineup.iter().collect::<BTreeSet<_>>().len() == LINEUP_SIZE
}

#[test]
fn lineups_are_five_distinct_rostered_players() {
    let content = test_content();
    let (home, away) = average_teams();
    let result = play(&home, &away, &content, 8);
    let roster = |side: Side| -> BTreeSet<&PlayerId> {
        let team = match side {
            Side::Home => &home,
            Side::Away => &away,
        };
        team.players.iter().map(|player| &player.name).collect()
    };
    for possession in result.possessions() {
        assert!(distinct(&possession.offense_lineup));
        assert!(distinct(&possession.defense_lineup));
        let offense = roster(possession.offense);
        let defense = roster(possession.offense.opponent());
        assert!(possession.offense_lineup.iter().all(|id| offense.contains(id)));
        assert!(possession.defense_lineup.iter().all(|id| defense.contains(id)));
    }
}

#[test]
fn stamina_and_lineups_hold_after_every_possession() {
    let content = test_content();
    let (home, away) = average_teams();
    let mut rng = make_rng();
    let mut sim = GameSimulator::new(&home, &away, &content, &mut rng).unwrap();
    while !sim.is_finished() {
        while sim.play_possession(&mut rng).is_some() {
            for side in Side::BOTH {
                let lineup = sim.lineup(side);
                let slots: BTreeSet<usize> = lineup.active().iter().copied().collect();
                assert_eq!(slots.len(), LINEUP_SIZE);
                for &slot in lineup.bench() {
                    assert!(!slots.contains(&slot));
                }
                for &value in sim.stamina(side).values() {
                    assert!((0.0..=100.0).contains(&value), "stamina {value}");
                }
            }
        }
        sim.end_quarter();
    }
}

#[test]
fn tired_starters_rotate_out() {
    let result = average_game(4);
    let substitutions: Vec<&SubstitutionEvent> = result
        .quarters
        .iter()
        .flat_map(|quarter| &quarter.substitutions)
        .collect();
    assert!(!substitutions.is_empty());
    for event in &substitutions {
        assert_ne!(event.player_out, event.player_in);
    }
    for side in Side::BOTH {
        let bench_minutes = result
            .box_score
            .get(side)
            .players
            .iter()
            .filter(|(id, _)| id.0.ends_with('2'))
            .map(|(_, line)| line.seconds_played)
            .sum::<f64>();
        assert!(bench_minutes > 0.0, "{side:?} bench never played");
    }
}

#[test]
fn fouled_out_players_never_return() {
    let content = test_content();
    let limit = u32::from(content.constants.fouls.foul_out_limit);
    // Weak defenders foul more, which makes foul-outs likely in a handful of games.
    let home = uniform_team("Home", 70);
    let away = uniform_team("Away", 20);
    for seed in 0..5 {
        let result = play(&home, &away, &content, seed);
        let mut fouls: BTreeMap<PlayerId, u32> = BTreeMap::new();
        let mut out: BTreeSet<PlayerId> = BTreeSet::new();
        for possession in result.possessions() {
            let on_floor = possession
                .offense_lineup
                .iter()
                .chain(&possession.defense_lineup);
            for id in on_floor {
                assert!(!out.contains(id), "{id} played after fouling out");
            }
            if let Some(foul) = &possession.foul {
                let count = fouls.entry(foul.fouler.clone()).or_default();
                *count += 1;
                if *count >= limit {
                    out.insert(foul.fouler.clone());
                }
            }
        }
        for (id, count) in &fouls {
            assert!(*count <= limit, "{id} committed {count} fouls");
        }
    }
}

#[test]
fn minutes_allotment_shapes_playing_time() {
    let content = test_content();
    let (mut home, away) = average_teams();
    for (slot, player) in home.players.iter().enumerate() {
        let minutes = if slot < LINEUP_SIZE { 40.0 } else { 8.0 };
        home.tactics
            .minutes_allotment
            .insert(player.name.clone(), minutes);
    }
    let result = play(&home, &away, &content, 14);
    let lines = &result.box_score.home.players;
    let starters: f64 = home.players[..LINEUP_SIZE]
        .iter()
        .map(|player| lines[&player.name].seconds_played)
        .sum();
    let reserves: f64 = home.players[LINEUP_SIZE..]
        .iter()
        .map(|player| lines[&player.name].seconds_played)
        .sum();
    assert!(starters > reserves, "starters {starters} vs reserves {reserves}");
}
