use super::*;

#[test]
fn final_score_matches_possession_ledger_and_box_score() {
    for seed in [1, 2, 3] {
        let result = average_game(seed);
        for side in Side::BOTH {
            let ledger = points_for(&result, side);
            assert_eq!(*result.final_score.get(side), ledger);
            assert_eq!(result.box_score.get(side).points(), ledger);
            let by_quarter: u32 = result.quarters.iter().map(|q| *q.points.get(side)).sum();
            assert_eq!(by_quarter, ledger);
        }
        assert_eq!(
            result.quarters.last().map(|q| q.score_after),
            Some(result.final_score)
        );
    }
}

#[test]
fn box_score_shooting_lines_add_up_to_points() {
    let result = average_game(11);
    for side in Side::BOTH {
        let team = result.box_score.get(side);
        let t = &team.totals;
        assert_eq!(
            t.points,
            2 * t.field_goals_made + t.threes_made + t.free_throws_made
        );
        assert!(t.field_goals_made <= t.field_goals_attempted);
        assert!(t.threes_made <= t.threes_attempted);
        assert!(t.free_throws_made <= t.free_throws_attempted);
        let player_points: u32 = team.players.values().map(|line| line.points).sum();
        assert_eq!(player_points, t.points);
    }
}

#[test]
fn every_possession_reconciles_field_goals_and_free_throws() {
    let result = average_game(5);
    for possession in result.possessions() {
        assert_eq!(
            possession.points_scored,
            possession.field_goal_points + possession.free_throws_made()
        );
        if possession.points_scored > 0 {
            assert!(possession.scoring_player.is_some());
        }
    }
}

#[test]
fn and_ones_score_basket_plus_free_throw() {
    let mut seen = 0;
    for seed in 0..5 {
        let result = average_game(seed);
        for possession in result.possessions() {
            let Some(foul) = possession.foul.as_ref().filter(|f| f.and_one) else {
                continue;
            };
            seen += 1;
            let shot = possession.shots.last().unwrap();
            assert!(shot.made);
            assert_eq!(foul.free_throws_awarded, 1);
            assert_eq!(
                possession.points_scored,
                shot.shot_type.points() + possession.free_throws_made()
            );
        }
    }
    assert!(seen > 0, "five games should contain at least one and-one");
}

#[test]
fn team_fouls_match_foul_events_per_quarter() {
    let result = average_game(9);
    for quarter in &result.quarters {
        for side in Side::BOTH {
            let committed = quarter
                .possessions
                .iter()
                .filter(|p| p.offense == side.opponent() && p.foul.is_some())
                .count();
            assert_eq!(usize::from(*quarter.team_fouls.get(side)), committed);
        }
    }
    for side in Side::BOTH {
        let personal: u32 = result.box_score.get(side).totals.personal_fouls;
        let team: u32 = result
            .quarters
            .iter()
            .map(|q| u32::from(*q.team_fouls.get(side)))
            .sum();
        assert_eq!(personal, team);
    }
}

#[test]
fn playing_time_fills_every_minute_for_five_players() {
    let result = average_game(21);
    let content = test_content();
    let game_seconds = f64::from(content.constants.quarter_length_seconds) * f64::from(QUARTERS);
    for side in Side::BOTH {
        let total = result.box_score.get(side).totals.seconds_played;
        assert!(
            (total - game_seconds * 5.0).abs() < 1e-6,
            "{side:?} played {total} seconds"
        );
    }
}
