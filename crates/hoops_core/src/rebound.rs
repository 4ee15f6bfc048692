//! Missed-shot rebounding: which side wins the board, then who grabs it.

use rand::Rng;

use crate::possession::Unit;
use crate::probability::{effective_composite, event_probability, roll, weighted_choice, Clamped};
use crate::{
    Decision, EngineContent, Event, Mechanic, PossessionTrace, ReboundKind, RollTrace,
    LINEUP_SIZE,
};

fn rebound_composites(unit: &Unit, content: &EngineContent) -> [f64; LINEUP_SIZE] {
    std::array::from_fn(|slot| {
        let on_court = &unit.players[slot];
        effective_composite(on_court.player, on_court.stamina, Mechanic::Rebound, content)
    })
}

/// Mean fatigue-adjusted rebound composite of the five on the floor.
#[allow(clippy::cast_precision_loss)]
pub fn team_rebound_composite(unit: &Unit, content: &EngineContent) -> f64 {
    rebound_composites(unit, content).iter().sum::<f64>() / LINEUP_SIZE as f64
}

/// Offensive rebound chance from the two units' size and effort, scaled by
/// both teams' rebounding strategies.
pub fn offensive_rebound_probability(
    offense: &Unit,
    defense: &Unit,
    content: &EngineContent,
) -> (f64, Clamped) {
    let offense_composite = team_rebound_composite(offense, content);
    let defense_composite = team_rebound_composite(defense, content);
    let composite =
        Clamped::new(50.0 + (offense_composite - defense_composite) / 2.0, 0.0, 100.0).value;
    let strategy = &content.constants.rebound;
    let multiplier = strategy
        .offense_strategy
        .get(offense.tactics.rebounding_strategy)
        * strategy
            .defense_strategy
            .get(defense.tactics.rebounding_strategy);
    let p = event_probability(content.probabilities.get(Event::OffensiveRebound), composite)
        .then(|p| p * multiplier);
    (composite, p)
}

/// Pick a rebounder from `unit`, weighted by rebound composite.
pub fn choose_rebounder(
    unit: &Unit,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> usize {
    let weights = rebound_composites(unit, content);
    let choice = weighted_choice(rng, &weights);
    trace.rolls.push(RollTrace {
        decision: Decision::RebounderSelection,
        actor: unit.players[choice.index].player.name.clone(),
        composite: Some(weights[choice.index]),
        probability: choice.share,
        roll: choice.roll,
        success: true,
        clamped: false,
    });
    choice.index
}

/// Who secured the board, and from which unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebound {
    pub kind: ReboundKind,
    /// Slot in the rebounding unit.
    pub slot: usize,
}

/// Resolve a missed or blocked shot. When `offense_allowed` is false the
/// offense has used up its second chances and the board goes to the defense
/// without a roll.
pub fn resolve_rebound(
    offense: &Unit,
    defense: &Unit,
    offense_allowed: bool,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> Rebound {
    let offensive = offense_allowed && {
        let (composite, p) = offensive_rebound_probability(offense, defense, content);
        // Team-level roll, credited to the offense's strongest rebounder.
        let weights = rebound_composites(offense, content);
        let actor = (0..LINEUP_SIZE)
            .max_by(|&a, &b| weights[a].total_cmp(&weights[b]).then(b.cmp(&a)))
            .unwrap_or(0);
        let board = roll(
            rng,
            Decision::OffensiveRebound,
            &offense.players[actor].player.name,
            Some(composite),
            p,
        );
        let won = board.success;
        trace.rolls.push(board);
        won
    };

    if offensive {
        Rebound {
            kind: ReboundKind::Offensive,
            slot: choose_rebounder(offense, content, rng, trace),
        }
    } else {
        Rebound {
            kind: ReboundKind::Defensive,
            slot: choose_rebounder(defense, content, rng, trace),
        }
    }
}
