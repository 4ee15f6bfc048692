//! Defender assignment and the deterministic part of contest distance.

use rand::Rng;

use crate::possession::Unit;
use crate::probability::{effective_composite, event_chance, roll};
use crate::{
    ContestConstants, Decision, EngineContent, Event, Mechanic, Position, PossessionTrace,
    ShotType, LINEUP_SIZE,
};

/// Slot of the defender who picks up a player at `position`: same position
/// first, then adjacent, then whoever plays closest on the PG..C spectrum.
/// Ties go to the lower lineup slot.
pub fn assign_primary_defender(position: Position, defense: &Unit) -> usize {
    (0..LINEUP_SIZE)
        .min_by_key(|&slot| (defense.players[slot].player.position.distance(position), slot))
        .unwrap_or(0)
}

/// Best shot-blocker among the four defenders who aren't `primary`.
pub fn help_defender(defense: &Unit, primary: usize, content: &EngineContent) -> Option<usize> {
    (0..LINEUP_SIZE)
        .filter(|&slot| slot != primary)
        .map(|slot| {
            let on_court = &defense.players[slot];
            let score = effective_composite(
                on_court.player,
                on_court.stamina,
                Mechanic::Block,
                content,
            );
            (slot, score)
        })
        // Strictly greater keeps the lowest slot on ties.
        .fold(None, |best: Option<(usize, f64)>, (slot, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((slot, score)),
        })
        .map(|(slot, _)| slot)
}

/// Drives to the basket may pull a help defender over. Rolls only for rim and
/// dunk attempts; returns the slot that ends up contesting.
pub fn contesting_defender(
    shot_type: ShotType,
    defense: &Unit,
    primary: usize,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> usize {
    if shot_type.is_perimeter() {
        return primary;
    }
    let Some(helper) = help_defender(defense, primary, content) else {
        return primary;
    };
    let on_court = &defense.players[helper];
    let (composite, p) = event_chance(on_court.player, on_court.stamina, Event::HelpRotation, content);
    let rotation = roll(rng, Decision::HelpRotation, &on_court.player.name, Some(composite), p);
    let rotated = rotation.success;
    trace.rolls.push(rotation);
    if rotated {
        helper
    } else {
        primary
    }
}

/// Signed distance change from zone coverage: negative tightens rim contests,
/// positive loosens perimeter contests. Linear in zone share.
pub fn zone_adjustment(shot_type: ShotType, zone_pct: u8, constants: &ContestConstants) -> f64 {
    let zone_share = f64::from(zone_pct.min(100)) / 100.0;
    if shot_type.is_perimeter() {
        zone_share * constants.zone_perimeter_loosen_ft
    } else {
        -zone_share * constants.zone_rim_tighten_ft
    }
}

/// Contest distance before noise. Better defenders close out tighter.
pub fn contest_baseline(
    defender_composite: f64,
    shot_type: ShotType,
    zone_pct: u8,
    transition: bool,
    constants: &ContestConstants,
) -> f64 {
    let mut distance =
        constants.base_distance_ft - defender_composite * constants.distance_per_composite_point;
    distance += zone_adjustment(shot_type, zone_pct, constants);
    if transition {
        distance += constants.transition_bonus_ft;
    }
    distance
}
