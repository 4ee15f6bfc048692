//! Shooting fouls, free throws and the late-game intentional foul.

use rand::Rng;

use crate::possession::{OnCourt, Unit};
use crate::probability::{effective_composite, event_chance, event_probability, roll, Clamped};
use crate::{
    ContestTier, Decision, EngineContent, Event, FreeThrowResult, IntentionalFoulConstants,
    Mechanic, PossessionTrace, ShotType, LINEUP_SIZE, QUARTERS,
};

/// Chance the contesting defender fouls the shooter. Undisciplined defenders
/// foul more, so the curve runs on the inverted discipline composite.
pub fn shooting_foul_probability(
    defender: &OnCourt,
    shot_type: ShotType,
    tier: ContestTier,
    content: &EngineContent,
) -> (f64, Clamped) {
    let discipline = effective_composite(
        defender.player,
        defender.stamina,
        Mechanic::FoulDiscipline,
        content,
    );
    let foul_composite = 100.0 - discipline;
    let scaling = &content.constants.shooting_foul;
    let multiplier = scaling.shot_multiplier.get(shot_type) * scaling.tier_multiplier.get(tier);
    let p = event_probability(content.probabilities.get(Event::ShootingFoul), foul_composite)
        .then(|p| p * multiplier);
    (foul_composite, p)
}

/// One for an and-one, otherwise the value of the missed shot.
pub fn free_throws_awarded(shot_type: ShotType, made: bool) -> u8 {
    match (made, shot_type) {
        (true, _) => 1,
        (false, ShotType::Three) => 3,
        (false, ShotType::Rim | ShotType::Midrange | ShotType::Dunk) => 2,
    }
}

pub fn free_throw_probability(shooter: &OnCourt, content: &EngineContent) -> (f64, Clamped) {
    event_chance(shooter.player, shooter.stamina, Event::FreeThrow, content)
}

/// Shoot `attempts` free throws, one roll each.
pub fn shoot_free_throws(
    shooter: &OnCourt,
    attempts: u8,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> FreeThrowResult {
    let (composite, p) = free_throw_probability(shooter, content);
    let mut makes = 0;
    for _ in 0..attempts {
        let attempt = roll(rng, Decision::FreeThrow, &shooter.player.name, Some(composite), p);
        if attempt.success {
            makes += 1;
        }
        trace.rolls.push(attempt);
    }
    FreeThrowResult {
        shooter: shooter.player.name.clone(),
        attempts,
        makes,
    }
}

/// The trailing defense fouls on purpose: fourth quarter, under the time
/// threshold, offense ahead by a margin inside the configured window.
pub fn should_intentional_foul(
    time_remaining: u32,
    score_differential: i32,
    quarter: u8,
    offensive_team_leading: bool,
    constants: &IntentionalFoulConstants,
) -> bool {
    if quarter != QUARTERS || !offensive_team_leading || score_differential <= 0 {
        return false;
    }
    if time_remaining >= constants.time_threshold_seconds {
        return false;
    }
    (constants.min_margin..=constants.max_margin).contains(&score_differential.unsigned_abs())
}

/// Slot of the weakest free-throw shooter in the unit. Ties go to the lower slot.
pub fn intentional_foul_target(offense: &Unit, content: &EngineContent) -> usize {
    let mut target = 0;
    let mut worst = f64::INFINITY;
    for slot in 0..LINEUP_SIZE {
        let (_, p) = free_throw_probability(&offense.players[slot], content);
        if p.value < worst {
            worst = p.value;
            target = slot;
        }
    }
    target
}
