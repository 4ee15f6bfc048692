//! Shot selection, contest distance and make/miss/block resolution.
//!
//! Rolls are consumed in a fixed order per attempt: shot type, dunk (rim
//! attempts only), contest noise, block (contested shots only), shooting
//! foul, make.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::defense::contest_baseline;
use crate::fouls::shooting_foul_probability;
use crate::possession::OnCourt;
use crate::probability::{effective_composite, event_chance, roll, weighted_choice, Clamped};
use crate::{
    ContestConstants, ContestTier, ContestTrace, Decision, EngineContent, Event, Mechanic,
    Position, PossessionTrace, RollTrace, ShotAttempt, ShotSelectionConstants, ShotType,
};

const SELECTABLE: [ShotType; 3] = [ShotType::Rim, ShotType::Midrange, ShotType::Three];

/// Selection weights for rim, midrange and three, in that order.
pub fn shot_weights(
    position: Position,
    transition: bool,
    zone_pct: u8,
    constants: &ShotSelectionConstants,
) -> [f64; 3] {
    let mix = constants.by_position.get(position);
    let zone_share = f64::from(zone_pct.min(100)) / 100.0;
    let mut rim = mix.rim;
    if transition {
        rim += constants.transition_rim_bonus;
    }
    [rim, mix.midrange, mix.three + zone_share * constants.zone_three_bonus]
}

pub fn select_shot_type(
    shooter: &OnCourt,
    transition: bool,
    zone_pct: u8,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> ShotType {
    let constants = &content.constants.shot_selection;
    let weights = shot_weights(shooter.player.position, transition, zone_pct, constants);
    let choice = weighted_choice(rng, &weights);
    trace.rolls.push(RollTrace {
        decision: Decision::ShotSelection,
        actor: shooter.player.name.clone(),
        composite: None,
        probability: choice.share,
        roll: choice.roll,
        success: true,
        clamped: false,
    });
    match SELECTABLE[choice.index] {
        ShotType::Rim => rim_finish(shooter, content, rng, trace),
        other => other,
    }
}

/// Putbacks are always at the rim; the rebounder may still throw it down.
pub fn putback_shot_type(
    shooter: &OnCourt,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> ShotType {
    rim_finish(shooter, content, rng, trace)
}

fn rim_finish(
    shooter: &OnCourt,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> ShotType {
    let composite = effective_composite(shooter.player, shooter.stamina, Mechanic::Dunk, content);
    let rate = content
        .constants
        .shot_selection
        .dunk_rate
        .get(shooter.player.position);
    let p = Clamped::unit(rate * composite / 50.0);
    let dunk = roll(rng, Decision::Dunk, &shooter.player.name, Some(composite), p);
    let is_dunk = dunk.success;
    trace.rolls.push(dunk);
    if is_dunk {
        ShotType::Dunk
    } else {
        ShotType::Rim
    }
}

pub fn contest_tier(distance_ft: f64, constants: &ContestConstants) -> ContestTier {
    if distance_ft >= constants.wide_open_ft {
        ContestTier::WideOpen
    } else if distance_ft >= constants.open_ft {
        ContestTier::Open
    } else if distance_ft >= constants.tight_ft {
        ContestTier::Tight
    } else {
        ContestTier::VeryTight
    }
}

/// Baseline from the defender plus Gaussian noise, floored at zero.
pub fn contest_distance(
    shooter: &OnCourt,
    defender: &OnCourt,
    shot_type: ShotType,
    zone_pct: u8,
    transition: bool,
    content: &EngineContent,
    rng: &mut impl Rng,
) -> ContestTrace {
    let constants = &content.constants.contest;
    let defender_composite =
        effective_composite(defender.player, defender.stamina, Mechanic::Contest, content);
    let baseline_ft =
        contest_baseline(defender_composite, shot_type, zone_pct, transition, constants);
    let noise_ft = Normal::new(0.0, constants.noise_sigma_ft).map_or(0.0, |n| n.sample(rng));
    let raw_ft = baseline_ft + noise_ft;
    // Noise past the shooter is a hand in the face, not a guard violation.
    let distance_ft = raw_ft.max(0.0);
    let tier = contest_tier(distance_ft, constants);
    ContestTrace {
        shooter: shooter.player.name.clone(),
        defender: defender.player.name.clone(),
        shot_type,
        defender_composite,
        baseline_ft,
        noise_ft,
        distance_ft,
        tier,
        penalty: *constants.penalties.get(shot_type).get(tier),
        clamped: raw_ft.is_nan(),
    }
}

/// Make probability after the contest penalty.
pub fn make_probability(
    shooter: &OnCourt,
    shot_type: ShotType,
    penalty: f64,
    content: &EngineContent,
) -> (f64, Clamped) {
    let (composite, base) =
        event_chance(shooter.player, shooter.stamina, Event::for_shot(shot_type), content);
    (composite, base.then(|p| p - penalty))
}

pub fn block_probability(
    defender: &OnCourt,
    shot_type: ShotType,
    tier: ContestTier,
    content: &EngineContent,
) -> (f64, Clamped) {
    let scaling = &content.constants.block;
    let (composite, base) = event_chance(defender.player, defender.stamina, Event::Block, content);
    let multiplier = scaling.shot_multiplier.get(shot_type) * scaling.tier_multiplier.get(tier);
    (composite, base.then(|p| p * multiplier))
}

/// Everything one field-goal attempt needs besides content and the RNG.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotSetup<'a> {
    pub shooter: &'a OnCourt<'a>,
    pub defender: &'a OnCourt<'a>,
    pub shot_type: ShotType,
    pub zone_pct: u8,
    pub transition: bool,
    pub putback: bool,
}

/// Contest, then block, foul and make rolls. A blocked shot is never fouled.
pub fn resolve_shot(
    setup: &ShotSetup,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> ShotAttempt {
    let ShotSetup {
        shooter,
        defender,
        shot_type,
        ..
    } = *setup;
    let contest = contest_distance(
        shooter,
        defender,
        shot_type,
        setup.zone_pct,
        setup.transition,
        content,
        rng,
    );
    let tier = contest.tier;
    let penalty = contest.penalty;
    let mut attempt = ShotAttempt {
        shooter: shooter.player.name.clone(),
        defender: defender.player.name.clone(),
        shot_type,
        contest_tier: tier,
        contest_distance_ft: contest.distance_ft,
        made: false,
        blocked_by: None,
        fouled: false,
        putback: setup.putback,
    };
    trace.contests.push(contest);

    if tier != ContestTier::WideOpen {
        let (composite, p) = block_probability(defender, shot_type, tier, content);
        let block = roll(rng, Decision::Block, &defender.player.name, Some(composite), p);
        let blocked = block.success;
        trace.rolls.push(block);
        if blocked {
            attempt.blocked_by = Some(defender.player.name.clone());
            return attempt;
        }
    }

    let (composite, p) = shooting_foul_probability(defender, shot_type, tier, content);
    let foul = roll(rng, Decision::ShootingFoul, &defender.player.name, Some(composite), p);
    attempt.fouled = foul.success;
    trace.rolls.push(foul);

    let (composite, p) = make_probability(shooter, shot_type, penalty, content);
    let make = roll(rng, Decision::FieldGoal, &shooter.player.name, Some(composite), p);
    attempt.made = make.success;
    trace.rolls.push(make);
    attempt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_content, make_rng, uniform_player};
    use crate::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn on_court(player: &Player) -> OnCourt<'_> {
        OnCourt {
            player,
            stamina: 100.0,
        }
    }

    #[test]
    fn tier_boundaries_are_inclusive_on_the_lower_edge() {
        let constants = &base_content().constants.contest;
        assert_eq!(contest_tier(constants.wide_open_ft, constants), ContestTier::WideOpen);
        assert_eq!(contest_tier(constants.open_ft, constants), ContestTier::Open);
        assert_eq!(contest_tier(constants.tight_ft, constants), ContestTier::Tight);
        assert_eq!(contest_tier(0.0, constants), ContestTier::VeryTight);
    }

    #[test]
    fn centers_shoot_more_at_the_rim_than_guards() {
        let constants = &base_content().constants.shot_selection;
        let center = shot_weights(Position::C, false, 0, constants);
        let guard = shot_weights(Position::PG, false, 0, constants);
        let share = |w: [f64; 3], i: usize| w[i] / w.iter().sum::<f64>();
        assert!(share(center, 0) > share(guard, 0));
        assert!(share(center, 2) < share(guard, 2));
    }

    #[test]
    fn zone_and_transition_shift_shot_mix() {
        let constants = &base_content().constants.shot_selection;
        let base = shot_weights(Position::SF, false, 0, constants);
        let zone = shot_weights(Position::SF, false, 100, constants);
        let transition = shot_weights(Position::SF, true, 0, constants);
        assert!(zone[2] > base[2]);
        assert!(transition[0] > base[0]);
    }

    #[test]
    fn contest_distribution_hits_target_bands_for_average_defender() {
        let content = base_content();
        let shooter = uniform_player("S", Position::SG, 50);
        let defender = uniform_player("D", Position::SG, 50);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts = [0u32; 4];
        let samples = 20_000;
        for _ in 0..samples {
            let trace = contest_distance(
                &on_court(&shooter),
                &on_court(&defender),
                ShotType::Midrange,
                0,
                false,
                &content,
                &mut rng,
            );
            counts[trace.tier as usize] += 1;
        }
        let share = |i: usize| f64::from(counts[i]) / f64::from(samples);
        assert!((share(0) - 0.30).abs() < 0.05, "wide open {}", share(0));
        assert!((share(1) - 0.35).abs() < 0.05, "open {}", share(1));
        assert!((share(2) - 0.25).abs() < 0.05, "tight {}", share(2));
        assert!((share(3) - 0.10).abs() < 0.05, "very tight {}", share(3));
    }

    #[test]
    fn tighter_contests_lower_make_probability() {
        let content = base_content();
        let shooter = uniform_player("S", Position::SG, 60);
        let court = on_court(&shooter);
        let penalties = content.constants.contest.penalties.three;
        let (_, open) = make_probability(&court, ShotType::Three, penalties.wide_open, &content);
        let (_, smothered) =
            make_probability(&court, ShotType::Three, penalties.very_tight, &content);
        assert!(smothered.value < open.value);
    }

    #[test]
    fn resolved_shot_traces_contest_and_make_roll() {
        let content = base_content();
        let shooter = uniform_player("S", Position::PF, 50);
        let defender = uniform_player("D", Position::PF, 50);
        let (s, d) = (on_court(&shooter), on_court(&defender));
        let mut rng = make_rng();
        let mut trace = PossessionTrace::default();
        let setup = ShotSetup {
            shooter: &s,
            defender: &d,
            shot_type: ShotType::Midrange,
            zone_pct: 0,
            transition: false,
            putback: false,
        };
        let attempt = resolve_shot(&setup, &content, &mut rng, &mut trace);
        assert_eq!(trace.contests.len(), 1);
        if attempt.blocked_by.is_some() {
            assert!(!attempt.made && !attempt.fouled);
            assert_eq!(trace.rolls_for(Decision::FieldGoal).count(), 0);
        } else {
            assert_eq!(trace.rolls_for(Decision::FieldGoal).count(), 1);
            assert_eq!(trace.rolls_for(Decision::ShootingFoul).count(), 1);
        }
    }

    #[test]
    fn wide_open_shots_skip_the_block_roll() {
        let mut content = base_content();
        content.constants.contest.noise_sigma_ft = 0.0;
        content.constants.contest.base_distance_ft = 50.0;
        let shooter = uniform_player("S", Position::C, 50);
        let defender = uniform_player("D", Position::C, 50);
        let (s, d) = (on_court(&shooter), on_court(&defender));
        let mut rng = make_rng();
        let mut trace = PossessionTrace::default();
        let setup = ShotSetup {
            shooter: &s,
            defender: &d,
            shot_type: ShotType::Rim,
            zone_pct: 0,
            transition: false,
            putback: false,
        };
        let attempt = resolve_shot(&setup, &content, &mut rng, &mut trace);
        assert_eq!(attempt.contest_tier, ContestTier::WideOpen);
        assert_eq!(trace.rolls_for(Decision::Block).count(), 0);
    }

    #[test]
    fn negative_distance_floors_at_zero_without_a_clamp() {
        let mut content = base_content();
        content.constants.contest.base_distance_ft = -20.0;
        let shooter = uniform_player("S", Position::C, 50);
        let defender = uniform_player("D", Position::C, 50);
        let mut rng = make_rng();
        let trace = contest_distance(
            &on_court(&shooter),
            &on_court(&defender),
            ShotType::Rim,
            0,
            false,
            &content,
            &mut rng,
        );
        assert!(trace.baseline_ft + trace.noise_ft < 0.0);
        assert!(trace.distance_ft.abs() < f64::EPSILON);
        assert!(!trace.clamped);
        assert_eq!(trace.tier, ContestTier::VeryTight);

        let mut possession = PossessionTrace::default();
        possession.contests.push(trace);
        assert!(!possession.any_clamped());
    }
}
