//! Setup-time checks. Everything here runs before the first possession; the
//! engine itself assumes validated inputs and only clamps numeric drift.

use std::collections::HashSet;

use crate::{
    ConfigError, Constants, EngineContent, Event, Mechanic, Team, ATTRIBUTE_COUNT, LINEUP_SIZE,
    QUARTERS,
};

/// Tolerance on weight-table sums.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

pub fn validate_content(content: &EngineContent) -> Result<(), ConfigError> {
    for mechanic in Mechanic::ALL {
        let table = content.weights.get(mechanic);
        for (attribute, coefficient) in table.iter() {
            if !coefficient.is_finite() || coefficient < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    mechanic,
                    attribute,
                    coefficient,
                });
            }
        }
        let sum = table.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum { mechanic, sum });
        }
    }

    for event in Event::ALL {
        let params = content.probabilities.get(event);
        if !(params.base_rate.is_finite() && params.k.is_finite() && params.ceiling.is_finite()) {
            return Err(ConfigError::InvalidProbability {
                event,
                reason: "parameters must be finite".to_string(),
            });
        }
        let reason = if !(0.0..=1.0).contains(&params.base_rate) {
            Some("base_rate must be within [0, 1]")
        } else if params.k < 0.0 {
            Some("k must not be negative")
        } else if !(0.0..=1.0).contains(&params.ceiling) {
            Some("ceiling must be within [0, 1]")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigError::InvalidProbability {
                event,
                reason: reason.to_string(),
            });
        }
    }

    validate_constants(&content.constants)
}

fn require(ok: bool, name: &'static str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidConstant {
            name,
            reason: reason.to_string(),
        })
    }
}

/// Shortest duration that still rounds to one clock second.
const MIN_TIMED_SECONDS: f64 = 0.5;

fn require_band(min: f64, max: f64, name: &'static str) -> Result<(), ConfigError> {
    require(
        min.is_finite() && max.is_finite() && min >= MIN_TIMED_SECONDS && min <= max,
        name,
        "expected 0.5 <= min <= max",
    )
}

fn require_unit(value: f64, name: &'static str) -> Result<(), ConfigError> {
    require((0.0..=1.0).contains(&value), name, "must be within [0, 1]")
}

/// Every possession has to take at least a second off the clock or the
/// quarter never ends.
fn validate_timing(c: &Constants) -> Result<(), ConfigError> {
    let t = &c.timing;
    for profile in [&t.pace.fast, &t.pace.standard, &t.pace.slow] {
        require_band(
            profile.min_attempt_seconds,
            profile.max_attempt_seconds,
            "timing.pace",
        )?;
        require_unit(
            profile.transition_probability,
            "timing.pace.transition_probability",
        )?;
    }
    require_band(t.transition_min_seconds, t.transition_max_seconds, "timing.transition")?;
    require_band(t.putback_min_seconds, t.putback_max_seconds, "timing.putback")?;
    require_band(t.reset_min_seconds, t.reset_max_seconds, "timing.reset")?;
    require(
        t.free_throw_seconds.is_finite() && t.free_throw_seconds >= 0.0,
        "timing.free_throw_seconds",
        "must be non-negative",
    )?;

    let foul = &c.intentional_foul;
    require(
        foul.seconds.is_finite() && foul.seconds >= 0.0,
        "intentional_foul.seconds",
        "must be non-negative",
    )?;
    require(
        foul.seconds + f64::from(foul.free_throws) * t.free_throw_seconds >= MIN_TIMED_SECONDS,
        "intentional_foul.seconds",
        "a foul and its free throws must take at least 0.5 s",
    )
}

fn validate_constants(c: &Constants) -> Result<(), ConfigError> {
    require(c.quarter_length_seconds > 0, "quarter_length_seconds", "must be positive")?;
    require(c.shot_clock_seconds > 0, "shot_clock_seconds", "must be positive")?;
    require(
        c.offensive_rebound_shot_clock_seconds > 0
            && c.offensive_rebound_shot_clock_seconds <= c.shot_clock_seconds,
        "offensive_rebound_shot_clock_seconds",
        "must be positive and no longer than the shot clock",
    )?;
    validate_timing(c)?;

    require(
        c.usage.scoring_option_shares.iter().all(|s| s.is_finite() && *s >= 0.0)
            && c.usage.scoring_option_shares.iter().sum::<f64>() <= 1.0,
        "usage.scoring_option_shares",
        "shares must be non-negative and sum to at most 1.0",
    )?;

    let mixes = &c.shot_selection.by_position;
    for mix in [&mixes.pg, &mixes.sg, &mixes.sf, &mixes.pf, &mixes.c] {
        require(
            mix.rim >= 0.0 && mix.midrange >= 0.0 && mix.three >= 0.0,
            "shot_selection.by_position",
            "weights must be non-negative",
        )?;
        require(
            mix.rim + mix.midrange + mix.three > 0.0,
            "shot_selection.by_position",
            "at least one shot type must carry weight",
        )?;
    }

    let contest = &c.contest;
    require(
        contest.noise_sigma_ft.is_finite() && contest.noise_sigma_ft >= 0.0,
        "contest.noise_sigma_ft",
        "must be finite and non-negative",
    )?;
    require(
        contest.wide_open_ft >= contest.open_ft
            && contest.open_ft >= contest.tight_ft
            && contest.tight_ft >= 0.0,
        "contest tiers",
        "expected wide_open_ft >= open_ft >= tight_ft >= 0",
    )?;
    // Zone coverage only ever tightens the rim and loosens the perimeter.
    for (value, name) in [
        (contest.zone_rim_tighten_ft, "contest.zone_rim_tighten_ft"),
        (contest.zone_perimeter_loosen_ft, "contest.zone_perimeter_loosen_ft"),
    ] {
        require(value.is_finite() && value >= 0.0, name, "must be finite and non-negative")?;
    }
    require_unit(
        c.shot_selection.putback_probability,
        "shot_selection.putback_probability",
    )?;

    require(c.fouls.foul_out_limit > 0, "fouls.foul_out_limit", "must be positive")?;
    require(
        c.intentional_foul.min_margin <= c.intentional_foul.max_margin,
        "intentional_foul margins",
        "min_margin must not exceed max_margin",
    )
}

/// Game length in minutes, the ceiling for any single allotment.
pub fn game_minutes(constants: &Constants) -> f64 {
    f64::from(constants.quarter_length_seconds) * f64::from(QUARTERS) / 60.0
}

pub fn validate_team(team: &Team, constants: &Constants) -> Result<(), ConfigError> {
    if team.players.len() < LINEUP_SIZE {
        return Err(ConfigError::RosterTooSmall {
            team: team.name.clone(),
            found: team.players.len(),
            required: LINEUP_SIZE,
        });
    }

    let mut seen = HashSet::new();
    for player in &team.players {
        if !seen.insert(&player.name) {
            return Err(ConfigError::DuplicatePlayer {
                team: team.name.clone(),
                player: player.name.clone(),
            });
        }
        if player.attributes.len() != ATTRIBUTE_COUNT {
            return Err(ConfigError::AttributeCount {
                player: player.name.clone(),
                expected: ATTRIBUTE_COUNT,
                found: player.attributes.len(),
            });
        }
        if let Some((attribute, value)) = player.attributes.iter().find(|(_, v)| *v > 100) {
            return Err(ConfigError::AttributeOutOfRange {
                player: player.name.clone(),
                attribute,
                value,
            });
        }
    }

    let tactics = &team.tactics;
    if tactics.man_defense_pct > 100 {
        return Err(ConfigError::ManDefenseOutOfRange {
            team: team.name.clone(),
            value: tactics.man_defense_pct,
        });
    }
    for option in tactics.scoring_options().into_iter().flatten() {
        if !seen.contains(option) {
            return Err(ConfigError::UnknownScoringOption {
                team: team.name.clone(),
                player: option.clone(),
            });
        }
    }

    let max_minutes = game_minutes(constants);
    for (player, &minutes) in &tactics.minutes_allotment {
        if !seen.contains(player) {
            return Err(ConfigError::UnknownAllotmentPlayer {
                team: team.name.clone(),
                player: player.clone(),
            });
        }
        if !minutes.is_finite() || !(0.0..=max_minutes).contains(&minutes) {
            return Err(ConfigError::InvalidAllotment {
                team: team.name.clone(),
                player: player.clone(),
                minutes,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_content, uniform_team};
    use crate::{Attribute, PlayerId, WeightTable};

    fn rejected_constant(content: &EngineContent) -> Option<&'static str> {
        match validate_content(content) {
            Err(ConfigError::InvalidConstant { name, .. }) => Some(name),
            _ => None,
        }
    }

    #[test]
    fn base_content_is_valid() {
        validate_content(&base_content()).unwrap();
    }

    #[test]
    fn weight_table_not_summing_to_one_is_rejected() {
        let mut content = base_content();
        content.weights.three =
            WeightTable::from_iter([(Attribute::FormTechnique, 0.6), (Attribute::Finesse, 0.3)]);
        let err = validate_content(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::WeightSum { mechanic: Mechanic::Three, .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut content = base_content();
        content.weights.contest = WeightTable::from_iter([
            (Attribute::Reactions, 1.2),
            (Attribute::Height, -0.2),
        ]);
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::NegativeWeight { attribute: Attribute::Height, .. })
        ));
    }

    #[test]
    fn negative_zone_adjustment_is_rejected() {
        let mut content = base_content();
        content.constants.contest.zone_rim_tighten_ft = -1.0;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "contest.zone_rim_tighten_ft", .. })
        ));

        let mut content = base_content();
        content.constants.contest.zone_perimeter_loosen_ft = f64::NAN;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "contest.zone_perimeter_loosen_ft", .. })
        ));
    }

    #[test]
    fn probability_constants_outside_unit_range_are_rejected() {
        let mut content = base_content();
        content.constants.timing.pace.slow.transition_probability = 1.2;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "timing.pace.transition_probability", .. })
        ));

        let mut content = base_content();
        content.constants.shot_selection.putback_probability = -0.1;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "shot_selection.putback_probability", .. })
        ));
    }

    #[test]
    fn ceiling_above_one_is_rejected() {
        let mut content = base_content();
        content.probabilities.block.ceiling = 1.5;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidProbability { event: Event::Block, .. })
        ));
    }

    #[test]
    fn inverted_time_band_is_rejected() {
        let mut content = base_content();
        content.constants.timing.pace.fast.min_attempt_seconds = 20.0;
        content.constants.timing.pace.fast.max_attempt_seconds = 10.0;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "timing.pace", .. })
        ));
    }

    #[test]
    fn sub_second_time_bands_are_rejected() {
        let mut content = base_content();
        content.constants.timing.pace.standard.min_attempt_seconds = 0.4;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "timing.pace", .. })
        ));

        let mut content = base_content();
        content.constants.timing.transition_min_seconds = 0.1;
        content.constants.timing.transition_max_seconds = 0.4;
        assert_eq!(rejected_constant(&content), Some("timing.transition"));

        let mut content = base_content();
        content.constants.timing.putback_min_seconds = 0.3;
        assert_eq!(rejected_constant(&content), Some("timing.putback"));

        let mut content = base_content();
        content.constants.timing.reset_min_seconds = 0.2;
        content.constants.timing.reset_max_seconds = 0.2;
        assert_eq!(rejected_constant(&content), Some("timing.reset"));
    }

    #[test]
    fn half_second_band_is_accepted() {
        let mut content = base_content();
        content.constants.timing.putback_min_seconds = 0.5;
        validate_content(&content).unwrap();
    }

    #[test]
    fn instant_intentional_foul_is_rejected() {
        let mut content = base_content();
        content.constants.intentional_foul.seconds = 0.0;
        content.constants.timing.free_throw_seconds = 0.0;
        assert!(matches!(
            validate_content(&content),
            Err(ConfigError::InvalidConstant { name: "intentional_foul.seconds", .. })
        ));

        // Free throw time alone is enough to move the clock.
        let mut content = base_content();
        content.constants.intentional_foul.seconds = 0.0;
        content.constants.timing.free_throw_seconds = 1.0;
        validate_content(&content).unwrap();
    }

    #[test]
    fn valid_team_passes() {
        let content = base_content();
        validate_team(&uniform_team("Home", 50), &content.constants).unwrap();
    }

    #[test]
    fn four_man_roster_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        team.players.truncate(4);
        assert_eq!(
            validate_team(&team, &content.constants),
            Err(ConfigError::RosterTooSmall {
                team: "Home".to_string(),
                found: 4,
                required: 5,
            })
        );
    }

    #[test]
    fn missing_attribute_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        team.players[2].attributes = team.players[2]
            .attributes
            .iter()
            .filter(|(attr, _)| *attr != Attribute::Teamwork)
            .collect();
        assert!(matches!(
            validate_team(&team, &content.constants),
            Err(ConfigError::AttributeCount { found: 24, .. })
        ));
    }

    #[test]
    fn attribute_above_hundred_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        team.players[0].attributes.set(Attribute::Jumping, 101);
        assert!(matches!(
            validate_team(&team, &content.constants),
            Err(ConfigError::AttributeOutOfRange {
                attribute: Attribute::Jumping,
                value: 101,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_player_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        team.players[6].name = team.players[1].name.clone();
        assert!(matches!(
            validate_team(&team, &content.constants),
            Err(ConfigError::DuplicatePlayer { .. })
        ));
    }

    #[test]
    fn unknown_scoring_option_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        team.tactics.scoring_option_2 = Some(PlayerId("Nobody".to_string()));
        assert!(matches!(
            validate_team(&team, &content.constants),
            Err(ConfigError::UnknownScoringOption { .. })
        ));
    }

    #[test]
    fn allotment_beyond_game_length_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        let star = team.players[0].name.clone();
        team.tactics.minutes_allotment.insert(star, 49.0);
        assert!(matches!(
            validate_team(&team, &content.constants),
            Err(ConfigError::InvalidAllotment { .. })
        ));
    }

    #[test]
    fn man_defense_above_hundred_is_rejected() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        team.tactics.man_defense_pct = 120;
        assert!(matches!(
            validate_team(&team, &content.constants),
            Err(ConfigError::ManDefenseOutOfRange { value: 120, .. })
        ));
    }
}
