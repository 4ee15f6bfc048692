//! Shared test fixtures for hoops_core and downstream crates.
//!
//! `base_content()` carries the same tuning as the production files under
//! `content/`, so engine-level tests exercise realistic rates.
//! `uniform_team()` builds a ten-man roster of identical players.

use crate::{
    Attribute, Attributes, Constants, ContestConstants, EngineContent, FoulConstants,
    IntentionalFoulConstants, PaceProfile, PaceTable, Player, PlayerId, Position, PositionTable,
    ProbabilityParams, ProbabilityTables, ReboundConstants, ScaledEventConstants, ShotMix,
    ShotSelectionConstants, ShotTable, StaminaConstants, StrategyTable, SubstitutionConstants,
    TacticalSettings, Team, TierTable, TimingConstants, UsageConstants, WeightTable,
    WeightTables,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn params(base_rate: f64, k: f64, ceiling: f64) -> ProbabilityParams {
    ProbabilityParams {
        base_rate,
        k,
        ceiling,
    }
}

fn weights(entries: &[(Attribute, f64)]) -> WeightTable {
    entries.iter().copied().collect()
}

fn tiers(wide_open: f64, open: f64, tight: f64, very_tight: f64) -> TierTable<f64> {
    TierTable {
        wide_open,
        open,
        tight,
        very_tight,
    }
}

fn shots<T>(rim: T, midrange: T, three: T, dunk: T) -> ShotTable<T> {
    ShotTable {
        rim,
        midrange,
        three,
        dunk,
    }
}

fn mix(rim: f64, midrange: f64, three: f64) -> ShotMix {
    ShotMix {
        rim,
        midrange,
        three,
    }
}

fn pace(min: f64, max: f64, transition_probability: f64, stamina_multiplier: f64) -> PaceProfile {
    PaceProfile {
        min_attempt_seconds: min,
        max_attempt_seconds: max,
        transition_probability,
        stamina_multiplier,
    }
}

/// Production-equivalent weight tables. Every table sums to 1.0.
pub fn base_weights() -> WeightTables {
    use Attribute as A;
    WeightTables {
        rim: weights(&[
            (A::Finesse, 0.25),
            (A::HandEyeCoordination, 0.20),
            (A::Balance, 0.15),
            (A::Jumping, 0.10),
            (A::Height, 0.10),
            (A::CoreStrength, 0.10),
            (A::Composure, 0.10),
        ]),
        midrange: weights(&[
            (A::FormTechnique, 0.23),
            (A::ThrowAccuracy, 0.18),
            (A::Finesse, 0.15),
            (A::HandEyeCoordination, 0.14),
            (A::Balance, 0.11),
            (A::Composure, 0.09),
            (A::Consistency, 0.06),
            (A::Agility, 0.04),
        ]),
        three: weights(&[
            (A::FormTechnique, 0.25),
            (A::ThrowAccuracy, 0.20),
            (A::Finesse, 0.15),
            (A::HandEyeCoordination, 0.12),
            (A::Balance, 0.10),
            (A::Composure, 0.08),
            (A::Consistency, 0.06),
            (A::Agility, 0.04),
        ]),
        dunk: weights(&[
            (A::Jumping, 0.40),
            (A::Height, 0.30),
            (A::ArmStrength, 0.15),
            (A::Agility, 0.15),
        ]),
        free_throw: weights(&[
            (A::FormTechnique, 0.25),
            (A::ThrowAccuracy, 0.20),
            (A::Finesse, 0.15),
            (A::Composure, 0.15),
            (A::Consistency, 0.15),
            (A::HandEyeCoordination, 0.10),
        ]),
        contest: weights(&[
            (A::Reactions, 0.30),
            (A::Agility, 0.25),
            (A::Awareness, 0.25),
            (A::Height, 0.20),
        ]),
        block: weights(&[
            (A::Jumping, 0.35),
            (A::Height, 0.30),
            (A::Reactions, 0.20),
            (A::Awareness, 0.15),
        ]),
        steal: weights(&[
            (A::Reactions, 0.30),
            (A::HandEyeCoordination, 0.25),
            (A::Agility, 0.20),
            (A::Awareness, 0.15),
            (A::Acceleration, 0.10),
        ]),
        ball_security: weights(&[
            (A::Awareness, 0.25),
            (A::HandEyeCoordination, 0.20),
            (A::Composure, 0.20),
            (A::Creativity, 0.15),
            (A::Balance, 0.10),
            (A::Patience, 0.10),
        ]),
        foul_discipline: weights(&[
            (A::Composure, 0.30),
            (A::Awareness, 0.25),
            (A::Patience, 0.20),
            (A::Reactions, 0.15),
            (A::Teamwork, 0.10),
        ]),
        rebound: weights(&[
            (A::Height, 0.30),
            (A::Jumping, 0.25),
            (A::CoreStrength, 0.15),
            (A::Awareness, 0.15),
            (A::Determination, 0.10),
            (A::Balance, 0.05),
        ]),
        help_defense: weights(&[
            (A::Awareness, 0.40),
            (A::Reactions, 0.30),
            (A::Agility, 0.20),
            (A::Teamwork, 0.10),
        ]),
        tip_off: weights(&[(A::Jumping, 0.50), (A::Height, 0.35), (A::Reactions, 0.15)]),
    }
}

pub fn base_probabilities() -> ProbabilityTables {
    ProbabilityTables {
        rim: params(0.30, 0.02, 1.0),
        midrange: params(0.0, 0.03, 1.0),
        three: params(0.02, 0.03, 1.0),
        dunk: params(0.70, 0.02, 1.0),
        free_throw: params(0.19, 0.049, 1.0),
        block: params(0.0, 0.04, 0.16),
        steal: params(0.0, 0.04, 0.9),
        turnover: params(0.0, 0.04, 0.26),
        shooting_foul: params(0.0, 0.04, 0.20),
        offensive_rebound: params(0.0, 0.04, 0.54),
        help_rotation: params(0.0, 0.04, 0.5),
        tip_off: params(0.0, 0.05, 1.0),
    }
}

fn base_timing() -> TimingConstants {
    TimingConstants {
        pace: PaceTable {
            fast: pace(5.0, 15.0, 0.25, 1.15),
            standard: pace(7.0, 19.0, 0.15, 1.0),
            slow: pace(10.0, 22.0, 0.08, 0.9),
        },
        transition_min_seconds: 3.0,
        transition_max_seconds: 8.0,
        putback_min_seconds: 1.0,
        putback_max_seconds: 3.0,
        reset_min_seconds: 4.0,
        reset_max_seconds: 12.0,
        free_throw_seconds: 1.0,
    }
}

fn base_shot_selection() -> ShotSelectionConstants {
    ShotSelectionConstants {
        by_position: PositionTable {
            pg: mix(0.35, 0.25, 0.40),
            sg: mix(0.33, 0.25, 0.42),
            sf: mix(0.40, 0.25, 0.35),
            pf: mix(0.53, 0.25, 0.22),
            c: mix(0.72, 0.20, 0.08),
        },
        transition_rim_bonus: 0.20,
        zone_three_bonus: 0.10,
        dunk_rate: PositionTable {
            pg: 0.05,
            sg: 0.10,
            sf: 0.20,
            pf: 0.30,
            c: 0.40,
        },
        putback_probability: 0.45,
        max_offensive_rebounds: 4,
    }
}

fn base_contest() -> ContestConstants {
    ContestConstants {
        base_distance_ft: 6.5,
        distance_per_composite_point: 0.04,
        noise_sigma_ft: 2.0,
        wide_open_ft: 5.5,
        open_ft: 3.75,
        tight_ft: 2.0,
        zone_rim_tighten_ft: 1.0,
        zone_perimeter_loosen_ft: 1.0,
        transition_bonus_ft: 1.5,
        penalties: shots(
            tiers(0.0, 0.06, 0.14, 0.22),
            tiers(0.0, 0.10, 0.18, 0.26),
            tiers(0.0, 0.12, 0.22, 0.32),
            tiers(0.0, 0.03, 0.08, 0.15),
        ),
    }
}

pub fn base_constants() -> Constants {
    Constants {
        quarter_length_seconds: 720,
        shot_clock_seconds: 24,
        offensive_rebound_shot_clock_seconds: 14,
        timing: base_timing(),
        usage: UsageConstants {
            scoring_option_shares: [0.30, 0.20, 0.15],
        },
        shot_selection: base_shot_selection(),
        contest: base_contest(),
        block: ScaledEventConstants {
            shot_multiplier: shots(1.0, 0.4, 0.15, 0.6),
            tier_multiplier: tiers(0.0, 0.5, 1.0, 1.5),
        },
        shooting_foul: ScaledEventConstants {
            shot_multiplier: shots(1.0, 0.35, 0.18, 0.8),
            tier_multiplier: tiers(0.3, 0.6, 1.0, 1.4),
        },
        fouls: FoulConstants { foul_out_limit: 6 },
        intentional_foul: IntentionalFoulConstants {
            time_threshold_seconds: 60,
            min_margin: 2,
            max_margin: 6,
            seconds: 3.0,
            free_throws: 2,
        },
        rebound: ReboundConstants {
            offense_strategy: StrategyTable {
                standard: 1.0,
                crash: 1.2,
                conservative: 0.8,
            },
            defense_strategy: StrategyTable {
                standard: 1.0,
                crash: 0.9,
                conservative: 1.1,
            },
        },
        stamina: StaminaConstants {
            base_cost: 0.6,
            fatigue_range: 0.5,
            bench_recovery_rate: 0.05,
            performance_threshold: 80.0,
            performance_slope: 0.003,
        },
        substitution: SubstitutionConstants {
            stamina_threshold: 60.0,
        },
    }
}

/// Full production-equivalent content.
pub fn base_content() -> EngineContent {
    EngineContent {
        content_version: "test".to_string(),
        constants: base_constants(),
        weights: base_weights(),
        probabilities: base_probabilities(),
    }
}

/// A player with every attribute set to `value`.
pub fn uniform_player(name: &str, position: Position, value: u8) -> Player {
    Player {
        name: PlayerId(name.to_string()),
        position,
        attributes: Attributes::uniform(value),
    }
}

/// Ten identical players: a starter and a backup at each position, starters
/// first. Names are `"{team} {position}{1|2}"`.
pub fn uniform_team(name: &str, value: u8) -> Team {
    let players = (1..=2)
        .flat_map(|depth| {
            Position::ALL
                .iter()
                .map(move |&position| (depth, position))
        })
        .map(|(depth, position)| {
            uniform_player(&format!("{name} {position:?}{depth}"), position, value)
        })
        .collect();
    Team {
        name: name.to_string(),
        players,
        tactics: TacticalSettings::default(),
    }
}

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
