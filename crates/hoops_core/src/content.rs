//! Tuning content: attribute weight tables, per-event probability curves and
//! engine constants. Loaded once, validated at setup, immutable afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Attribute, ContestTier, Pace, Position, ReboundingStrategy, ShotType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineContent {
    pub content_version: String,
    pub constants: Constants,
    pub weights: WeightTables,
    pub probabilities: ProbabilityTables,
}

// ---------------------------------------------------------------------------
// Weight tables
// ---------------------------------------------------------------------------

/// Attribute mixes that composites are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanic {
    Rim,
    Midrange,
    Three,
    Dunk,
    FreeThrow,
    Contest,
    Block,
    Steal,
    BallSecurity,
    FoulDiscipline,
    Rebound,
    HelpDefense,
    TipOff,
}

impl Mechanic {
    pub const ALL: [Mechanic; 13] = [
        Mechanic::Rim,
        Mechanic::Midrange,
        Mechanic::Three,
        Mechanic::Dunk,
        Mechanic::FreeThrow,
        Mechanic::Contest,
        Mechanic::Block,
        Mechanic::Steal,
        Mechanic::BallSecurity,
        Mechanic::FoulDiscipline,
        Mechanic::Rebound,
        Mechanic::HelpDefense,
        Mechanic::TipOff,
    ];

    pub fn for_shot(shot_type: ShotType) -> Mechanic {
        match shot_type {
            ShotType::Rim => Mechanic::Rim,
            ShotType::Midrange => Mechanic::Midrange,
            ShotType::Three => Mechanic::Three,
            ShotType::Dunk => Mechanic::Dunk,
        }
    }
}

/// Attribute → coefficient. Coefficients sum to 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<Attribute, f64>);

impl WeightTable {
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.0.iter().map(|(&attr, &coeff)| (attr, coeff))
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Attribute, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (Attribute, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTables {
    pub rim: WeightTable,
    pub midrange: WeightTable,
    pub three: WeightTable,
    pub dunk: WeightTable,
    pub free_throw: WeightTable,
    pub contest: WeightTable,
    pub block: WeightTable,
    pub steal: WeightTable,
    pub ball_security: WeightTable,
    pub foul_discipline: WeightTable,
    pub rebound: WeightTable,
    pub help_defense: WeightTable,
    pub tip_off: WeightTable,
}

impl WeightTables {
    pub fn get(&self, mechanic: Mechanic) -> &WeightTable {
        match mechanic {
            Mechanic::Rim => &self.rim,
            Mechanic::Midrange => &self.midrange,
            Mechanic::Three => &self.three,
            Mechanic::Dunk => &self.dunk,
            Mechanic::FreeThrow => &self.free_throw,
            Mechanic::Contest => &self.contest,
            Mechanic::Block => &self.block,
            Mechanic::Steal => &self.steal,
            Mechanic::BallSecurity => &self.ball_security,
            Mechanic::FoulDiscipline => &self.foul_discipline,
            Mechanic::Rebound => &self.rebound,
            Mechanic::HelpDefense => &self.help_defense,
            Mechanic::TipOff => &self.tip_off,
        }
    }
}

// ---------------------------------------------------------------------------
// Probability curves
// ---------------------------------------------------------------------------

/// Events resolved by a composite-driven sigmoid roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Rim,
    Midrange,
    Three,
    Dunk,
    FreeThrow,
    Block,
    Steal,
    Turnover,
    ShootingFoul,
    OffensiveRebound,
    HelpRotation,
    TipOff,
}

impl Event {
    pub const ALL: [Event; 12] = [
        Event::Rim,
        Event::Midrange,
        Event::Three,
        Event::Dunk,
        Event::FreeThrow,
        Event::Block,
        Event::Steal,
        Event::Turnover,
        Event::ShootingFoul,
        Event::OffensiveRebound,
        Event::HelpRotation,
        Event::TipOff,
    ];

    pub fn for_shot(shot_type: ShotType) -> Event {
        match shot_type {
            ShotType::Rim => Event::Rim,
            ShotType::Midrange => Event::Midrange,
            ShotType::Three => Event::Three,
            ShotType::Dunk => Event::Dunk,
        }
    }

    /// Weight table the event's composite is computed from.
    pub fn mechanic(self) -> Mechanic {
        match self {
            Event::Rim => Mechanic::Rim,
            Event::Midrange => Mechanic::Midrange,
            Event::Three => Mechanic::Three,
            Event::Dunk => Mechanic::Dunk,
            Event::FreeThrow => Mechanic::FreeThrow,
            Event::Block => Mechanic::Block,
            Event::Steal => Mechanic::Steal,
            Event::Turnover => Mechanic::BallSecurity,
            Event::ShootingFoul => Mechanic::FoulDiscipline,
            Event::OffensiveRebound => Mechanic::Rebound,
            Event::HelpRotation => Mechanic::HelpDefense,
            Event::TipOff => Mechanic::TipOff,
        }
    }
}

/// `ceiling * (base_rate + (1 - base_rate) * sigmoid(k * (composite - 50)))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityParams {
    pub base_rate: f64,
    pub k: f64,
    /// Scales the curve for rare events. 1.0 for shots.
    pub ceiling: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTables {
    pub rim: ProbabilityParams,
    pub midrange: ProbabilityParams,
    pub three: ProbabilityParams,
    pub dunk: ProbabilityParams,
    pub free_throw: ProbabilityParams,
    pub block: ProbabilityParams,
    pub steal: ProbabilityParams,
    pub turnover: ProbabilityParams,
    pub shooting_foul: ProbabilityParams,
    pub offensive_rebound: ProbabilityParams,
    pub help_rotation: ProbabilityParams,
    pub tip_off: ProbabilityParams,
}

impl ProbabilityTables {
    pub fn get(&self, event: Event) -> &ProbabilityParams {
        match event {
            Event::Rim => &self.rim,
            Event::Midrange => &self.midrange,
            Event::Three => &self.three,
            Event::Dunk => &self.dunk,
            Event::FreeThrow => &self.free_throw,
            Event::Block => &self.block,
            Event::Steal => &self.steal,
            Event::Turnover => &self.turnover,
            Event::ShootingFoul => &self.shooting_foul,
            Event::OffensiveRebound => &self.offensive_rebound,
            Event::HelpRotation => &self.help_rotation,
            Event::TipOff => &self.tip_off,
        }
    }
}

// ---------------------------------------------------------------------------
// Keyed value tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotTable<T> {
    pub rim: T,
    pub midrange: T,
    pub three: T,
    pub dunk: T,
}

impl<T> ShotTable<T> {
    pub fn get(&self, shot_type: ShotType) -> &T {
        match shot_type {
            ShotType::Rim => &self.rim,
            ShotType::Midrange => &self.midrange,
            ShotType::Three => &self.three,
            ShotType::Dunk => &self.dunk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub wide_open: T,
    pub open: T,
    pub tight: T,
    pub very_tight: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: ContestTier) -> &T {
        match tier {
            ContestTier::WideOpen => &self.wide_open,
            ContestTier::Open => &self.open,
            ContestTier::Tight => &self.tight,
            ContestTier::VeryTight => &self.very_tight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTable<T> {
    pub pg: T,
    pub sg: T,
    pub sf: T,
    pub pf: T,
    pub c: T,
}

impl<T> PositionTable<T> {
    pub fn get(&self, position: Position) -> &T {
        match position {
            Position::PG => &self.pg,
            Position::SG => &self.sg,
            Position::SF => &self.sf,
            Position::PF => &self.pf,
            Position::C => &self.c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceTable<T> {
    pub fast: T,
    pub standard: T,
    pub slow: T,
}

impl<T> PaceTable<T> {
    pub fn get(&self, pace: Pace) -> &T {
        match pace {
            Pace::Fast => &self.fast,
            Pace::Standard => &self.standard,
            Pace::Slow => &self.slow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyTable<T> {
    pub standard: T,
    pub crash: T,
    pub conservative: T,
}

impl<T> StrategyTable<T> {
    pub fn get(&self, strategy: ReboundingStrategy) -> &T {
        match strategy {
            ReboundingStrategy::Standard => &self.standard,
            ReboundingStrategy::Crash => &self.crash,
            ReboundingStrategy::Conservative => &self.conservative,
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub quarter_length_seconds: u32,
    pub shot_clock_seconds: u32,
    pub offensive_rebound_shot_clock_seconds: u32,
    pub timing: TimingConstants,
    pub usage: UsageConstants,
    pub shot_selection: ShotSelectionConstants,
    pub contest: ContestConstants,
    pub block: ScaledEventConstants,
    pub shooting_foul: ScaledEventConstants,
    pub fouls: FoulConstants,
    pub intentional_foul: IntentionalFoulConstants,
    pub rebound: ReboundConstants,
    pub stamina: StaminaConstants,
    pub substitution: SubstitutionConstants,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceProfile {
    /// Half-court attempt time band, seconds.
    pub min_attempt_seconds: f64,
    pub max_attempt_seconds: f64,
    /// Chance a possession after a turnover or defensive rebound is played in transition.
    pub transition_probability: f64,
    pub stamina_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConstants {
    pub pace: PaceTable<PaceProfile>,
    pub transition_min_seconds: f64,
    pub transition_max_seconds: f64,
    pub putback_min_seconds: f64,
    pub putback_max_seconds: f64,
    /// Time to set up a fresh attempt after an offensive rebound that isn't put back.
    pub reset_min_seconds: f64,
    pub reset_max_seconds: f64,
    pub free_throw_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageConstants {
    /// Usage share of scoring options 1, 2 and 3.
    pub scoring_option_shares: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotMix {
    pub rim: f64,
    pub midrange: f64,
    pub three: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotSelectionConstants {
    pub by_position: PositionTable<ShotMix>,
    /// Weight added to rim attempts in transition.
    pub transition_rim_bonus: f64,
    /// Weight added to threes against a full zone; scaled by zone share.
    pub zone_three_bonus: f64,
    /// Per-position chance a rim attempt by a composite-50 dunker is a dunk.
    pub dunk_rate: PositionTable<f64>,
    pub putback_probability: f64,
    pub max_offensive_rebounds: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestConstants {
    /// Baseline distance for a composite-0 defender.
    pub base_distance_ft: f64,
    pub distance_per_composite_point: f64,
    pub noise_sigma_ft: f64,
    /// Lower bounds of the wide-open, open and tight tiers.
    pub wide_open_ft: f64,
    pub open_ft: f64,
    pub tight_ft: f64,
    /// Distance removed from rim contests against a full zone.
    pub zone_rim_tighten_ft: f64,
    /// Distance added to perimeter contests against a full zone.
    pub zone_perimeter_loosen_ft: f64,
    pub transition_bonus_ft: f64,
    pub penalties: ShotTable<TierTable<f64>>,
}

/// Multipliers applied on top of an event's curve for shot type and contest tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledEventConstants {
    pub shot_multiplier: ShotTable<f64>,
    pub tier_multiplier: TierTable<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoulConstants {
    pub foul_out_limit: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentionalFoulConstants {
    /// Game seconds remaining below which trailing teams foul.
    pub time_threshold_seconds: u32,
    pub min_margin: u32,
    pub max_margin: u32,
    pub seconds: f64,
    pub free_throws: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReboundConstants {
    /// Multiplier on offensive rebound chance by the offense's strategy.
    pub offense_strategy: StrategyTable<f64>,
    /// Multiplier on offensive rebound chance by the defense's strategy.
    pub defense_strategy: StrategyTable<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaminaConstants {
    pub base_cost: f64,
    pub fatigue_range: f64,
    pub bench_recovery_rate: f64,
    /// Current stamina below which composites start to degrade.
    pub performance_threshold: f64,
    /// Composite multiplier lost per stamina point below the threshold.
    pub performance_slope: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionConstants {
    pub stamina_threshold: f64,
}
