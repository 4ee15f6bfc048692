//! Type definitions for `hoops_core`.
//!
//! Players, teams, tactics, possession records and game results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::box_score::BoxScore;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Players on the floor per team.
pub const LINEUP_SIZE: usize = 5;
/// Number of named attributes every player carries.
pub const ATTRIBUTE_COUNT: usize = 25;
/// Regulation quarters. Overtime is not simulated.
pub const QUARTERS: u8 = 4;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(PlayerId);

/// The five player ids on the floor for one team.
pub type Lineup = [PlayerId; LINEUP_SIZE];

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
    ];

    pub fn index(self) -> usize {
        match self {
            Position::PG => 0,
            Position::SG => 1,
            Position::SF => 2,
            Position::PF => 3,
            Position::C => 4,
        }
    }

    /// Steps along the PG..C spectrum.
    pub fn distance(self, other: Position) -> usize {
        self.index().abs_diff(other.index())
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    GripStrength,
    ArmStrength,
    CoreStrength,
    Agility,
    Acceleration,
    TopSpeed,
    Jumping,
    Reactions,
    Stamina,
    Balance,
    Height,
    Durability,
    Awareness,
    Creativity,
    Determination,
    Bravery,
    Consistency,
    Composure,
    Patience,
    HandEyeCoordination,
    ThrowAccuracy,
    FormTechnique,
    Finesse,
    Deception,
    Teamwork,
}

impl Attribute {
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::GripStrength,
        Attribute::ArmStrength,
        Attribute::CoreStrength,
        Attribute::Agility,
        Attribute::Acceleration,
        Attribute::TopSpeed,
        Attribute::Jumping,
        Attribute::Reactions,
        Attribute::Stamina,
        Attribute::Balance,
        Attribute::Height,
        Attribute::Durability,
        Attribute::Awareness,
        Attribute::Creativity,
        Attribute::Determination,
        Attribute::Bravery,
        Attribute::Consistency,
        Attribute::Composure,
        Attribute::Patience,
        Attribute::HandEyeCoordination,
        Attribute::ThrowAccuracy,
        Attribute::FormTechnique,
        Attribute::Finesse,
        Attribute::Deception,
        Attribute::Teamwork,
    ];
}

/// Attribute ratings keyed by name. A validated set holds all 25 keys, each in [0, 100].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<Attribute, u8>);

impl Attributes {
    /// Every attribute set to `value`.
    pub fn uniform(value: u8) -> Self {
        Attribute::ALL.iter().map(|&attr| (attr, value)).collect()
    }

    /// Missing keys read as 0; validation rejects such sets before a game starts.
    pub fn get(&self, attribute: Attribute) -> u8 {
        self.0.get(&attribute).copied().unwrap_or(0)
    }

    pub fn set(&mut self, attribute: Attribute, value: u8) {
        self.0.insert(attribute, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, u8)> + '_ {
        self.0.iter().map(|(&attr, &value)| (attr, value))
    }
}

impl FromIterator<(Attribute, u8)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (Attribute, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerId,
    pub position: Position,
    pub attributes: Attributes,
}

impl Player {
    pub fn attribute(&self, attribute: Attribute) -> u8 {
        self.attributes.get(attribute)
    }
}

// ---------------------------------------------------------------------------
// Teams and tactics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Fast,
    #[default]
    Standard,
    Slow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReboundingStrategy {
    #[default]
    Standard,
    Crash,
    Conservative,
}

fn default_man_defense_pct() -> u8 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TacticalSettings {
    #[serde(default)]
    pub pace: Pace,
    /// Share of possessions defended man-to-man; the rest is zone.
    #[serde(default = "default_man_defense_pct")]
    pub man_defense_pct: u8,
    #[serde(default)]
    pub scoring_option_1: Option<PlayerId>,
    #[serde(default)]
    pub scoring_option_2: Option<PlayerId>,
    #[serde(default)]
    pub scoring_option_3: Option<PlayerId>,
    /// Target minutes per player. Empty means equal allocation across the roster.
    #[serde(default)]
    pub minutes_allotment: BTreeMap<PlayerId, f64>,
    #[serde(default)]
    pub rebounding_strategy: ReboundingStrategy,
}

impl Default for TacticalSettings {
    fn default() -> Self {
        Self {
            pace: Pace::Standard,
            man_defense_pct: default_man_defense_pct(),
            scoring_option_1: None,
            scoring_option_2: None,
            scoring_option_3: None,
            minutes_allotment: BTreeMap::new(),
            rebounding_strategy: ReboundingStrategy::Standard,
        }
    }
}

impl TacticalSettings {
    pub fn zone_pct(&self) -> u8 {
        100u8.saturating_sub(self.man_defense_pct)
    }

    /// Scoring options in priority order.
    pub fn scoring_options(&self) -> [Option<&PlayerId>; 3] {
        [
            self.scoring_option_1.as_ref(),
            self.scoring_option_2.as_ref(),
            self.scoring_option_3.as_ref(),
        ]
    }
}

/// A roster plus tactics. The first five players start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
    #[serde(default)]
    pub tactics: TacticalSettings,
}

impl Team {
    /// Roster slot of the named player.
    pub fn slot_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|player| player.name == *id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];

    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// One value per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub home: T,
    pub away: T,
}

impl<T> PerSide<T> {
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

pub type Score = PerSide<u32>;

impl Score {
    /// Points ahead (positive) or behind (negative) from `side`'s perspective.
    #[allow(clippy::cast_possible_wrap)]
    pub fn differential(&self, side: Side) -> i32 {
        *self.get(side) as i32 - *self.get(side.opponent()) as i32
    }
}

// ---------------------------------------------------------------------------
// Possession types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    Rim,
    Midrange,
    Three,
    Dunk,
}

impl ShotType {
    pub fn points(self) -> u32 {
        match self {
            ShotType::Three => 3,
            ShotType::Rim | ShotType::Midrange | ShotType::Dunk => 2,
        }
    }

    /// Jump shots contested from the perimeter, as opposed to attacks at the basket.
    pub fn is_perimeter(self) -> bool {
        matches!(self, ShotType::Midrange | ShotType::Three)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContestTier {
    WideOpen,
    Open,
    Tight,
    VeryTight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossessionContext {
    pub quarter: u8,
    pub transition: bool,
    pub shot_clock: u32,
    /// Offense score minus defense score.
    pub score_differential: i32,
    /// Seconds left in the game, not just the quarter.
    pub game_time_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PossessionOutcome {
    MadeShot,
    MissedShot,
    BlockedShot,
    Turnover,
    Foul,
    IntentionalFoul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PossessionState {
    Start,
    ShotAttempt,
    Turnover,
    Made,
    Missed,
    Blocked,
    Fouled,
    Rebound,
    OffensePutback,
    FreeThrows,
    PossessionEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoulEvent {
    pub fouled_player: PlayerId,
    pub fouler: PlayerId,
    pub free_throws_awarded: u8,
    pub and_one: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeThrowResult {
    pub shooter: PlayerId,
    pub attempts: u8,
    pub makes: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotAttempt {
    pub shooter: PlayerId,
    pub defender: PlayerId,
    pub shot_type: ShotType,
    pub contest_tier: ContestTier,
    pub contest_distance_ft: f64,
    pub made: bool,
    pub blocked_by: Option<PlayerId>,
    pub fouled: bool,
    pub putback: bool,
}

impl ShotAttempt {
    pub fn points(&self) -> u32 {
        if self.made {
            self.shot_type.points()
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReboundKind {
    Offensive,
    Defensive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReboundEvent {
    pub player: PlayerId,
    pub side: Side,
    pub kind: ReboundKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverEvent {
    pub player: PlayerId,
    pub stolen_by: Option<PlayerId>,
}

// ---------------------------------------------------------------------------
// Trace types
// ---------------------------------------------------------------------------

/// Every point in a possession where a random number is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    TipOff,
    /// Whether a live-ball possession is pushed in transition.
    Transition,
    ShooterSelection,
    Turnover,
    Steal,
    ShotSelection,
    Dunk,
    HelpRotation,
    Block,
    ShootingFoul,
    FieldGoal,
    FreeThrow,
    OffensiveRebound,
    RebounderSelection,
    Putback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollTrace {
    pub decision: Decision,
    pub actor: PlayerId,
    /// Fatigue-adjusted composite fed into the probability, when one applies.
    pub composite: Option<f64>,
    pub probability: f64,
    pub roll: f64,
    pub success: bool,
    /// The probability left [0, 1] before clamping.
    pub clamped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestTrace {
    pub shooter: PlayerId,
    pub defender: PlayerId,
    pub shot_type: ShotType,
    pub defender_composite: f64,
    pub baseline_ft: f64,
    pub noise_ft: f64,
    pub distance_ft: f64,
    pub tier: ContestTier,
    pub penalty: f64,
    /// The distance came out NaN and was forced to zero.
    pub clamped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PossessionTrace {
    pub transitions: Vec<(PossessionState, PossessionState)>,
    pub rolls: Vec<RollTrace>,
    pub contests: Vec<ContestTrace>,
}

impl PossessionTrace {
    pub fn any_clamped(&self) -> bool {
        self.rolls.iter().any(|roll| roll.clamped) || self.contests.iter().any(|c| c.clamped)
    }

    pub fn rolls_for(&self, decision: Decision) -> impl Iterator<Item = &RollTrace> {
        self.rolls.iter().filter(move |roll| roll.decision == decision)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionResult {
    pub offense: Side,
    pub context: PossessionContext,
    pub outcome: PossessionOutcome,
    /// Always `field_goal_points + free_throws.makes`.
    pub points_scored: u32,
    pub field_goal_points: u32,
    pub foul: Option<FoulEvent>,
    pub free_throws: Option<FreeThrowResult>,
    pub scoring_player: Option<PlayerId>,
    pub shots: SmallVec<[ShotAttempt; 2]>,
    pub rebounds: SmallVec<[ReboundEvent; 2]>,
    pub turnover: Option<TurnoverEvent>,
    /// Real-valued seconds used by the possession.
    pub duration_seconds: f64,
    /// `duration_seconds` rounded to the whole seconds the clock applies.
    pub clock_seconds: u32,
    pub offense_lineup: Lineup,
    pub defense_lineup: Lineup,
    pub trace: PossessionTrace,
}

impl PossessionResult {
    pub fn free_throws_made(&self) -> u32 {
        self.free_throws.as_ref().map_or(0, |ft| u32::from(ft.makes))
    }
}

// ---------------------------------------------------------------------------
// Quarter and game results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubstitutionReason {
    Fatigue,
    Minutes,
    FoulOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionEvent {
    pub side: Side,
    pub quarter: u8,
    /// Quarter clock when the swap happened.
    pub time_remaining: u32,
    pub player_out: PlayerId,
    pub player_in: PlayerId,
    pub reason: SubstitutionReason,
}

/// A stamina update that left [0, 100] and was clamped back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampEvent {
    pub quarter: u8,
    pub side: Side,
    pub player: PlayerId,
    pub raw: f64,
    pub clamped_to: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterResult {
    pub quarter: u8,
    pub possessions: Vec<PossessionResult>,
    pub substitutions: Vec<SubstitutionEvent>,
    /// Points scored within this quarter.
    pub points: Score,
    /// Running score at the end of this quarter.
    pub score_after: Score,
    pub team_fouls: PerSide<u8>,
    pub clamp_events: Vec<ClampEvent>,
}

impl QuarterResult {
    pub fn possession_count(&self, side: Side) -> usize {
        self.possessions
            .iter()
            .filter(|possession| possession.offense == side)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub tip_off_winner: Side,
    /// Opening jump, rolled for the home side.
    pub tip_off: RollTrace,
    pub quarters: Vec<QuarterResult>,
    pub final_score: Score,
    pub box_score: BoxScore,
}

impl GameResult {
    pub fn possessions(&self) -> impl Iterator<Item = &PossessionResult> {
        self.quarters.iter().flat_map(|quarter| &quarter.possessions)
    }
}
