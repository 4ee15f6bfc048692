use thiserror::Error;

use crate::{Attribute, Event, Mechanic, PlayerId};

/// Setup-time failures. A game never starts when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("player '{player}' has {found} attributes, expected {expected}")]
    AttributeCount {
        player: PlayerId,
        expected: usize,
        found: usize,
    },

    #[error("player '{player}' attribute {attribute:?} is {value}, outside [0, 100]")]
    AttributeOutOfRange {
        player: PlayerId,
        attribute: Attribute,
        value: u8,
    },

    #[error("team '{team}' has {found} players, at least {required} are needed")]
    RosterTooSmall {
        team: String,
        found: usize,
        required: usize,
    },

    #[error("team '{team}' lists player '{player}' more than once")]
    DuplicatePlayer { team: String, player: PlayerId },

    #[error("team '{team}' man_defense_pct is {value}, outside [0, 100]")]
    ManDefenseOutOfRange { team: String, value: u8 },

    #[error("team '{team}' scoring option '{player}' is not on the roster")]
    UnknownScoringOption { team: String, player: PlayerId },

    #[error("team '{team}' minutes allotment names unknown player '{player}'")]
    UnknownAllotmentPlayer { team: String, player: PlayerId },

    #[error("team '{team}' allots {minutes} minutes to '{player}'")]
    InvalidAllotment {
        team: String,
        player: PlayerId,
        minutes: f64,
    },

    #[error("weight table {mechanic:?} sums to {sum}, expected 1.0")]
    WeightSum { mechanic: Mechanic, sum: f64 },

    #[error("weight table {mechanic:?} gives {attribute:?} a negative coefficient {coefficient}")]
    NegativeWeight {
        mechanic: Mechanic,
        attribute: Attribute,
        coefficient: f64,
    },

    #[error("probability curve {event:?}: {reason}")]
    InvalidProbability { event: Event, reason: String },

    #[error("constant '{name}': {reason}")]
    InvalidConstant { name: &'static str, reason: String },
}
