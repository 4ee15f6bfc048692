//! Current stamina per roster slot.
//!
//! The table is the only place current stamina lives. Active players pay a
//! per-possession cost; the bench recovers toward 100.

use crate::{Attribute, Player, StaminaConstants, LINEUP_SIZE};

pub const MAX_STAMINA: f64 = 100.0;

/// `base_cost * (1 + ((50 - stamina_attr) / 50) * fatigue_range)`, scaled by pace.
pub fn cost_per_possession(
    stamina_attribute: u8,
    pace_multiplier: f64,
    constants: &StaminaConstants,
) -> f64 {
    let conditioning = (50.0 - f64::from(stamina_attribute)) / 50.0;
    constants.base_cost * (1.0 + conditioning * constants.fatigue_range) * pace_multiplier
}

/// One possession of exponential recovery toward full.
pub fn recover(current: f64, rate: f64) -> f64 {
    current + (MAX_STAMINA - current) * rate
}

/// An update that left [0, 100] and was pulled back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaminaClamp {
    pub slot: usize,
    pub raw: f64,
    pub clamped_to: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaminaTable {
    current: Vec<f64>,
}

impl StaminaTable {
    /// Everyone starts fresh.
    pub fn new(roster_size: usize) -> Self {
        Self {
            current: vec![MAX_STAMINA; roster_size],
        }
    }

    pub fn get(&self, slot: usize) -> f64 {
        self.current.get(slot).copied().unwrap_or(0.0)
    }

    pub fn values(&self) -> &[f64] {
        &self.current
    }

    fn store(&mut self, slot: usize, raw: f64) -> Option<StaminaClamp> {
        let value = if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, MAX_STAMINA)
        };
        let entry = self.current.get_mut(slot)?;
        *entry = value;
        if raw.is_nan() || (value - raw).abs() > 0.0 {
            Some(StaminaClamp {
                slot,
                raw,
                clamped_to: value,
            })
        } else {
            None
        }
    }

    /// Drain the five active players and let everyone else recover. Returns
    /// any value that had to be clamped.
    pub fn apply_possession(
        &mut self,
        roster: &[Player],
        active: &[usize; LINEUP_SIZE],
        pace_multiplier: f64,
        constants: &StaminaConstants,
    ) -> Vec<StaminaClamp> {
        let mut clamps = Vec::new();
        for (slot, player) in roster.iter().enumerate() {
            let current = self.get(slot);
            let raw = if active.contains(&slot) {
                current
                    - cost_per_possession(
                        player.attribute(Attribute::Stamina),
                        pace_multiplier,
                        constants,
                    )
            } else {
                recover(current, constants.bench_recovery_rate)
            };
            clamps.extend(self.store(slot, raw));
        }
        clamps
    }
}
