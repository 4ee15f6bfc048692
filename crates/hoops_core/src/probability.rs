//! Composite scores and the composite-driven sigmoid probability curve.
//!
//! Pure functions. Randomness only enters through [`roll`] and
//! [`weighted_choice`], which each draw exactly one number from the caller's RNG.

use rand::Rng;

use crate::{
    Decision, EngineContent, Event, Mechanic, Player, PlayerId, ProbabilityParams, RollTrace,
    StaminaConstants, WeightTable,
};

/// A value forced into its valid range, remembering whether that changed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub value: f64,
    pub clamped: bool,
}

impl Clamped {
    pub fn new(raw: f64, min: f64, max: f64) -> Self {
        // NaN collapses to the lower bound.
        let value = if raw.is_nan() { min } else { raw.clamp(min, max) };
        Self {
            value,
            clamped: raw.is_nan() || (value - raw).abs() > 0.0,
        }
    }

    pub fn unit(raw: f64) -> Self {
        Self::new(raw, 0.0, 1.0)
    }

    /// Chain a further adjustment, keeping the clamp flag sticky.
    pub fn then(self, f: impl FnOnce(f64) -> f64) -> Self {
        let next = Self::unit(f(self.value));
        Self {
            value: next.value,
            clamped: self.clamped || next.clamped,
        }
    }
}

/// Weighted attribute mix in [0, 100].
pub fn composite(player: &Player, weights: &WeightTable) -> f64 {
    weights
        .iter()
        .map(|(attribute, coefficient)| f64::from(player.attribute(attribute)) * coefficient)
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// `base_rate + (1 - base_rate) * sigmoid(k * (composite - 50))`, clamped to [0, 1].
pub fn probability(base_rate: f64, composite: f64, k: f64) -> Clamped {
    Clamped::unit(base_rate + (1.0 - base_rate) * sigmoid(k * (composite - 50.0)))
}

/// Curve for a configured event, scaled by its ceiling.
pub fn event_probability(params: &ProbabilityParams, composite: f64) -> Clamped {
    probability(params.base_rate, composite, params.k).then(|p| p * params.ceiling)
}

/// Composite multiplier for a tired player. 1.0 at or above the threshold.
pub fn fatigue_modifier(current_stamina: f64, constants: &StaminaConstants) -> f64 {
    let deficit = (constants.performance_threshold - current_stamina).max(0.0);
    (1.0 - deficit * constants.performance_slope).max(0.0)
}

/// Composite as it plays on the floor: raw composite scaled by fatigue.
pub fn effective_composite(
    player: &Player,
    current_stamina: f64,
    mechanic: Mechanic,
    content: &EngineContent,
) -> f64 {
    composite(player, content.weights.get(mechanic))
        * fatigue_modifier(current_stamina, &content.constants.stamina)
}

/// Effective composite plus the event's probability for it.
pub fn event_chance(
    player: &Player,
    current_stamina: f64,
    event: Event,
    content: &EngineContent,
) -> (f64, Clamped) {
    let composite = effective_composite(player, current_stamina, event.mechanic(), content);
    let p = event_probability(content.probabilities.get(event), composite);
    (composite, p)
}

/// Draw once against `p` and record the decision.
pub fn roll(
    rng: &mut impl Rng,
    decision: Decision,
    actor: &PlayerId,
    composite: Option<f64>,
    p: Clamped,
) -> RollTrace {
    let rolled: f64 = rng.gen();
    RollTrace {
        decision,
        actor: actor.clone(),
        composite,
        probability: p.value,
        roll: rolled,
        success: rolled < p.value,
        clamped: p.clamped,
    }
}

/// Outcome of a weighted categorical draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub index: usize,
    /// Chosen weight as a share of the total.
    pub share: f64,
    pub roll: f64,
}

/// Pick an index with probability proportional to its weight. Draws exactly
/// one number; degenerate weights (all zero, empty) fall back to index 0.
pub fn weighted_choice(rng: &mut impl Rng, weights: &[f64]) -> Choice {
    let rolled: f64 = rng.gen();
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return Choice {
            index: 0,
            share: 1.0,
            roll: rolled,
        };
    }
    let target = rolled * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        last_positive = index;
        cumulative += weight;
        if target < cumulative {
            return Choice {
                index,
                share: weight / total,
                roll: rolled,
            };
        }
    }
    // Floating-point shortfall at the top of the range.
    Choice {
        index: last_positive,
        share: weights[last_positive] / total,
        roll: rolled,
    }
}
