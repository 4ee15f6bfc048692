//! Ball-security versus steal pressure.

use rand::Rng;

use crate::possession::OnCourt;
use crate::probability::{effective_composite, event_chance, event_probability, roll, Clamped};
use crate::{Decision, EngineContent, Event, Mechanic, PossessionTrace, TurnoverEvent};

/// Matchup composite for a turnover: 50 when ball security equals steal
/// pressure, rising as the defender's hands outclass the handler's.
pub fn turnover_composite(handler: &OnCourt, defender: &OnCourt, content: &EngineContent) -> f64 {
    let security = effective_composite(
        handler.player,
        handler.stamina,
        Mechanic::BallSecurity,
        content,
    );
    let pressure =
        effective_composite(defender.player, defender.stamina, Mechanic::Steal, content);
    Clamped::new(50.0 + (pressure - security) / 2.0, 0.0, 100.0).value
}

pub fn turnover_probability(
    handler: &OnCourt,
    defender: &OnCourt,
    content: &EngineContent,
) -> (f64, Clamped) {
    let composite = turnover_composite(handler, defender, content);
    let p = event_probability(content.probabilities.get(Event::Turnover), composite);
    (composite, p)
}

/// Roll for a turnover and, when one happens, whether the defender stole it.
pub fn resolve_turnover(
    handler: &OnCourt,
    defender: &OnCourt,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> Option<TurnoverEvent> {
    let (composite, p) = turnover_probability(handler, defender, content);
    let turnover = roll(rng, Decision::Turnover, &handler.player.name, Some(composite), p);
    let lost = turnover.success;
    trace.rolls.push(turnover);
    if !lost {
        return None;
    }

    let (composite, p) = event_chance(defender.player, defender.stamina, Event::Steal, content);
    let steal = roll(rng, Decision::Steal, &defender.player.name, Some(composite), p);
    let stolen_by = steal.success.then(|| defender.player.name.clone());
    trace.rolls.push(steal);
    Some(TurnoverEvent {
        player: handler.player.name.clone(),
        stolen_by,
    })
}
