//! Possession state machine.
//!
//! One call runs a single possession from `Start` to `PossessionEnd`,
//! consuming every roll in a fixed order and recording each state change in
//! the trace.

use rand::Rng;
use smallvec::SmallVec;

use crate::clock::round_duration;
use crate::defense::{assign_primary_defender, contesting_defender};
use crate::fouls::{free_throws_awarded, intentional_foul_target, shoot_free_throws};
use crate::probability::{roll, weighted_choice, Clamped};
use crate::rebound::resolve_rebound;
use crate::shot::{putback_shot_type, resolve_shot, select_shot_type, ShotSetup};
use crate::turnover::resolve_turnover;
use crate::{
    Decision, EngineContent, FoulEvent, FreeThrowResult, Lineup, Player, PossessionContext,
    PossessionOutcome, PossessionResult, PossessionState, PossessionTrace, ReboundEvent,
    ReboundKind, RollTrace, ShotAttempt, Side, TacticalSettings, TurnoverEvent,
    UsageConstants, LINEUP_SIZE,
};

/// A player on the floor with their current stamina.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnCourt<'a> {
    pub player: &'a Player,
    pub stamina: f64,
}

/// The five players one team has on the floor, plus its tactics.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit<'a> {
    pub side: Side,
    pub players: [OnCourt<'a>; LINEUP_SIZE],
    pub tactics: &'a TacticalSettings,
}

impl Unit<'_> {
    pub fn lineup(&self) -> Lineup {
        std::array::from_fn(|slot| self.players[slot].player.name.clone())
    }

    pub fn zone_pct(&self) -> u8 {
        self.tactics.zone_pct()
    }
}

/// Usage share per slot. Scoring options on the floor take their fixed
/// share; everyone else splits what is left evenly.
pub fn usage_weights(offense: &Unit, constants: &UsageConstants) -> [f64; LINEUP_SIZE] {
    let mut weights = [0.0; LINEUP_SIZE];
    let mut claimed = [false; LINEUP_SIZE];
    for (option, share) in offense
        .tactics
        .scoring_options()
        .into_iter()
        .zip(constants.scoring_option_shares)
    {
        let Some(id) = option else { continue };
        if let Some(slot) = offense.players.iter().position(|p| p.player.name == *id) {
            weights[slot] += share;
            claimed[slot] = true;
        }
    }
    let others = claimed.iter().filter(|c| !**c).count();
    if others > 0 {
        let remaining = (1.0 - weights.iter().sum::<f64>()).max(0.0);
        #[allow(clippy::cast_precision_loss)]
        let each = remaining / others as f64;
        for (weight, taken) in weights.iter_mut().zip(claimed) {
            if !taken {
                *weight = each;
            }
        }
    }
    weights
}

fn choose_shooter(
    offense: &Unit,
    content: &EngineContent,
    rng: &mut impl Rng,
    trace: &mut PossessionTrace,
) -> usize {
    let weights = usage_weights(offense, &content.constants.usage);
    let choice = weighted_choice(rng, &weights);
    trace.rolls.push(RollTrace {
        decision: Decision::ShooterSelection,
        actor: offense.players[choice.index].player.name.clone(),
        composite: None,
        probability: choice.share,
        roll: choice.roll,
        success: true,
        clamped: false,
    });
    choice.index
}

fn draw_seconds(rng: &mut impl Rng, min: f64, max: f64, cap: f64) -> f64 {
    rng.gen_range(min..=max).min(cap)
}

/// The next shot: who takes it and whether it is a putback.
#[derive(Debug, Clone, Copy)]
struct PendingShot {
    shooter: usize,
    putback: bool,
}

struct Possession<'u, 'a> {
    offense: &'u Unit<'a>,
    defense: &'u Unit<'a>,
    context: PossessionContext,
    content: &'u EngineContent,
    trace: PossessionTrace,
    shots: SmallVec<[ShotAttempt; 2]>,
    rebounds: SmallVec<[ReboundEvent; 2]>,
    turnover: Option<TurnoverEvent>,
    foul: Option<FoulEvent>,
    free_throws: Option<FreeThrowResult>,
    /// Shooter slot and attempts for the pending free throws.
    awarded: Option<(usize, u8)>,
    pending: PendingShot,
    offensive_rebounds: u8,
    duration: f64,
}

impl<'u, 'a> Possession<'u, 'a> {
    fn new(
        offense: &'u Unit<'a>,
        defense: &'u Unit<'a>,
        context: PossessionContext,
        content: &'u EngineContent,
    ) -> Self {
        Self {
            offense,
            defense,
            context,
            content,
            trace: PossessionTrace::default(),
            shots: SmallVec::new(),
            rebounds: SmallVec::new(),
            turnover: None,
            foul: None,
            free_throws: None,
            awarded: None,
            pending: PendingShot {
                shooter: 0,
                putback: false,
            },
            offensive_rebounds: 0,
            duration: 0.0,
        }
    }

    fn step(&mut self, state: PossessionState, rng: &mut impl Rng) -> PossessionState {
        match state {
            PossessionState::Start => self.start(rng),
            PossessionState::ShotAttempt => self.shoot(rng),
            PossessionState::Made | PossessionState::Turnover | PossessionState::PossessionEnd => {
                PossessionState::PossessionEnd
            }
            PossessionState::Missed | PossessionState::Blocked => PossessionState::Rebound,
            PossessionState::Fouled => PossessionState::FreeThrows,
            PossessionState::Rebound => self.rebound(rng),
            PossessionState::OffensePutback => self.second_chance(rng),
            PossessionState::FreeThrows => self.free_throws(rng),
        }
    }

    fn start(&mut self, rng: &mut impl Rng) -> PossessionState {
        let timing = &self.content.constants.timing;
        let shot_clock = f64::from(self.context.shot_clock);
        let seconds = if self.context.transition {
            draw_seconds(
                rng,
                timing.transition_min_seconds,
                timing.transition_max_seconds,
                shot_clock,
            )
        } else {
            let pace = timing.pace.get(self.offense.tactics.pace);
            draw_seconds(
                rng,
                pace.min_attempt_seconds,
                pace.max_attempt_seconds,
                shot_clock,
            )
        };
        self.duration += seconds;

        let handler = choose_shooter(self.offense, self.content, rng, &mut self.trace);
        let handler_court = &self.offense.players[handler];
        let primary = assign_primary_defender(handler_court.player.position, self.defense);
        if let Some(event) = resolve_turnover(
            handler_court,
            &self.defense.players[primary],
            self.content,
            rng,
            &mut self.trace,
        ) {
            self.turnover = Some(event);
            return PossessionState::Turnover;
        }
        self.pending = PendingShot {
            shooter: handler,
            putback: false,
        };
        PossessionState::ShotAttempt
    }

    fn shoot(&mut self, rng: &mut impl Rng) -> PossessionState {
        let PendingShot { shooter, putback } = self.pending;
        let shooter_court = &self.offense.players[shooter];
        let zone_pct = self.defense.zone_pct();
        let transition = self.context.transition && self.offensive_rebounds == 0;
        let shot_type = if putback {
            putback_shot_type(shooter_court, self.content, rng, &mut self.trace)
        } else {
            select_shot_type(
                shooter_court,
                transition,
                zone_pct,
                self.content,
                rng,
                &mut self.trace,
            )
        };

        let primary = assign_primary_defender(shooter_court.player.position, self.defense);
        let contesting = contesting_defender(
            shot_type,
            self.defense,
            primary,
            self.content,
            rng,
            &mut self.trace,
        );
        let setup = ShotSetup {
            shooter: shooter_court,
            defender: &self.defense.players[contesting],
            shot_type,
            zone_pct,
            transition,
            putback,
        };
        let attempt = resolve_shot(&setup, self.content, rng, &mut self.trace);

        let next = if attempt.fouled {
            let awarded = free_throws_awarded(shot_type, attempt.made);
            self.foul = Some(FoulEvent {
                fouled_player: attempt.shooter.clone(),
                fouler: attempt.defender.clone(),
                free_throws_awarded: awarded,
                and_one: attempt.made,
            });
            self.awarded = Some((shooter, awarded));
            PossessionState::Fouled
        } else if attempt.made {
            PossessionState::Made
        } else if attempt.blocked_by.is_some() {
            PossessionState::Blocked
        } else {
            PossessionState::Missed
        };
        self.shots.push(attempt);
        next
    }

    fn rebound(&mut self, rng: &mut impl Rng) -> PossessionState {
        let max = self.content.constants.shot_selection.max_offensive_rebounds;
        let board = resolve_rebound(
            self.offense,
            self.defense,
            self.offensive_rebounds < max,
            self.content,
            rng,
            &mut self.trace,
        );
        let unit = match board.kind {
            ReboundKind::Offensive => self.offense,
            ReboundKind::Defensive => self.defense,
        };
        self.rebounds.push(ReboundEvent {
            player: unit.players[board.slot].player.name.clone(),
            side: unit.side,
            kind: board.kind,
        });
        match board.kind {
            ReboundKind::Defensive => PossessionState::PossessionEnd,
            ReboundKind::Offensive => {
                self.offensive_rebounds += 1;
                self.pending = PendingShot {
                    shooter: board.slot,
                    putback: false,
                };
                PossessionState::OffensePutback
            }
        }
    }

    /// After an offensive rebound: the rebounder goes straight back up, or
    /// the offense resets under a fresh shot clock.
    fn second_chance(&mut self, rng: &mut impl Rng) -> PossessionState {
        let constants = &self.content.constants;
        let shot_clock = f64::from(constants.offensive_rebound_shot_clock_seconds);
        let rebounder = &self.offense.players[self.pending.shooter];
        let p = Clamped::unit(constants.shot_selection.putback_probability);
        let putback = roll(rng, Decision::Putback, &rebounder.player.name, None, p);
        let goes_back_up = putback.success;
        self.trace.rolls.push(putback);

        let timing = &constants.timing;
        if goes_back_up {
            self.duration += draw_seconds(
                rng,
                timing.putback_min_seconds,
                timing.putback_max_seconds,
                shot_clock,
            );
            self.pending.putback = true;
        } else {
            self.duration += draw_seconds(
                rng,
                timing.reset_min_seconds,
                timing.reset_max_seconds,
                shot_clock,
            );
            self.pending = PendingShot {
                shooter: choose_shooter(self.offense, self.content, rng, &mut self.trace),
                putback: false,
            };
        }
        PossessionState::ShotAttempt
    }

    fn free_throws(&mut self, rng: &mut impl Rng) -> PossessionState {
        if let Some((shooter, attempts)) = self.awarded.take() {
            let result = shoot_free_throws(
                &self.offense.players[shooter],
                attempts,
                self.content,
                rng,
                &mut self.trace,
            );
            self.duration +=
                f64::from(attempts) * self.content.constants.timing.free_throw_seconds;
            self.free_throws = Some(result);
        }
        PossessionState::PossessionEnd
    }

    fn outcome(&self) -> PossessionOutcome {
        if self.turnover.is_some() {
            return PossessionOutcome::Turnover;
        }
        if self.foul.is_some() {
            return PossessionOutcome::Foul;
        }
        match self.shots.last() {
            Some(shot) if shot.made => PossessionOutcome::MadeShot,
            Some(shot) if shot.blocked_by.is_some() => PossessionOutcome::BlockedShot,
            _ => PossessionOutcome::MissedShot,
        }
    }

    fn finish(self, outcome: PossessionOutcome) -> PossessionResult {
        let field_goal_points: u32 = self.shots.iter().map(ShotAttempt::points).sum();
        let free_throw_points = self
            .free_throws
            .as_ref()
            .map_or(0, |ft| u32::from(ft.makes));
        let scoring_player = if field_goal_points > 0 {
            self.shots
                .iter()
                .rev()
                .find(|shot| shot.made)
                .map(|shot| shot.shooter.clone())
        } else if free_throw_points > 0 {
            self.free_throws.as_ref().map(|ft| ft.shooter.clone())
        } else {
            None
        };
        PossessionResult {
            offense: self.offense.side,
            context: self.context,
            outcome,
            points_scored: field_goal_points + free_throw_points,
            field_goal_points,
            foul: self.foul,
            free_throws: self.free_throws,
            scoring_player,
            shots: self.shots,
            rebounds: self.rebounds,
            turnover: self.turnover,
            duration_seconds: self.duration,
            clock_seconds: round_duration(self.duration),
            offense_lineup: self.offense.lineup(),
            defense_lineup: self.defense.lineup(),
            trace: self.trace,
        }
    }
}

/// Play one possession through the state machine.
pub fn run_possession(
    offense: &Unit,
    defense: &Unit,
    context: PossessionContext,
    content: &EngineContent,
    rng: &mut impl Rng,
) -> PossessionResult {
    let mut possession = Possession::new(offense, defense, context, content);
    let mut state = PossessionState::Start;
    while state != PossessionState::PossessionEnd {
        let next = possession.step(state, rng);
        possession.trace.transitions.push((state, next));
        state = next;
    }
    let outcome = possession.outcome();
    possession.finish(outcome)
}

/// The defense fouls the offense's weakest free-throw shooter before a shot
/// goes up. The offense keeps the ball afterwards.
pub fn run_intentional_foul(
    offense: &Unit,
    defense: &Unit,
    context: PossessionContext,
    content: &EngineContent,
    rng: &mut impl Rng,
) -> PossessionResult {
    let constants = &content.constants.intentional_foul;
    let mut possession = Possession::new(offense, defense, context, content);
    let target = intentional_foul_target(offense, content);
    let fouler = assign_primary_defender(offense.players[target].player.position, defense);
    possession.foul = Some(FoulEvent {
        fouled_player: offense.players[target].player.name.clone(),
        fouler: defense.players[fouler].player.name.clone(),
        free_throws_awarded: constants.free_throws,
        and_one: false,
    });
    possession.awarded = Some((target, constants.free_throws));
    possession.duration = constants.seconds;

    for (from, to) in [
        (PossessionState::Start, PossessionState::Fouled),
        (PossessionState::Fouled, PossessionState::FreeThrows),
    ] {
        possession.trace.transitions.push((from, to));
    }
    let end = possession.step(PossessionState::FreeThrows, rng);
    possession
        .trace
        .transitions
        .push((PossessionState::FreeThrows, end));
    possession.finish(PossessionOutcome::IntentionalFoul)
}
