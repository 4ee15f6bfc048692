//! Quarter and game driver.
//!
//! `GameSimulator` owns every piece of mutable game state (lineups, stamina,
//! clock, score) and advances it one possession at a time. All randomness
//! comes from the `Rng` passed into each call, in a fixed order.

use rand::Rng;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::box_score::compile_box_score;
use crate::clock::GameClock;
use crate::fouls::should_intentional_foul;
use crate::id::generate_game_id;
use crate::possession::{run_intentional_foul, run_possession, OnCourt, Unit};
use crate::probability::{effective_composite, event_probability, roll, Clamped};
use crate::stamina::StaminaTable;
use crate::substitution::LineupManager;
use crate::validation::{validate_content, validate_team};
use crate::{
    ClampEvent, ConfigError, Decision, EngineContent, Event, GameResult, Mechanic, PerSide,
    PlayerId, PossessionContext, PossessionOutcome, PossessionResult, QuarterResult, ReboundKind,
    RollTrace, Score, Side, SubstitutionEvent, Team, QUARTERS,
};

/// The opening jump. Each team sends up its best leaper; the roll is made
/// for the home jumper, so success means home wins the tip.
pub fn tip_off(
    home: &Unit,
    away: &Unit,
    content: &EngineContent,
    rng: &mut impl Rng,
) -> RollTrace {
    let (home_leap, home_jumper) = best_jumper(home, content);
    let (away_leap, _) = best_jumper(away, content);
    let composite = Clamped::new(50.0 + (home_leap - away_leap) / 2.0, 0.0, 100.0).value;
    let p = event_probability(content.probabilities.get(Event::TipOff), composite);
    roll(rng, Decision::TipOff, home_jumper, Some(composite), p)
}

fn best_jumper<'a>(unit: &Unit<'a>, content: &EngineContent) -> (f64, &'a PlayerId) {
    let mut best = (0.0, &unit.players[0].player.name);
    for on_court in &unit.players {
        let leap = effective_composite(on_court.player, on_court.stamina, Mechanic::TipOff, content);
        if leap > best.0 {
            best = (leap, &on_court.player.name);
        }
    }
    best
}

pub fn tip_off_winner(tip: &RollTrace) -> Side {
    if tip.success {
        Side::Home
    } else {
        Side::Away
    }
}

/// Who has the ball to open `quarter`: the tip-off winner starts the first
/// and fourth, the loser the second and third.
pub fn quarter_opening_offense(tip_off_winner: Side, quarter: u8) -> Side {
    match quarter {
        2 | 3 => tip_off_winner.opponent(),
        _ => tip_off_winner,
    }
}

fn fielded<'a>(
    side: Side,
    team: &'a Team,
    lineup: &LineupManager,
    stamina: &StaminaTable,
) -> Unit<'a> {
    Unit {
        side,
        players: std::array::from_fn(|index| {
            let slot = lineup.active()[index];
            OnCourt {
                player: &team.players[slot],
                stamina: stamina.get(slot),
            }
        }),
        tactics: &team.tactics,
    }
}

/// Mutable state of the quarter in progress.
#[derive(Debug, Clone, Default)]
struct QuarterLog {
    possessions: Vec<PossessionResult>,
    substitutions: Vec<SubstitutionEvent>,
    clamp_events: Vec<ClampEvent>,
    team_fouls: PerSide<u8>,
    score_before: Score,
}

pub struct GameSimulator<'a> {
    teams: PerSide<&'a Team>,
    content: &'a EngineContent,
    game_id: Uuid,
    tip_off: RollTrace,
    lineups: PerSide<LineupManager>,
    stamina: PerSide<StaminaTable>,
    clock: GameClock,
    score: Score,
    quarter: u8,
    offense: Side,
    /// The last possession ended on a turnover or defensive rebound, so the
    /// next one may be played in transition.
    live_ball: bool,
    log: QuarterLog,
    quarters: Vec<QuarterResult>,
}

impl<'a> GameSimulator<'a> {
    /// Validate the inputs, draw the game id and jump the ball.
    pub fn new(
        home: &'a Team,
        away: &'a Team,
        content: &'a EngineContent,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        validate_content(content)?;
        validate_team(home, &content.constants)?;
        validate_team(away, &content.constants)?;

        let constants = &content.constants;
        let game_id = generate_game_id(rng);
        let lineups = PerSide::new(
            LineupManager::new(home, constants),
            LineupManager::new(away, constants),
        );
        let stamina = PerSide::new(
            StaminaTable::new(home.players.len()),
            StaminaTable::new(away.players.len()),
        );
        let tip = tip_off(
            &fielded(Side::Home, home, &lineups.home, &stamina.home),
            &fielded(Side::Away, away, &lineups.away, &stamina.away),
            content,
            rng,
        );
        let winner = tip_off_winner(&tip);
        debug!(%game_id, tip_off_winner = ?winner, "game start");
        Ok(Self {
            teams: PerSide::new(home, away),
            content,
            game_id,
            tip_off: tip,
            lineups,
            stamina,
            clock: GameClock::new(constants.quarter_length_seconds),
            score: Score::default(),
            quarter: 1,
            offense: winner,
            live_ball: false,
            log: QuarterLog::default(),
            quarters: Vec::with_capacity(usize::from(QUARTERS)),
        })
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn tip_off_winner(&self) -> Side {
        tip_off_winner(&self.tip_off)
    }

    /// Quarter in progress, 1-based.
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    pub fn offense(&self) -> Side {
        self.offense
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn lineup(&self, side: Side) -> &LineupManager {
        self.lineups.get(side)
    }

    pub fn stamina(&self, side: Side) -> &StaminaTable {
        self.stamina.get(side)
    }

    pub fn quarters(&self) -> &[QuarterResult] {
        &self.quarters
    }

    pub fn is_finished(&self) -> bool {
        self.quarters.len() >= usize::from(QUARTERS)
    }

    /// The five players `side` has on the floor right now.
    pub fn unit(&self, side: Side) -> Unit<'a> {
        fielded(side, *self.teams.get(side), self.lineups.get(side), self.stamina.get(side))
    }

    /// Possession context plus the transition roll, which is only made off a
    /// live ball.
    fn context(&self, rng: &mut impl Rng) -> (PossessionContext, Option<RollTrace>) {
        let constants = &self.content.constants;
        let transition_roll = self.live_ball.then(|| {
            let pace = self.teams.get(self.offense).tactics.pace;
            let chance = constants.timing.pace.get(pace).transition_probability;
            let ball_handler = self.unit(self.offense).players[0].player;
            roll(rng, Decision::Transition, &ball_handler.name, None, Clamped::unit(chance))
        });
        let quarters_left = u32::from(QUARTERS.saturating_sub(self.quarter));
        let context = PossessionContext {
            quarter: self.quarter,
            transition: transition_roll.as_ref().is_some_and(|t| t.success),
            shot_clock: constants.shot_clock_seconds,
            score_differential: self.score.differential(self.offense),
            game_time_remaining: quarters_left * constants.quarter_length_seconds
                + self.clock.time_remaining(),
        };
        (context, transition_roll)
    }

    /// Play the next possession of the current quarter. Returns `None` once
    /// the quarter clock has run out or the game is over; call
    /// [`end_quarter`](Self::end_quarter) to move on.
    pub fn play_possession(&mut self, rng: &mut impl Rng) -> Option<&PossessionResult> {
        if self.is_finished() || self.clock.is_quarter_over() {
            return None;
        }
        let content: &'a EngineContent = self.content;
        let constants = &content.constants;
        let offense_side = self.offense;
        let defense_side = offense_side.opponent();
        let (context, transition_roll) = self.context(rng);

        let offense = self.unit(offense_side);
        let defense = self.unit(defense_side);
        let intentional = should_intentional_foul(
            context.game_time_remaining,
            context.score_differential,
            context.quarter,
            context.score_differential > 0,
            &constants.intentional_foul,
        );
        let mut result = if intentional {
            run_intentional_foul(&offense, &defense, context, content, rng)
        } else {
            run_possession(&offense, &defense, context, content, rng)
        };
        if let Some(transition_roll) = transition_roll {
            result.trace.rolls.insert(0, transition_roll);
        }

        *self.score.get_mut(offense_side) += result.points_scored;
        if result.trace.any_clamped() {
            warn!(
                quarter = self.quarter,
                offense = ?offense_side,
                "probability clamped during possession"
            );
        }
        self.record_foul(&result, defense_side);
        self.apply_stamina(offense_side);

        let elapsed = result.clock_seconds.min(self.clock.time_remaining());
        for side in Side::BOTH {
            self.lineups.get_mut(side).credit_time(f64::from(elapsed));
        }
        let remaining_after = self.clock.time_remaining() - elapsed;
        for side in Side::BOTH {
            self.substitute(side, remaining_after);
        }
        self.clock.tick(result.duration_seconds);

        let keeps_ball = result.outcome == PossessionOutcome::IntentionalFoul;
        self.live_ball = result.outcome == PossessionOutcome::Turnover
            || result
                .rebounds
                .last()
                .is_some_and(|rebound| rebound.kind == ReboundKind::Defensive);
        if !keeps_ball {
            self.offense = defense_side;
        }

        trace!(
            quarter = self.quarter,
            offense = ?offense_side,
            outcome = ?result.outcome,
            points = result.points_scored,
            seconds = result.clock_seconds,
            time_remaining = self.clock.time_remaining(),
            "possession"
        );
        self.log.possessions.push(result);
        self.log.possessions.last()
    }

    fn record_foul(&mut self, result: &PossessionResult, defense_side: Side) {
        let Some(foul) = &result.foul else { return };
        let Some(slot) = self.teams.get(defense_side).slot_of(&foul.fouler) else {
            return;
        };
        let total = self.lineups.get_mut(defense_side).record_foul(slot);
        let team_fouls = self.log.team_fouls.get_mut(defense_side);
        *team_fouls = team_fouls.saturating_add(1);
        if total >= self.content.constants.fouls.foul_out_limit {
            debug!(player = %foul.fouler, fouls = total, "fouled out");
        }
    }

    fn apply_stamina(&mut self, offense_side: Side) {
        let content: &'a EngineContent = self.content;
        let constants = &content.constants;
        let pace = self.teams.get(offense_side).tactics.pace;
        let multiplier = constants.timing.pace.get(pace).stamina_multiplier;
        for side in Side::BOTH {
            let team: &'a Team = *self.teams.get(side);
            let active = *self.lineups.get(side).active();
            let clamps = self.stamina.get_mut(side).apply_possession(
                &team.players,
                &active,
                multiplier,
                &constants.stamina,
            );
            for clamp in clamps {
                let player = team.players[clamp.slot].name.clone();
                warn!(
                    player = %player,
                    raw = clamp.raw,
                    clamped_to = clamp.clamped_to,
                    "stamina clamped"
                );
                self.log.clamp_events.push(ClampEvent {
                    quarter: self.quarter,
                    side,
                    player,
                    raw: clamp.raw,
                    clamped_to: clamp.clamped_to,
                });
            }
        }
    }

    fn substitute(&mut self, side: Side, time_remaining: u32) {
        let team: &'a Team = *self.teams.get(side);
        let swaps = self.lineups.get_mut(side).check_substitutions(
            team,
            self.stamina.get(side),
            &self.content.constants,
        );
        for swap in swaps {
            let event = SubstitutionEvent {
                side,
                quarter: self.quarter,
                time_remaining,
                player_out: team.players[swap.slot_out].name.clone(),
                player_in: team.players[swap.slot_in].name.clone(),
                reason: swap.reason,
            };
            debug!(
                side = ?side,
                player_out = %event.player_out,
                player_in = %event.player_in,
                reason = ?event.reason,
                time_remaining,
                "substitution"
            );
            self.log.substitutions.push(event);
        }
    }

    /// Close out the current quarter and set up the next. Team fouls and the
    /// clock reset; stamina and lineups carry over.
    pub fn end_quarter(&mut self) -> Option<&QuarterResult> {
        if self.is_finished() {
            return None;
        }
        let log = std::mem::take(&mut self.log);
        let points = Score::new(
            self.score.home - log.score_before.home,
            self.score.away - log.score_before.away,
        );
        debug!(
            quarter = self.quarter,
            possessions = log.possessions.len(),
            home = self.score.home,
            away = self.score.away,
            "quarter complete"
        );
        self.quarters.push(QuarterResult {
            quarter: self.quarter,
            possessions: log.possessions,
            substitutions: log.substitutions,
            points,
            score_after: self.score,
            team_fouls: log.team_fouls,
            clamp_events: log.clamp_events,
        });
        self.log.score_before = self.score;

        if !self.is_finished() {
            self.quarter += 1;
            self.clock.reset();
            self.offense = quarter_opening_offense(self.tip_off_winner(), self.quarter);
            self.live_ball = false;
        }
        self.quarters.last()
    }

    /// Play out the current quarter and close it.
    pub fn simulate_quarter(&mut self, rng: &mut impl Rng) -> Option<&QuarterResult> {
        while self.play_possession(rng).is_some() {}
        self.end_quarter()
    }

    /// Play whatever is left of the game and assemble the result.
    pub fn finish(mut self, rng: &mut impl Rng) -> GameResult {
        while !self.is_finished() {
            self.simulate_quarter(rng);
        }
        let seconds_played =
            PerSide::new(self.playing_time(Side::Home), self.playing_time(Side::Away));
        let box_score = compile_box_score(
            self.quarters.iter().flat_map(|quarter| &quarter.possessions),
            seconds_played,
        );
        debug!(
            game_id = %self.game_id,
            home = self.score.home,
            away = self.score.away,
            "game complete"
        );
        GameResult {
            game_id: self.game_id,
            home_team: self.teams.home.name.clone(),
            away_team: self.teams.away.name.clone(),
            tip_off_winner: tip_off_winner(&self.tip_off),
            tip_off: self.tip_off,
            quarters: self.quarters,
            final_score: self.score,
            box_score,
        }
    }

    fn playing_time(&self, side: Side) -> Vec<(PlayerId, f64)> {
        let lineup = self.lineups.get(side);
        self.teams
            .get(side)
            .players
            .iter()
            .enumerate()
            .map(|(slot, player)| (player.name.clone(), lineup.seconds_played(slot)))
            .collect()
    }
}

/// Validate, then simulate four quarters.
pub fn simulate_game(
    home: &Team,
    away: &Team,
    content: &EngineContent,
    rng: &mut impl Rng,
) -> Result<GameResult, ConfigError> {
    let simulator = GameSimulator::new(home, away, content, rng)?;
    Ok(simulator.finish(rng))
}
