//! Rotation management: who is on the floor, how long they have played, and
//! when they come out.

use crate::stamina::StaminaTable;
use crate::{Constants, Position, SubstitutionReason, Team, LINEUP_SIZE, QUARTERS};

/// A single swap made by [`LineupManager::check_substitutions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    pub slot_out: usize,
    pub slot_in: usize,
    pub reason: SubstitutionReason,
}

/// Per-team lineup state. All indices are roster slots.
#[derive(Debug, Clone, PartialEq)]
pub struct LineupManager {
    active: [usize; LINEUP_SIZE],
    bench: Vec<usize>,
    seconds_played: Vec<f64>,
    personal_fouls: Vec<u8>,
    target_seconds: Vec<f64>,
}

/// Target playing time for each roster slot, in seconds.
#[allow(clippy::cast_precision_loss)]
pub fn target_seconds(team: &Team, constants: &Constants) -> Vec<f64> {
    let allotment = &team.tactics.minutes_allotment;
    if allotment.is_empty() {
        let game_seconds =
            f64::from(QUARTERS) * f64::from(constants.quarter_length_seconds);
        let each = game_seconds * LINEUP_SIZE as f64 / team.players.len().max(1) as f64;
        return vec![each; team.players.len()];
    }
    team.players
        .iter()
        .map(|player| allotment.get(&player.name).map_or(0.0, |minutes| minutes * 60.0))
        .collect()
}

impl LineupManager {
    /// Starters are the first five roster slots. Callers validate the roster
    /// size first.
    pub fn new(team: &Team, constants: &Constants) -> Self {
        let roster = team.players.len();
        Self {
            active: std::array::from_fn(|slot| slot),
            bench: (LINEUP_SIZE..roster).collect(),
            seconds_played: vec![0.0; roster],
            personal_fouls: vec![0; roster],
            target_seconds: target_seconds(team, constants),
        }
    }

    pub fn active(&self) -> &[usize; LINEUP_SIZE] {
        &self.active
    }

    pub fn bench(&self) -> &[usize] {
        &self.bench
    }

    pub fn is_active(&self, slot: usize) -> bool {
        self.active.contains(&slot)
    }

    pub fn seconds_played(&self, slot: usize) -> f64 {
        self.seconds_played.get(slot).copied().unwrap_or(0.0)
    }

    pub fn personal_fouls(&self, slot: usize) -> u8 {
        self.personal_fouls.get(slot).copied().unwrap_or(0)
    }

    pub fn target(&self, slot: usize) -> f64 {
        self.target_seconds.get(slot).copied().unwrap_or(0.0)
    }

    /// Add playing time to everyone on the floor.
    pub fn credit_time(&mut self, seconds: f64) {
        for &slot in &self.active {
            if let Some(played) = self.seconds_played.get_mut(slot) {
                *played += seconds;
            }
        }
    }

    /// Returns the player's new foul total.
    pub fn record_foul(&mut self, slot: usize) -> u8 {
        match self.personal_fouls.get_mut(slot) {
            Some(fouls) => {
                *fouls = fouls.saturating_add(1);
                *fouls
            }
            None => 0,
        }
    }

    pub fn is_fouled_out(&self, slot: usize, limit: u8) -> bool {
        self.personal_fouls(slot) >= limit
    }

    /// Exchange an active player for a bench player in one step. Returns
    /// false and changes nothing unless `slot_out` is active and `slot_in`
    /// is on the bench.
    pub fn swap(&mut self, slot_out: usize, slot_in: usize) -> bool {
        let Some(active_index) = self.active.iter().position(|&s| s == slot_out) else {
            return false;
        };
        let Some(bench_index) = self.bench.iter().position(|&s| s == slot_in) else {
            return false;
        };
        self.active[active_index] = slot_in;
        self.bench[bench_index] = slot_out;
        true
    }

    fn trigger(
        &self,
        slot: usize,
        stamina: &StaminaTable,
        constants: &Constants,
    ) -> Option<SubstitutionReason> {
        if self.is_fouled_out(slot, constants.fouls.foul_out_limit) {
            Some(SubstitutionReason::FoulOut)
        } else if stamina.get(slot) < constants.substitution.stamina_threshold {
            Some(SubstitutionReason::Fatigue)
        } else if self.seconds_played(slot) > self.target(slot) {
            Some(SubstitutionReason::Minutes)
        } else {
            None
        }
    }

    fn eligible(
        &self,
        candidate: usize,
        outgoing: usize,
        reason: SubstitutionReason,
        stamina: &StaminaTable,
        constants: &Constants,
    ) -> bool {
        if self.is_fouled_out(candidate, constants.fouls.foul_out_limit) {
            return false;
        }
        match reason {
            SubstitutionReason::FoulOut => true,
            SubstitutionReason::Fatigue => {
                stamina.get(candidate) > stamina.get(outgoing)
                    && stamina.get(candidate) >= constants.substitution.stamina_threshold
            }
            SubstitutionReason::Minutes => self.seconds_played(candidate) < self.target(candidate),
        }
    }

    /// Freshest eligible bench player, same position first, then adjacent.
    /// Foul-outs fall back to anyone eligible.
    pub fn find_replacement(
        &self,
        team: &Team,
        outgoing: usize,
        reason: SubstitutionReason,
        stamina: &StaminaTable,
        constants: &Constants,
    ) -> Option<usize> {
        let position = team.players.get(outgoing)?.position;
        let eligible: Vec<(usize, Position)> = self
            .bench
            .iter()
            .filter(|&&slot| self.eligible(slot, outgoing, reason, stamina, constants))
            .filter_map(|&slot| team.players.get(slot).map(|p| (slot, p.position)))
            .collect();

        let freshest = |tier: &dyn Fn(Position) -> bool| {
            eligible
                .iter()
                .filter(|(_, pos)| tier(*pos))
                .map(|&(slot, _)| slot)
                .max_by(|&a, &b| {
                    stamina
                        .get(a)
                        .total_cmp(&stamina.get(b))
                        .then(b.cmp(&a))
                })
        };

        freshest(&|pos| pos == position)
            .or_else(|| freshest(&|pos| pos.is_adjacent(position)))
            .or_else(|| {
                if reason == SubstitutionReason::FoulOut {
                    freshest(&|_| true)
                } else {
                    None
                }
            })
    }

    /// Check every active player once and make whatever swaps are possible.
    /// A player with no eligible replacement stays in until the next check.
    pub fn check_substitutions(
        &mut self,
        team: &Team,
        stamina: &StaminaTable,
        constants: &Constants,
    ) -> Vec<Substitution> {
        let mut made = Vec::new();
        for index in 0..LINEUP_SIZE {
            let outgoing = self.active[index];
            let Some(reason) = self.trigger(outgoing, stamina, constants) else {
                continue;
            };
            let Some(incoming) = self.find_replacement(team, outgoing, reason, stamina, constants)
            else {
                continue;
            };
            if self.swap(outgoing, incoming) {
                made.push(Substitution {
                    slot_out: outgoing,
                    slot_in: incoming,
                    reason,
                });
            }
        }
        made
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{base_content, uniform_team};
    use crate::{Player, PlayerId, StaminaConstants};
    use std::collections::BTreeSet;

    fn drain(table: &mut StaminaTable, team: &Team, slots: &[usize; LINEUP_SIZE], times: usize) {
        let constants = StaminaConstants {
            base_cost: 5.0,
            fatigue_range: 0.0,
            bench_recovery_rate: 0.0,
            performance_threshold: 80.0,
            performance_slope: 0.0,
        };
        for _ in 0..times {
            table.apply_possession(&team.players, slots, 1.0, &constants);
        }
    }

    fn distinct_active(manager: &LineupManager) -> bool {
        manager.active().iter().collect::<BTreeSet<_>>().len() == LINEUP_SIZE
    }

    #[test]
    fn equal_allocation_splits_game_time() {
        let content = base_content();
        let team = uniform_team("Home", 50);
        let targets = target_seconds(&team, &content.constants);
        assert_eq!(targets.len(), 10);
        for t in targets {
            assert!((t - 1440.0).abs() < 1e-9);
        }
    }

    #[test]
    fn players_missing_from_allotment_get_zero() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        let star = team.players[0].name.clone();
        team.tactics.minutes_allotment.insert(star, 36.0);
        let targets = target_seconds(&team, &content.constants);
        assert!((targets[0] - 2160.0).abs() < 1e-9);
        assert!(targets[1..].iter().all(|t| t.abs() < f64::EPSILON));
    }

    #[test]
    fn swap_is_atomic_and_rejects_bad_slots() {
        let content = base_content();
        let team = uniform_team("Home", 50);
        let mut manager = LineupManager::new(&team, &content.constants);
        assert!(!manager.swap(7, 8), "bench player can't come out");
        assert!(!manager.swap(0, 1), "active player can't come in");
        assert_eq!(manager.active(), &[0, 1, 2, 3, 4]);
        assert!(manager.swap(0, 5));
        assert!(manager.is_active(5));
        assert!(manager.bench().contains(&0));
        assert!(distinct_active(&manager));
    }

    #[test]
    fn tired_player_is_replaced_by_same_position_backup() {
        let content = base_content();
        let team = uniform_team("Home", 50);
        let mut manager = LineupManager::new(&team, &content.constants);
        let mut stamina = StaminaTable::new(team.players.len());
        drain(&mut stamina, &team, &[0, 1, 2, 3, 4], 10);
        let subs = manager.check_substitutions(&team, &stamina, &content.constants);
        assert_eq!(subs.len(), 5);
        for sub in &subs {
            assert_eq!(sub.reason, SubstitutionReason::Fatigue);
            assert_eq!(
                team.players[sub.slot_in].position,
                team.players[sub.slot_out].position
            );
        }
        assert_eq!(manager.active(), &[5, 6, 7, 8, 9]);
    }

    #[test]
    fn fatigue_sub_requires_a_fresher_player() {
        let content = base_content();
        let team = uniform_team("Home", 50);
        let mut manager = LineupManager::new(&team, &content.constants);
        let mut stamina = StaminaTable::new(team.players.len());
        // Everyone, bench included, is spent.
        drain(&mut stamina, &team, &[0, 1, 2, 3, 4], 10);
        drain(&mut stamina, &team, &[5, 6, 7, 8, 9], 10);
        let subs = manager.check_substitutions(&team, &stamina, &content.constants);
        assert!(subs.is_empty());
        assert_eq!(manager.active(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn adjacent_position_covers_when_same_position_is_missing() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        // Swap the backup center for a second backup power forward.
        team.players[9].position = Position::PF;
        team.players[9].name = PlayerId("Stretch".to_string());
        let mut manager = LineupManager::new(&team, &content.constants);
        let mut stamina = StaminaTable::new(team.players.len());
        drain(&mut stamina, &team, &[0, 1, 2, 3, 4], 10);
        let replacement = manager.find_replacement(
            &team,
            4,
            SubstitutionReason::Fatigue,
            &stamina,
            &content.constants,
        );
        assert_eq!(replacement.map(|slot| team.players[slot].position), Some(Position::PF));
        manager.check_substitutions(&team, &stamina, &content.constants);
        assert!(distinct_active(&manager));
    }

    #[test]
    fn foul_out_beats_fatigue_and_falls_back_to_any_position() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        // Only guards on the bench.
        for slot in 5..10 {
            team.players[slot] = Player {
                position: Position::PG,
                ..team.players[slot].clone()
            };
        }
        let mut manager = LineupManager::new(&team, &content.constants);
        let stamina = StaminaTable::new(team.players.len());
        for _ in 0..content.constants.fouls.foul_out_limit {
            manager.record_foul(4);
        }
        let subs = manager.check_substitutions(&team, &stamina, &content.constants);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].slot_out, 4);
        assert_eq!(subs[0].reason, SubstitutionReason::FoulOut);
        assert!(!manager.is_active(4));
        assert!(distinct_active(&manager));
    }

    #[test]
    fn fouled_out_players_never_return() {
        let content = base_content();
        let team = uniform_team("Home", 50);
        let mut manager = LineupManager::new(&team, &content.constants);
        for _ in 0..content.constants.fouls.foul_out_limit {
            manager.record_foul(5);
        }
        let mut stamina = StaminaTable::new(team.players.len());
        drain(&mut stamina, &team, &[0, 1, 2, 3, 4], 10);
        manager.check_substitutions(&team, &stamina, &content.constants);
        assert!(!manager.is_active(5));
        // The backup shooting guard covers for the tired point guard.
        assert!(manager.is_active(6));
        assert!(!manager.is_active(0));
    }

    #[test]
    fn minutes_trigger_swaps_in_player_under_allotment() {
        let content = base_content();
        let mut team = uniform_team("Home", 50);
        for player in &team.players {
            team.tactics.minutes_allotment.insert(player.name.clone(), 24.0);
        }
        let mut manager = LineupManager::new(&team, &content.constants);
        let stamina = StaminaTable::new(team.players.len());
        manager.credit_time(1441.0);
        let subs = manager.check_substitutions(&team, &stamina, &content.constants);
        assert_eq!(subs.len(), 5);
        assert!(subs.iter().all(|s| s.reason == SubstitutionReason::Minutes));
        assert!((manager.seconds_played(0) - 1441.0).abs() < 1e-9);
        assert!(manager.seconds_played(5).abs() < f64::EPSILON);
    }
}
