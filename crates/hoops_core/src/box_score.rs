//! Box-score tallies derived from possession results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PerSide, PlayerId, PossessionResult, ReboundKind, ShotType, Side};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBox {
    pub points: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub threes_made: u32,
    pub threes_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
    pub offensive_rebounds: u32,
    pub defensive_rebounds: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub personal_fouls: u32,
    pub seconds_played: f64,
}

impl PlayerBox {
    fn add(&mut self, other: &PlayerBox) {
        self.points += other.points;
        self.field_goals_made += other.field_goals_made;
        self.field_goals_attempted += other.field_goals_attempted;
        self.threes_made += other.threes_made;
        self.threes_attempted += other.threes_attempted;
        self.free_throws_made += other.free_throws_made;
        self.free_throws_attempted += other.free_throws_attempted;
        self.offensive_rebounds += other.offensive_rebounds;
        self.defensive_rebounds += other.defensive_rebounds;
        self.steals += other.steals;
        self.blocks += other.blocks;
        self.turnovers += other.turnovers;
        self.personal_fouls += other.personal_fouls;
        self.seconds_played += other.seconds_played;
    }
}

/// Team totals plus one line per rostered player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamBox {
    pub totals: PlayerBox,
    pub players: BTreeMap<PlayerId, PlayerBox>,
}

impl TeamBox {
    pub fn points(&self) -> u32 {
        self.totals.points
    }

    fn line(&mut self, player: &PlayerId) -> &mut PlayerBox {
        self.players.entry(player.clone()).or_default()
    }
}

pub type BoxScore = PerSide<TeamBox>;

/// Tally every possession. `seconds_played` lists each rostered player with
/// their playing time so players who never touched the ball still get a line.
pub fn compile_box_score<'a>(
    possessions: impl IntoIterator<Item = &'a PossessionResult>,
    seconds_played: PerSide<Vec<(PlayerId, f64)>>,
) -> BoxScore {
    let mut score = BoxScore::default();
    for side in Side::BOTH {
        let team = score.get_mut(side);
        for (player, seconds) in seconds_played.get(side) {
            team.line(player).seconds_played = *seconds;
        }
    }

    for possession in possessions {
        let offense = possession.offense;
        let defense = offense.opponent();

        for shot in &possession.shots {
            let line = score.get_mut(offense).line(&shot.shooter);
            // A shooting foul on a miss is not a field-goal attempt.
            if shot.made || !shot.fouled {
                line.field_goals_attempted += 1;
                if shot.shot_type == ShotType::Three {
                    line.threes_attempted += 1;
                }
            }
            if shot.made {
                line.field_goals_made += 1;
                line.points += shot.shot_type.points();
                if shot.shot_type == ShotType::Three {
                    line.threes_made += 1;
                }
            }
            if let Some(blocker) = &shot.blocked_by {
                score.get_mut(defense).line(blocker).blocks += 1;
            }
        }

        if let Some(ft) = &possession.free_throws {
            let line = score.get_mut(offense).line(&ft.shooter);
            line.free_throws_attempted += u32::from(ft.attempts);
            line.free_throws_made += u32::from(ft.makes);
            line.points += u32::from(ft.makes);
        }

        if let Some(foul) = &possession.foul {
            score.get_mut(defense).line(&foul.fouler).personal_fouls += 1;
        }

        for rebound in &possession.rebounds {
            let line = score.get_mut(rebound.side).line(&rebound.player);
            match rebound.kind {
                ReboundKind::Offensive => line.offensive_rebounds += 1,
                ReboundKind::Defensive => line.defensive_rebounds += 1,
            }
        }

        if let Some(turnover) = &possession.turnover {
            score.get_mut(offense).line(&turnover.player).turnovers += 1;
            if let Some(stealer) = &turnover.stolen_by {
                score.get_mut(defense).line(stealer).steals += 1;
            }
        }
    }

    for side in Side::BOTH {
        let team = score.get_mut(side);
        let mut totals = PlayerBox::default();
        for line in team.players.values() {
            totals.add(line);
        }
        team.totals = totals;
    }
    score
}
