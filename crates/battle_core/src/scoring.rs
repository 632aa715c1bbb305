//! Objective scoring.

use std::collections::{BTreeMap, HashSet};

use crate::combat::{find_combat, CombatResult, CombatResults};
use crate::game::Game;
use crate::terrain::Objective;
use crate::unit::{PlayerId, UnitId};

/// Running score per seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    scores: BTreeMap<PlayerId, i64>,
}

impl ScoreTracker {
    /// Create a tracker with every listed seat at zero.
    #[must_use]
    pub fn new(players: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            scores: players.into_iter().map(|player| (player, 0)).collect(),
        }
    }

    /// Add points to a seat. Zero and negative amounts are ignored.
    pub fn add_points(&mut self, player: PlayerId, points: i64) {
        if points <= 0 {
            return;
        }
        *self.scores.entry(player).or_insert(0) += points;
    }

    /// Current score of a seat; unknown seats have zero.
    #[must_use]
    pub fn get_score(&self, player: PlayerId) -> i64 {
        self.scores.get(&player).copied().unwrap_or(0)
    }

    /// Copy of the whole score table.
    #[must_use]
    pub fn get_scores(&self) -> BTreeMap<PlayerId, i64> {
        self.scores.clone()
    }
}

/// Awards points for `Hold` objectives occupied by the current seat.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveScorer;

impl ObjectiveScorer {
    /// Award hold objectives after movement.
    ///
    /// An objective counts once if any unit of the current seat stands on it
    /// and that unit is not about to fight. Returns the points awarded.
    pub fn award_hold_objectives(&self, game: &mut Game) -> u32 {
        let seat = game.current_seat();
        let board = game.board();
        let engaged: HashSet<UnitId> = find_combat(board, seat)
            .into_iter()
            .flat_map(|battle| battle.attackers)
            .collect();

        let held: Vec<&Objective> = board
            .objectives()
            .into_iter()
            .filter(|objective| objective.is_hold())
            .filter(|objective| {
                board
                    .units_at(objective.coord)
                    .any(|unit| seat.owns(unit) && !engaged.contains(&unit.id))
            })
            .collect();

        let (player, points) = (seat.id, total(&held));
        log_award(player, points, &held);
        game.score_tracker_mut().add_points(player, i64::from(points));
        points
    }

    /// Award hold objectives after the combat phase.
    ///
    /// Attackers of battles that did not end in an attacker retreat, and
    /// that still stand on a hold objective, earn it once. Returns the points
    /// awarded.
    pub fn award_hold_objectives_after_combat(
        &self,
        game: &mut Game,
        results: &CombatResults,
    ) -> u32 {
        let seat = game.current_seat();
        let board = game.board();
        let eligible: HashSet<UnitId> = results
            .battles()
            .iter()
            .filter(|battle| battle.combat_result() != CombatResult::AttackerRetreat2)
            .flat_map(|battle| battle.attackers().iter().copied())
            .collect();

        let held: Vec<&Objective> = board
            .objectives()
            .into_iter()
            .filter(|objective| objective.is_hold())
            .filter(|objective| {
                board
                    .units_at(objective.coord)
                    .any(|unit| seat.owns(unit) && eligible.contains(&unit.id))
            })
            .collect();

        let (player, points) = (seat.id, total(&held));
        log_award(player, points, &held);
        game.score_tracker_mut().add_points(player, i64::from(points));
        points
    }
}

fn total(objectives: &[&Objective]) -> u32 {
    objectives.iter().map(|objective| objective.points).sum()
}

fn log_award(player: PlayerId, points: u32, held: &[&Objective]) {
    if points > 0 {
        let coords: Vec<String> = held.iter().map(|o| o.coord.to_string()).collect();
        tracing::info!(
            player = %player,
            points,
            objectives = %coords.join(" "),
            "Awarded points for holding objectives"
        );
    }
}
