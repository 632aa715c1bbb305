//! The contract between the rules engine and player strategies.
//!
//! Human proxies, scripted movers and learning agents all implement
//! [`Player`]; the engine only ever talks to them through it.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::combat::CombatResults;
use crate::hex::HexCoord;
use crate::unit::UnitId;

/// Ordered hex path a unit should follow this turn.
///
/// The first hex is the unit's current position; the unit ends on the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementPlan {
    /// Unit to move.
    pub unit: UnitId,
    /// Hexes to traverse, starting where the unit stands.
    pub path: Vec<HexCoord>,
}

impl MovementPlan {
    /// Create a plan.
    #[must_use]
    pub fn new(unit: UnitId, path: Vec<HexCoord>) -> Self {
        Self { unit, path }
    }

    /// Final hex of the plan, if the path is not empty.
    #[must_use]
    pub fn destination(&self) -> Option<HexCoord> {
        self.path.last().copied()
    }
}

/// A player strategy.
///
/// Only [`Player::movement`] is required; the callbacks default to no-ops.
pub trait Player {
    /// Decide the movement plans for this player's units.
    fn movement(&mut self, board: &Board) -> Vec<MovementPlan>;

    /// Called after this player's plans have been applied to the board.
    fn movement_cb(&mut self, _board: &Board) {}

    /// Informs the player of the outcome of a combat phase.
    fn combat_results(&mut self, _results: &CombatResults) {}

    /// Called once when the game has concluded.
    fn end_game_cb(&mut self, _board: &Board) {}
}
