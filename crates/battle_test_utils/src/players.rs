//! Player implementations for driving games in tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use battle_core::prelude::*;

/// Everything a player was told by the game.
#[derive(Debug, Clone, Default)]
pub struct PlayerLog {
    /// Number of `movement` calls.
    pub movement_requests: usize,
    /// Number of `movement_cb` calls.
    pub movement_callbacks: usize,
    /// Every combat phase reported, in order.
    pub combat_results: Vec<CombatResults>,
    /// Whether `end_game_cb` was called.
    pub ended: bool,
}

/// Shared handle to a [`PlayerLog`], kept by the test while the game owns the player.
pub type SharedLog = Rc<RefCell<PlayerLog>>;

/// Plays back a fixed list of movement plans, one batch per turn.
///
/// Once the script runs out the player stands still.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    turns: VecDeque<Vec<MovementPlan>>,
    log: SharedLog,
}

impl ScriptedPlayer {
    /// Create a player from per-turn plan batches.
    #[must_use]
    pub fn new(turns: Vec<Vec<MovementPlan>>) -> Self {
        Self {
            turns: turns.into(),
            log: SharedLog::default(),
        }
    }

    /// A player that never moves.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Handle to this player's log.
    #[must_use]
    pub fn log(&self) -> SharedLog {
        Rc::clone(&self.log)
    }
}

impl Player for ScriptedPlayer {
    fn movement(&mut self, _board: &Board) -> Vec<MovementPlan> {
        self.log.borrow_mut().movement_requests += 1;
        self.turns.pop_front().unwrap_or_default()
    }

    fn movement_cb(&mut self, _board: &Board) {
        self.log.borrow_mut().movement_callbacks += 1;
    }

    fn combat_results(&mut self, results: &CombatResults) {
        self.log.borrow_mut().combat_results.push(results.clone());
    }

    fn end_game_cb(&mut self, _board: &Board) {
        self.log.borrow_mut().ended = true;
    }
}

/// Marches every unit of its seat toward the nearest enemy.
#[derive(Debug, Clone)]
pub struct ApproachPlayer {
    seat: Seat,
}

impl ApproachPlayer {
    /// Create a player for the given seat.
    #[must_use]
    pub fn new(seat: Seat) -> Self {
        Self { seat }
    }
}

impl Player for ApproachPlayer {
    fn movement(&mut self, board: &Board) -> Vec<MovementPlan> {
        let movement = board.movement();
        self.seat
            .own_units(board.units())
            .into_iter()
            .filter_map(|unit| {
                let target = board.get_nearest_unit(unit, false)?.coords()?;
                let path = movement.path_towards(unit, target, unit.movement);
                (path.len() > 1).then(|| MovementPlan::new(unit.id, path))
            })
            .collect()
    }
}
