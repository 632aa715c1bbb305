//! Synchronous turn driver.
//!
//! A turn belongs to one seat and runs in a fixed order: the seat's player
//! plans movement, the plans are applied, hold objectives are scored, the
//! seat's engaged units fight, and surviving attackers on objectives score
//! again. [`Game::play`] repeats this, rotating seats, until at most one seat
//! still has units on the board.

use std::fmt;

use crate::board::{Board, SparseBoard};
use crate::combat::{CombatResolver, CombatResults, DieRoller};
use crate::config::RulesConfig;
use crate::error::{BattleError, Result};
use crate::hex::HexCoord;
use crate::player::{MovementPlan, Player};
use crate::scoring::{ObjectiveScorer, ScoreTracker};
use crate::unit::{PlayerKind, Seat, UnitId};

/// A game in progress.
pub struct Game {
    board: Board,
    seats: Vec<Seat>,
    players: Vec<Box<dyn Player>>,
    current: usize,
    turn: u32,
    resolver: CombatResolver,
    config: RulesConfig,
    scores: ScoreTracker,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("seats", &self.seats)
            .field("current", &self.current)
            .field("turn", &self.turn)
            .field("units", &self.board.unit_count())
            .field("scores", &self.scores)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Create a game. The first seat moves first.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] if no seat is given and
    /// [`BattleError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        board: Board,
        participants: Vec<(Seat, Box<dyn Player>)>,
        config: RulesConfig,
        die: Box<dyn DieRoller>,
    ) -> Result<Self> {
        if participants.is_empty() {
            return Err(BattleError::InvalidState(
                "A game needs at least one seat".to_string(),
            ));
        }
        let resolver = CombatResolver::new(die).with_config(&config)?;

        let (seats, players): (Vec<Seat>, Vec<Box<dyn Player>>) = participants.into_iter().unzip();
        let scores = ScoreTracker::new(seats.iter().map(|seat| seat.id));
        Ok(Self {
            board,
            seats,
            players,
            current: 0,
            turn: 1,
            resolver,
            config,
            scores,
        })
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access, for scenario setup.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Every seat, in turn order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// The seat whose turn it is.
    #[must_use]
    pub fn current_seat(&self) -> &Seat {
        &self.seats[self.current]
    }

    /// 1-based number of the current seat turn.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Rules in effect.
    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Scores so far.
    #[must_use]
    pub fn score_tracker(&self) -> &ScoreTracker {
        &self.scores
    }

    /// Mutable scores, for scorers.
    pub fn score_tracker_mut(&mut self) -> &mut ScoreTracker {
        &mut self.scores
    }

    /// The combat resolver, e.g. to force a die roll.
    pub fn combat_resolver_mut(&mut self) -> &mut CombatResolver {
        &mut self.resolver
    }

    /// Move units along their planned paths, then notify the current player.
    ///
    /// Empty plans and plans for units no longer on the board are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidPath`] if a path does not start on the
    /// unit's hex, steps between non-adjacent hexes, or leaves the board.
    /// Plans before the failing one stay applied.
    pub fn apply_movement_plans(&mut self, plans: &[MovementPlan]) -> Result<()> {
        for plan in plans {
            let Some(destination) = plan.destination() else {
                continue;
            };
            let Ok(unit) = self.board.get_unit_by_id(plan.unit) else {
                tracing::warn!(unit = %plan.unit, "Skipping plan for unit not on the board");
                continue;
            };
            validate_path(&self.board, plan, unit.coords())?;
            self.board.move_unit(plan.unit, destination)?;
            tracing::debug!(unit = %plan.unit, to = %destination, "Unit moved");
        }
        self.players[self.current].movement_cb(&self.board);
        Ok(())
    }

    /// Fight the current seat's battles and tell every player the outcome.
    ///
    /// # Errors
    ///
    /// Propagates resolver errors; see [`CombatResolver::resolve_combat`].
    pub fn resolve_combat(&mut self) -> Result<CombatResults> {
        let results = self
            .resolver
            .resolve_combat(&mut self.board, &self.seats[self.current])?;
        for player in &mut self.players {
            player.combat_results(&results);
        }
        Ok(results)
    }

    /// Pass the turn to the next seat and return it.
    pub fn next_player(&mut self) -> &Seat {
        self.current = (self.current + 1) % self.seats.len();
        self.turn += 1;
        tracing::info!(turn = self.turn, seat = %self.seats[self.current].id, "Next turn");
        &self.seats[self.current]
    }

    /// Whether fewer than two seats still have units on the board.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        let active = self
            .seats
            .iter()
            .filter(|seat| self.board.units().any(|unit| seat.owns(unit)))
            .count();
        active < 2
    }

    /// Play the current seat's turn without passing it on.
    ///
    /// # Errors
    ///
    /// Propagates movement and combat errors.
    pub fn play_turn(&mut self) -> Result<CombatResults> {
        let plans = self.players[self.current].movement(&self.board);
        self.apply_movement_plans(&plans)?;

        let scorer = ObjectiveScorer;
        scorer.award_hold_objectives(self);
        let results = self.resolve_combat()?;
        scorer.award_hold_objectives_after_combat(self, &results);
        Ok(results)
    }

    /// Run turns until the game is over or the turn limit is reached, then
    /// call every player's end-of-game hook.
    ///
    /// The turn is not handed over after the last turn played, so
    /// [`Game::current_seat`] is the seat that moved last.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] if any seat is not a computer
    /// player, and propagates turn errors.
    pub fn play(&mut self) -> Result<()> {
        if let Some(seat) = self.seats.iter().find(|seat| seat.kind != PlayerKind::Cpu) {
            return Err(BattleError::InvalidState(format!(
                "All players must be computer players, {} is not",
                seat.name
            )));
        }

        let mut played = 0;
        while !self.is_game_over() && played < self.config.max_turns {
            self.play_turn()?;
            played += 1;
            if self.is_game_over() || played == self.config.max_turns {
                break;
            }
            self.next_player();
        }

        tracing::info!(
            turns = played,
            game_over = self.is_game_over(),
            scores = ?self.scores.get_scores(),
            "Game finished"
        );
        for player in &mut self.players {
            player.end_game_cb(&self.board);
        }
        Ok(())
    }

    /// Apply externally held unit positions.
    ///
    /// # Errors
    ///
    /// See [`Board::update`].
    pub fn update(&mut self, sparse: &SparseBoard) -> Result<()> {
        self.board.update(sparse)
    }
}

fn validate_path(
    board: &Board,
    plan: &MovementPlan,
    current: Option<HexCoord>,
) -> Result<()> {
    let invalid = |unit: UnitId, reason: String| BattleError::InvalidPath { unit, reason };

    if plan.path.first().copied() != current {
        return Err(invalid(
            plan.unit,
            format!("path starts at {} instead of the unit's hex", plan.path[0]),
        ));
    }
    if let Some(off) = plan.path.iter().find(|coord| !board.contains(**coord)) {
        return Err(invalid(plan.unit, format!("{off} is off the board")));
    }
    if let Some(pair) = plan.path.windows(2).find(|pair| !pair[0].is_adjacent(pair[1])) {
        return Err(invalid(
            plan.unit,
            format!("{} and {} are not adjacent", pair[0], pair[1]),
        ));
    }
    Ok(())
}
