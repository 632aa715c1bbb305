//! Combat resolution.
//!
//! After movement, every group of engaged units fights one battle. The
//! total attack of the active seat's units is compared against the total
//! defense of the opposing units, the ratio is snapped to canonical odds,
//! and a die roll on the combat results table decides the outcome:
//!
//! - **Eliminated**: the losing side is removed from the board.
//! - **Retreat 2**: each losing unit falls back directly away from the
//!   enemy. A unit whose retreat leaves the board or runs into a hostile
//!   unit is eliminated instead.
//! - **Exchange**: all defenders are removed, and the attacker loses the
//!   cheapest set of units whose attack covers the defenders' defense.

mod crt;
mod engagement;
mod exchange;
mod result;

pub use crt::{
    get_odds, lookup, DieRoller, FixedDie, Odds, SeededDie, BEST_ODDS, CANONICAL_ODDS,
    COMBAT_RESULTS_TABLE, WORST_ODDS,
};
pub use engagement::{find_combat, Battle};
pub use exchange::minimal_losses;
pub use result::{CombatResult, CombatResultData, CombatResultRecord, CombatResults, NO_DIE_ROLL};

use crate::board::Board;
use crate::config::RulesConfig;
use crate::error::{BattleError, Result};
use crate::hex::HexCoord;
use crate::unit::{Seat, Unit, UnitId};

/// Resolves the combat phase for a seat.
#[derive(Debug)]
pub struct CombatResolver {
    die: Box<dyn DieRoller>,
    static_die_roll: Option<u8>,
    retreat_distance: u32,
}

impl CombatResolver {
    /// Create a resolver rolling the given die, with default rules.
    #[must_use]
    pub fn new(die: Box<dyn DieRoller>) -> Self {
        Self {
            die,
            static_die_roll: None,
            retreat_distance: RulesConfig::default().retreat_distance,
        }
    }

    /// Builder method to apply a rules configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] if `config` does not validate,
    /// for example a zero retreat distance.
    pub fn with_config(mut self, config: &RulesConfig) -> Result<Self> {
        config.check()?;
        self.retreat_distance = config.retreat_distance;
        Ok(self)
    }

    /// Force every roll to `face`, or go back to the die with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidDieRoll`] if `face` is not in 1..=6.
    pub fn set_static_die_roll(&mut self, face: Option<u8>) -> Result<()> {
        if let Some(value) = face {
            FixedDie::new(value)?;
        }
        self.static_die_roll = face;
        Ok(())
    }

    /// Hexes a losing unit falls back.
    #[must_use]
    pub const fn retreat_distance(&self) -> u32 {
        self.retreat_distance
    }

    fn roll(&mut self) -> u8 {
        match self.static_die_roll {
            Some(face) => face,
            None => self.die.roll(),
        }
    }

    /// Fight one battle on paper: odds, roll and table outcome.
    ///
    /// The extreme odds resolve without consuming a roll.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidDieRoll`] if the die produced a face
    /// outside 1..=6.
    pub fn solve(&mut self, attack_factor: u32, defense_factor: u32) -> Result<CombatResultData> {
        let odds = get_odds(attack_factor, defense_factor);
        if odds == WORST_ODDS {
            return Ok(CombatResultData::new(odds, None, CombatResult::AttackerEliminated));
        }
        if odds == BEST_ODDS {
            return Ok(CombatResultData::new(odds, None, CombatResult::DefenderEliminated));
        }
        let die_roll = self.roll();
        let result = lookup(odds, die_roll)?;
        Ok(CombatResultData::new(odds, Some(die_roll), result))
    }

    /// Find and fight every battle for the attacking seat, updating the board.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] if a participant left the board
    /// before its battle was resolved. Battles already fought stay applied.
    pub fn resolve_combat(&mut self, board: &mut Board, attacker: &Seat) -> Result<CombatResults> {
        let mut results = CombatResults::new();
        for battle in find_combat(board, attacker) {
            let data = self.resolve_battle(board, battle)?;
            tracing::info!(
                odds = %data.odds(),
                die_roll = ?data.die_roll(),
                result = data.combat_result().code(),
                attackers = data.attackers().len(),
                defenders = data.defenders().len(),
                no_retreat = data.no_retreat_units().len(),
                "Battle resolved"
            );
            results.add_battle(data);
        }
        Ok(results)
    }

    fn resolve_battle(&mut self, board: &mut Board, battle: Battle) -> Result<CombatResultData> {
        let attack_factor = sum_factor(board, &battle.attackers, |unit| unit.attack)?;
        let defense_factor = sum_factor(board, &battle.defenders, |unit| unit.defense)?;

        let solved = self.solve(attack_factor, defense_factor)?;
        let mut combat_result = solved.combat_result();
        let mut no_retreat = Vec::new();

        match combat_result {
            CombatResult::AttackerEliminated => board.remove_units(&battle.attackers)?,
            CombatResult::DefenderEliminated => board.remove_units(&battle.defenders)?,
            CombatResult::AttackerRetreat2 => {
                no_retreat = self.retreat(board, &battle.attackers, &battle.defenders)?;
                if no_retreat.len() == battle.attackers.len() {
                    combat_result = CombatResult::AttackerEliminated;
                }
            }
            CombatResult::DefenderRetreat2 => {
                no_retreat = self.retreat(board, &battle.defenders, &battle.attackers)?;
                if no_retreat.len() == battle.defenders.len() {
                    combat_result = CombatResult::DefenderEliminated;
                }
            }
            CombatResult::Exchange => {
                board.remove_units(&battle.defenders)?;
                let losses = exchange_losses(board, &battle.attackers, defense_factor)?;
                board.remove_units(&losses)?;
            }
        }

        Ok(
            CombatResultData::new(solved.odds(), solved.die_roll(), combat_result)
                .with_participants(battle.attackers, battle.defenders)
                .with_no_retreat(no_retreat),
        )
    }

    /// Retreat each unit in `retreating` away from the first opposing unit on
    /// the board. Returns the units that could not retreat and were removed.
    fn retreat(
        &self,
        board: &mut Board,
        retreating: &[UnitId],
        opponents: &[UnitId],
    ) -> Result<Vec<UnitId>> {
        let anchor = opponents
            .iter()
            .find_map(|&id| board.get_unit_by_id(id).ok().and_then(Unit::coords))
            .ok_or_else(|| {
                BattleError::InvalidState("No opposing unit left to retreat from".to_string())
            })?;

        let mut failed = Vec::new();
        for &id in retreating {
            let unit = participant(board, id)?;
            match retreat_destination(board, unit, anchor, self.retreat_distance) {
                Some(destination) => {
                    tracing::debug!(unit = %id, to = %destination, "Unit retreats");
                    board.move_unit(id, destination)?;
                }
                None => {
                    tracing::debug!(unit = %id, from = %anchor, "Retreat blocked, unit eliminated");
                    board.remove_unit(id)?;
                    failed.push(id);
                }
            }
        }
        Ok(failed)
    }
}

fn participant(board: &Board, id: UnitId) -> Result<&Unit> {
    board
        .get_unit_by_id(id)
        .map_err(|_| BattleError::InvalidState(format!("Combat participant {id} left the board")))
}

fn sum_factor(board: &Board, ids: &[UnitId], factor: impl Fn(&Unit) -> u32) -> Result<u32> {
    ids.iter()
        .map(|&id| participant(board, id).map(&factor))
        .sum()
}

/// Final hex of a straight retreat directly away from `anchor`, or `None`
/// when any step leaves the board or enters a hex holding a hostile unit.
fn retreat_destination(
    board: &Board,
    unit: &Unit,
    anchor: HexCoord,
    distance: u32,
) -> Option<HexCoord> {
    let start = unit.coords()?.to_cube();
    let direction = (start - anchor.to_cube()).unit_direction()?;

    // A retreat longer than any board always runs off it.
    let distance = i32::try_from(distance).ok()?;
    let mut destination = None;
    for step in 1..=distance {
        let next = (start + direction * step).to_offset();
        if !board.contains(next) || board.units_at(next).any(|other| !other.is_friendly(unit)) {
            return None;
        }
        destination = Some(next);
    }
    destination
}

/// Attackers lost in an exchange against `defense_factor`.
fn exchange_losses(board: &Board, attackers: &[UnitId], defense_factor: u32) -> Result<Vec<UnitId>> {
    let attacks = attackers
        .iter()
        .map(|&id| participant(board, id).map(|unit| unit.attack))
        .collect::<Result<Vec<u32>>>()?;
    Ok(match minimal_losses(&attacks, defense_factor) {
        Some(indices) => indices.into_iter().map(|index| attackers[index]).collect(),
        None => attackers.to_vec(),
    })
}
