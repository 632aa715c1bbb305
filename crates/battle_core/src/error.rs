//! Error types for the rules engine.

use thiserror::Error;

use crate::unit::UnitId;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for all rules engine errors.
///
/// "No path" and "no target" situations are not errors: they are reported
/// as empty collections or `None` by the query that produced them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BattleError {
    /// Coordinates outside the board.
    #[error("Coordinates ({row}, {column}) are out of bounds")]
    OutOfBounds {
        /// Requested row.
        row: i32,
        /// Requested column.
        column: i32,
    },

    /// Unit identifier unknown to the board, or no longer in play.
    #[error("No unit found with ID {0}")]
    UnitNotFound(UnitId),

    /// A movement plan that is not a contiguous hex sequence from the unit's hex.
    #[error("Invalid movement path for unit {unit}: {reason}")]
    InvalidPath {
        /// Unit the plan was issued for.
        unit: UnitId,
        /// What is wrong with the path.
        reason: String,
    },

    /// Combat result code that does not name a CRT outcome.
    #[error("Unknown combat result code: {0}")]
    UnknownCombatResult(String),

    /// Die value outside 1..=6.
    #[error("Invalid die roll: {0}")]
    InvalidDieRoll(i32),

    /// Rules configuration that failed to parse or validate.
    #[error("Invalid rules configuration: {0}")]
    InvalidConfig(String),

    /// Invalid engine state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
