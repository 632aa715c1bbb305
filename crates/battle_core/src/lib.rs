//! # Battle Core
//!
//! Rules engine for a hex-grid tactical wargame.
//!
//! This crate contains **only** rules logic:
//! - No rendering
//! - No IO
//! - No hidden randomness (dice are injected through [`combat::DieRoller`])
//!
//! Given a board of hexes occupied by opposing units, it computes legal
//! movement under a zone-of-control rule, groups engaged units into
//! battles, and resolves them on a combat results table (CRT) with
//! retreats, exchanges and eliminations.
//!
//! ## Crate Structure
//!
//! - [`hex`] - Offset/cube coordinate geometry
//! - [`board`] - Hex grid, unit registry, zone-of-control queries
//! - [`movement`] - Reachability and shortest-path search
//! - [`vision`] - Line of sight, field of view and fog of war
//! - [`combat`] - Engagement detection, odds, CRT and outcome application
//! - [`player`] - The contract every player strategy implements
//! - [`game`] - Synchronous turn driver
//! - [`scoring`] - Objective scoring and score tracking
//! - [`config`] - Tunable rules configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod board;
pub mod combat;
pub mod config;
pub mod error;
pub mod game;
pub mod hex;
pub mod math;
pub mod movement;
pub mod player;
pub mod scoring;
pub mod terrain;
pub mod unit;
pub mod vision;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::board::{Board, Hex, SparseBoard, SparseUnit};
    pub use crate::combat::{
        CombatResolver, CombatResult, CombatResultData, CombatResultRecord, CombatResults,
        DieRoller, FixedDie, Odds, SeededDie,
    };
    pub use crate::config::RulesConfig;
    pub use crate::error::{BattleError, Result};
    pub use crate::game::Game;
    pub use crate::hex::{hex_distance, hex_line, Cube, HexCoord};
    pub use crate::movement::MovementCalculator;
    pub use crate::player::{MovementPlan, Player};
    pub use crate::scoring::{ObjectiveScorer, ScoreTracker};
    pub use crate::terrain::{Objective, ObjectiveKind, Terrain};
    pub use crate::unit::{Faction, FactionId, PlayerId, PlayerKind, Seat, Unit, UnitId};
    pub use crate::vision::{FogOfWar, TeamVision, VisionCalculator};
}
