//! Terrain types and objective markers placed on hexes during scenario setup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;

/// Movement cost of a hex without terrain.
pub const DEFAULT_MOVE_COST: u32 = 1;

/// A terrain type shared by every hex that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terrain {
    /// Display name ("forest", "mountain", ...).
    pub name: String,
    /// Display color, as a CSS-style color string.
    pub color: String,
    /// Movement points spent to enter a hex with this terrain.
    pub move_cost: u32,
    /// Whether the terrain blocks line of sight through the hex.
    #[serde(default)]
    pub blocks_sight: bool,
}

impl Terrain {
    /// Create a terrain with the default movement cost.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            move_cost: DEFAULT_MOVE_COST,
            blocks_sight: false,
        }
    }

    /// Builder method to set the movement cost.
    ///
    /// Costs are clamped to at least 1 so every step consumes movement.
    #[must_use]
    pub fn with_move_cost(mut self, move_cost: u32) -> Self {
        self.move_cost = move_cost.max(1);
        self
    }

    /// Builder method to make the terrain block line of sight.
    #[must_use]
    pub fn opaque(mut self) -> Self {
        self.blocks_sight = true;
        self
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// What a player must do with an objective to score it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// Points are awarded for occupying the hex at the end of a phase.
    Hold,
    /// Scenario-defined kind the rules engine does not score.
    Other(String),
}

/// A scoring marker on a hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Objective {
    /// Hex the objective sits on.
    pub coord: HexCoord,
    /// Points awarded when the objective is scored.
    pub points: u32,
    /// Scoring rule for this objective.
    pub kind: ObjectiveKind,
}

impl Objective {
    /// Create a hold objective.
    #[must_use]
    pub const fn hold(coord: HexCoord, points: u32) -> Self {
        Self {
            coord,
            points,
            kind: ObjectiveKind::Hold,
        }
    }

    /// Whether this objective is scored by holding it.
    #[must_use]
    pub fn is_hold(&self) -> bool {
        self.kind == ObjectiveKind::Hold
    }
}
