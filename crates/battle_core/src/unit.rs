//! Units, factions and the seats that own them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;

/// Stable identifier of a unit for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub u32);

/// Identifier of a player seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A faction: a named, colored grouping of units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    /// Unique identifier.
    pub id: FactionId,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
}

impl Faction {
    /// Create a new faction.
    #[must_use]
    pub fn new(id: FactionId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

impl PartialEq for Faction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Faction {}

/// Who makes the decisions for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Decisions arrive from a human through an external proxy.
    Human,
    /// Decisions are made by a computer strategy.
    Cpu,
}

/// Engine-side record of a player: identity and the factions it controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Seat identifier, matching [`Unit::owner`].
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Human or computer.
    pub kind: PlayerKind,
    /// Factions controlled by this seat.
    pub factions: Vec<FactionId>,
}

impl Seat {
    /// Create a seat with no factions.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            factions: Vec::new(),
        }
    }

    /// Builder method to add a controlled faction.
    #[must_use]
    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.add_faction(faction);
        self
    }

    /// Add a controlled faction.
    pub fn add_faction(&mut self, faction: FactionId) {
        if !self.factions.contains(&faction) {
            self.factions.push(faction);
        }
    }

    /// Whether this seat controls the faction.
    #[must_use]
    pub fn has_faction(&self, faction: FactionId) -> bool {
        self.factions.contains(&faction)
    }

    /// Whether the unit belongs to one of this seat's factions.
    #[must_use]
    pub fn owns(&self, unit: &Unit) -> bool {
        self.has_faction(unit.faction)
    }

    /// Filter `units` down to the ones this seat owns.
    pub fn own_units<'a>(&self, units: impl IntoIterator<Item = &'a Unit>) -> Vec<&'a Unit> {
        units.into_iter().filter(|unit| self.owns(unit)).collect()
    }
}

/// A combat unit.
///
/// Coordinates are `None` while the unit is off the board, which includes
/// after it has been eliminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier.
    pub id: UnitId,
    /// Display name.
    pub name: String,
    /// Faction the unit fights for.
    pub faction: FactionId,
    /// Seat that owns the unit; used for friend/foe tests.
    pub owner: PlayerId,
    /// Unit type label ("Infantry", "Recon", ...).
    pub kind: String,
    /// Attack factor.
    pub attack: u32,
    /// Defense factor.
    pub defense: u32,
    /// Movement allowance.
    pub movement: u32,
    coords: Option<HexCoord>,
}

impl Unit {
    /// Create an off-board unit.
    #[must_use]
    pub fn new(
        id: UnitId,
        name: impl Into<String>,
        faction: FactionId,
        owner: PlayerId,
        kind: impl Into<String>,
        attack: u32,
        defense: u32,
        movement: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            owner,
            kind: kind.into(),
            attack,
            defense,
            movement,
            coords: None,
        }
    }

    /// Combined attack and defense factors.
    #[must_use]
    pub const fn strength(&self) -> u32 {
        self.attack + self.defense
    }

    /// Current hex, or `None` when the unit is not on the board.
    #[must_use]
    pub const fn coords(&self) -> Option<HexCoord> {
        self.coords
    }

    pub(crate) fn set_coords(&mut self, coords: Option<HexCoord>) {
        self.coords = coords;
    }

    /// Whether both units belong to the same seat.
    #[must_use]
    pub fn is_friendly(&self, other: &Unit) -> bool {
        self.owner == other.owner
    }

    /// Whether the two units stand on neighboring hexes.
    #[must_use]
    pub fn is_adjacent(&self, other: &Unit) -> bool {
        match (self.coords, other.coords) {
            (Some(a), Some(b)) => a.is_adjacent(b),
            _ => false,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}-{}",
            self.name, self.attack, self.defense, self.movement
        )
    }
}
