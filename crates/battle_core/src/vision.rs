//! Line of sight, field of view and per-seat fog of war.
//!
//! Terrain marked with `blocks_sight` is opaque. An opaque hex is itself
//! visible (a unit can see the wall) but hides whatever lies behind it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::board::{Board, Hex};
use crate::hex::{hex_line, HexCoord};
use crate::unit::{PlayerId, Seat, Unit};

/// Visibility queries for a board.
#[derive(Debug, Clone, Copy)]
pub struct VisionCalculator<'a> {
    board: &'a Board,
}

impl<'a> VisionCalculator<'a> {
    /// Create a calculator over the given board.
    #[must_use]
    pub const fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Whether the hex at `coord` blocks sight. Off-board hexes never do.
    #[must_use]
    pub fn is_opaque(&self, coord: HexCoord) -> bool {
        self.board.hex(coord).is_some_and(Hex::blocks_sight)
    }

    /// Whether `to` can be seen from `from`.
    ///
    /// Only the hexes strictly between the two ends are checked, so an
    /// opaque target or an observer standing in cover still sees.
    #[must_use]
    pub fn line_of_sight(&self, from: HexCoord, to: HexCoord) -> bool {
        let line = hex_line(from, to);
        if line.len() <= 2 {
            return true;
        }
        !line[1..line.len() - 1]
            .iter()
            .any(|&coord| self.is_opaque(coord))
    }

    /// Hexes visible from `origin` within `radius` steps.
    ///
    /// Breadth-first flood over on-board hexes. Opaque hexes are added to
    /// the result but never expanded.
    #[must_use]
    pub fn field_of_view(&self, origin: HexCoord, radius: u32) -> BTreeSet<HexCoord> {
        let mut visible = BTreeSet::from([origin]);
        let mut frontier = VecDeque::from([(origin, 0)]);

        while let Some((coord, depth)) = frontier.pop_front() {
            if depth >= radius {
                continue;
            }
            for neighbor in self.board.neighbors(coord) {
                if !visible.insert(neighbor) {
                    continue;
                }
                if !self.is_opaque(neighbor) {
                    frontier.push_back((neighbor, depth + 1));
                }
            }
        }
        visible
    }

    /// Field of view of a single unit. Empty when the unit is off the board.
    #[must_use]
    pub fn unit_view(&self, unit: &Unit, radius: u32) -> BTreeSet<HexCoord> {
        unit.coords()
            .map(|coord| self.field_of_view(coord, radius))
            .unwrap_or_default()
    }

    /// Union of what every unit owned by `seat` can see.
    #[must_use]
    pub fn seat_view(&self, seat: &Seat, radius: u32) -> BTreeSet<HexCoord> {
        let view: BTreeSet<HexCoord> = seat
            .own_units(self.board.units())
            .into_iter()
            .flat_map(|unit| self.unit_view(unit, radius))
            .collect();
        tracing::debug!(seat = %seat.id, hexes = view.len(), "Seat view computed");
        view
    }
}

/// What one seat sees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamVision {
    /// Hexes in sight this turn.
    pub visible_now: BTreeSet<HexCoord>,
    /// Hexes seen at least once.
    pub revealed: BTreeSet<HexCoord>,
}

/// Per-seat record of current and past sight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FogOfWar {
    teams: BTreeMap<PlayerId, TeamVision>,
}

impl FogOfWar {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace what `team` sees now and add it to what it has revealed.
    pub fn update_team(&mut self, team: PlayerId, visible_now: impl IntoIterator<Item = HexCoord>) {
        let vision = self.teams.entry(team).or_default();
        vision.visible_now = visible_now.into_iter().collect();
        vision.revealed.extend(vision.visible_now.iter().copied());
    }

    /// Whether `team` sees `coord` this turn.
    #[must_use]
    pub fn is_visible(&self, team: PlayerId, coord: HexCoord) -> bool {
        self.teams
            .get(&team)
            .is_some_and(|vision| vision.visible_now.contains(&coord))
    }

    /// Whether `team` has ever seen `coord`.
    #[must_use]
    pub fn is_revealed(&self, team: PlayerId, coord: HexCoord) -> bool {
        self.teams
            .get(&team)
            .is_some_and(|vision| vision.revealed.contains(&coord))
    }

    /// Forget current sight for one team, or for every team with `None`.
    /// Revealed hexes stay revealed.
    pub fn clear_turn(&mut self, team: Option<PlayerId>) {
        match team {
            Some(id) => {
                if let Some(vision) = self.teams.get_mut(&id) {
                    vision.visible_now.clear();
                }
            }
            None => self
                .teams
                .values_mut()
                .for_each(|vision| vision.visible_now.clear()),
        }
    }

    /// Vision record of one team, if it was ever updated.
    #[must_use]
    pub fn team(&self, team: PlayerId) -> Option<&TeamVision> {
        self.teams.get(&team)
    }
}
