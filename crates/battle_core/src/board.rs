//! The hex grid and the registry of units placed on it.
//!
//! The board owns a dense `rows × columns` grid of [`Hex`] cells and an
//! arena of every [`Unit`] ever placed. Removing a unit clears its
//! coordinates and takes it out of play, but the arena keeps the record so
//! stale [`UnitId`] handles held by players or combat results can still be
//! asked whether the unit is on the board.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::hex::HexCoord;
use crate::movement::MovementCalculator;
use crate::terrain::{Objective, Terrain, DEFAULT_MOVE_COST};
use crate::unit::{FactionId, Unit, UnitId};
use crate::vision::VisionCalculator;

/// One cell of the board.
///
/// Equality is by coordinate only.
#[derive(Debug, Clone)]
pub struct Hex {
    coord: HexCoord,
    terrain: Option<Arc<Terrain>>,
    objectives: Vec<Objective>,
}

impl Hex {
    fn new(coord: HexCoord) -> Self {
        Self {
            coord,
            terrain: None,
            objectives: Vec::new(),
        }
    }

    /// Coordinate of this hex.
    #[must_use]
    pub const fn coord(&self) -> HexCoord {
        self.coord
    }

    /// Row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.coord.row
    }

    /// Column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.coord.column
    }

    /// Terrain of this hex, if any.
    #[must_use]
    pub fn terrain(&self) -> Option<&Terrain> {
        self.terrain.as_deref()
    }

    /// Set or clear the terrain. Scenario setup only.
    pub fn set_terrain(&mut self, terrain: Option<Arc<Terrain>>) {
        self.terrain = terrain;
    }

    /// Movement points needed to enter this hex.
    #[must_use]
    pub fn move_cost(&self) -> u32 {
        self.terrain
            .as_ref()
            .map_or(DEFAULT_MOVE_COST, |terrain| terrain.move_cost)
    }

    /// Whether terrain on this hex blocks line of sight.
    #[must_use]
    pub fn blocks_sight(&self) -> bool {
        self.terrain.as_ref().is_some_and(|terrain| terrain.blocks_sight)
    }

    /// Objective markers on this hex.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }
}

impl PartialEq for Hex {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Hex {}

impl Hash for Hex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

/// Position of one unit in a sparse board payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseUnit {
    /// Unit identifier.
    pub id: UnitId,
    /// Row of the unit.
    pub row: i32,
    /// Column of the unit.
    pub column: i32,
}

/// Partial board state: only unit positions.
///
/// Used to reconcile positions that an external client holds
/// authoritatively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseBoard {
    /// Unit positions.
    pub units: Vec<SparseUnit>,
}

/// The game board.
#[derive(Debug, Clone)]
pub struct Board {
    rows: i32,
    columns: i32,
    /// Hexes stored in row-major order.
    hexes: Vec<Hex>,
    /// Every unit ever placed, in placement order.
    arena: Vec<Unit>,
    /// Arena slot by unit id.
    slots: HashMap<UnitId, usize>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `columns` is negative.
    #[must_use]
    pub fn new(rows: i32, columns: i32) -> Self {
        assert!(rows >= 0, "Board rows must not be negative");
        assert!(columns >= 0, "Board columns must not be negative");

        let hexes = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| Hex::new(HexCoord::new(row, column))))
            .collect();
        Self {
            rows,
            columns,
            hexes,
            arena: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Check if coordinates are on the board.
    #[must_use]
    pub const fn is_in_bounds(&self, row: i32, column: i32) -> bool {
        row >= 0 && row < self.rows && column >= 0 && column < self.columns
    }

    /// Check if a coordinate is on the board.
    #[must_use]
    pub const fn contains(&self, coord: HexCoord) -> bool {
        self.is_in_bounds(coord.row, coord.column)
    }

    #[inline]
    fn index(&self, row: i32, column: i32) -> usize {
        (row * self.columns + column) as usize
    }

    fn check_bounds(&self, coord: HexCoord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(BattleError::OutOfBounds {
                row: coord.row,
                column: coord.column,
            })
        }
    }

    /// Get the hex at the given position.
    /// Returns `None` if out of bounds.
    #[must_use]
    pub fn get_hex(&self, row: i32, column: i32) -> Option<&Hex> {
        if self.is_in_bounds(row, column) {
            Some(&self.hexes[self.index(row, column)])
        } else {
            None
        }
    }

    /// Get the hex at a coordinate.
    #[must_use]
    pub fn hex(&self, coord: HexCoord) -> Option<&Hex> {
        self.get_hex(coord.row, coord.column)
    }

    /// Mutable access to a hex, for scenario setup.
    pub fn get_hex_mut(&mut self, row: i32, column: i32) -> Option<&mut Hex> {
        if self.is_in_bounds(row, column) {
            let index = self.index(row, column);
            Some(&mut self.hexes[index])
        } else {
            None
        }
    }

    /// All hexes in row-major order.
    #[must_use]
    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    /// Set the terrain of a hex.
    pub fn set_terrain(&mut self, coord: HexCoord, terrain: Arc<Terrain>) -> Result<()> {
        self.check_bounds(coord)?;
        let index = self.index(coord.row, coord.column);
        self.hexes[index].set_terrain(Some(terrain));
        Ok(())
    }

    /// Place an objective marker on the hex it names.
    pub fn add_objective(&mut self, objective: Objective) -> Result<()> {
        self.check_bounds(objective.coord)?;
        let index = self.index(objective.coord.row, objective.coord.column);
        self.hexes[index].objectives.push(objective);
        Ok(())
    }

    /// Every objective on the board, in row-major hex order.
    #[must_use]
    pub fn objectives(&self) -> Vec<&Objective> {
        self.hexes.iter().flat_map(|hex| hex.objectives.iter()).collect()
    }

    /// On-board neighbors of a coordinate.
    #[must_use]
    pub fn neighbors(&self, coord: HexCoord) -> Vec<HexCoord> {
        coord
            .neighbor_coords()
            .into_iter()
            .filter(|neighbor| self.contains(*neighbor))
            .collect()
    }

    /// Place a unit on the board and register it.
    ///
    /// Placing a unit whose id is already in play replaces the stored record
    /// in its placement slot. A removed unit placed again rejoins at the end
    /// of the placement order.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::OutOfBounds`] if the hex is off the board.
    pub fn add_unit(&mut self, mut unit: Unit, row: i32, column: i32) -> Result<UnitId> {
        let coord = HexCoord::new(row, column);
        self.check_bounds(coord)?;

        unit.set_coords(Some(coord));
        let id = unit.id;
        if let Some(&slot) = self.slots.get(&id) {
            if self.arena[slot].coords().is_some() {
                self.arena[slot] = unit;
                return Ok(id);
            }
            self.arena.remove(slot);
            for later in self.slots.values_mut().filter(|later| **later > slot) {
                *later -= 1;
            }
        }
        self.slots.insert(id, self.arena.len());
        self.arena.push(unit);
        Ok(id)
    }

    /// Take a unit out of play.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnitNotFound`] if the unit is unknown or was
    /// already removed.
    pub fn remove_unit(&mut self, id: UnitId) -> Result<()> {
        let unit = self.active_mut(id)?;
        unit.set_coords(None);
        tracing::debug!(unit = %id, "Unit removed from board");
        Ok(())
    }

    /// Take several units out of play.
    ///
    /// Stops at the first id that is not in play.
    pub fn remove_units(&mut self, ids: &[UnitId]) -> Result<()> {
        ids.iter().try_for_each(|&id| self.remove_unit(id))
    }

    /// Move an in-play unit to another hex.
    pub fn move_unit(&mut self, id: UnitId, coord: HexCoord) -> Result<()> {
        self.check_bounds(coord)?;
        self.active_mut(id)?.set_coords(Some(coord));
        Ok(())
    }

    fn active_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.slots
            .get(&id)
            .map(|&slot| &mut self.arena[slot])
            .filter(|unit| unit.coords().is_some())
            .ok_or(BattleError::UnitNotFound(id))
    }

    /// Look up an in-play unit.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnitNotFound`] for unknown or removed ids.
    pub fn get_unit_by_id(&self, id: UnitId) -> Result<&Unit> {
        self.unit_record(id)
            .filter(|unit| unit.coords().is_some())
            .ok_or(BattleError::UnitNotFound(id))
    }

    /// Look up any unit ever placed, including removed ones.
    #[must_use]
    pub fn unit_record(&self, id: UnitId) -> Option<&Unit> {
        self.slots.get(&id).map(|&slot| &self.arena[slot])
    }

    /// Whether the unit is currently on the board.
    #[must_use]
    pub fn is_in_play(&self, id: UnitId) -> bool {
        self.get_unit_by_id(id).is_ok()
    }

    /// Units on the board, in placement order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.arena.iter().filter(|unit| unit.coords().is_some())
    }

    /// Number of units on the board.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units().count()
    }

    /// Units on the board belonging to any of the given factions.
    #[must_use]
    pub fn find_units(&self, factions: &[FactionId]) -> Vec<&Unit> {
        self.units()
            .filter(|unit| factions.contains(&unit.faction))
            .collect()
    }

    /// Units standing on a hex.
    pub fn units_at(&self, coord: HexCoord) -> impl Iterator<Item = &Unit> {
        self.units().filter(move |unit| unit.coords() == Some(coord))
    }

    /// Units standing on any of the given hexes.
    #[must_use]
    pub fn units_for_hexes(&self, coords: &[HexCoord]) -> Vec<&Unit> {
        self.units()
            .filter(|unit| unit.coords().is_some_and(|c| coords.contains(&c)))
            .collect()
    }

    /// Whether any unit on a hex neighboring `coord` is hostile to `unit`.
    ///
    /// This is the zone-of-control test: movement stops on entering such a
    /// hex.
    #[must_use]
    pub fn enemy_adjacent(&self, unit: &Unit, coord: HexCoord) -> bool {
        let neighbors = self.neighbors(coord);
        self.units_for_hexes(&neighbors)
            .iter()
            .any(|other| !other.is_friendly(unit))
    }

    /// Nearest other unit that is friendly (`want_friend`) or hostile to `unit`.
    ///
    /// Ties go to the unit placed first. Returns `None` if the unit is off
    /// the board or no candidate exists.
    #[must_use]
    pub fn get_nearest_unit(&self, unit: &Unit, want_friend: bool) -> Option<&Unit> {
        let origin = unit.coords()?;
        let mut nearest: Option<(u32, &Unit)> = None;
        for other in self.units() {
            if other.id == unit.id || other.is_friendly(unit) != want_friend {
                continue;
            }
            let Some(coord) = other.coords() else {
                continue;
            };
            let distance = origin.distance(coord);
            if nearest.map_or(true, |(best, _)| distance < best) {
                nearest = Some((distance, other));
            }
        }
        nearest.map(|(_, other)| other)
    }

    /// Apply externally held unit positions.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown unit id or out-of-bounds position; entries
    /// before it have already been applied.
    pub fn update(&mut self, sparse: &SparseBoard) -> Result<()> {
        for entry in &sparse.units {
            let coord = HexCoord::new(entry.row, entry.column);
            self.check_bounds(coord)?;
            self.active_mut(entry.id)?.set_coords(Some(coord));
        }
        Ok(())
    }

    /// Export the positions of every unit on the board.
    #[must_use]
    pub fn to_sparse_board(&self) -> SparseBoard {
        SparseBoard {
            units: self
                .units()
                .filter_map(|unit| {
                    unit.coords().map(|coord| SparseUnit {
                        id: unit.id,
                        row: coord.row,
                        column: coord.column,
                    })
                })
                .collect(),
        }
    }

    /// Hash of every unit's id and position, in placement order.
    ///
    /// Two boards that went through the same sequence of moves and
    /// battles hash equal.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.rows.hash(&mut hasher);
        self.columns.hash(&mut hasher);
        for unit in &self.arena {
            unit.id.hash(&mut hasher);
            unit.coords().hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Movement calculator bound to this board.
    #[must_use]
    pub fn movement(&self) -> MovementCalculator<'_> {
        MovementCalculator::new(self)
    }

    /// Vision calculator bound to this board.
    #[must_use]
    pub fn vision(&self) -> VisionCalculator<'_> {
        VisionCalculator::new(self)
    }

    /// Hexes reachable by `unit` from `start` with `move_points`.
    ///
    /// See [`MovementCalculator::get_reachable_hexes`].
    #[must_use]
    pub fn get_reachable_hexes(
        &self,
        unit: &Unit,
        start: HexCoord,
        move_points: u32,
    ) -> BTreeSet<HexCoord> {
        self.movement().get_reachable_hexes(unit, start, move_points)
    }

    /// Cheapest legal path for `unit` from `start` to `end`.
    ///
    /// See [`MovementCalculator::shortest_path`].
    #[must_use]
    pub fn shortest_path(&self, unit: &Unit, start: HexCoord, end: HexCoord) -> Vec<HexCoord> {
        self.movement().shortest_path(unit, start, end)
    }
}
