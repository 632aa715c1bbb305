//! Cost-aware movement search over the board.
//!
//! Movement is a Dijkstra search keyed by accumulated terrain cost with one
//! extra rule: a unit must stop when it enters a hex adjacent to an enemy
//! (its zone of control). Such a hex is reachable, but the search never
//! expands past it.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use crate::board::Board;
use crate::hex::HexCoord;
use crate::unit::Unit;

/// A node in the search priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct SearchNode {
    coord: HexCoord,
    cost: u32,
    /// Insertion counter; equal costs pop in push order.
    sequence: u64,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so we reverse the comparison for min-heap behavior.
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of one search: best cost and predecessor of every reached hex.
#[derive(Debug, Default)]
struct SearchTree {
    cost: HashMap<HexCoord, u32>,
    came_from: HashMap<HexCoord, HexCoord>,
}

impl SearchTree {
    fn contains(&self, coord: HexCoord) -> bool {
        self.cost.contains_key(&coord)
    }

    /// Walk predecessors back from `end` and return the path start-first.
    fn path_to(&self, end: HexCoord) -> Vec<HexCoord> {
        if !self.contains(end) {
            return Vec::new();
        }
        let mut path = vec![end];
        let mut current = end;
        while let Some(&prev) = self.came_from.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Movement queries for units on a board.
#[derive(Debug, Clone, Copy)]
pub struct MovementCalculator<'a> {
    board: &'a Board,
}

impl<'a> MovementCalculator<'a> {
    /// Create a calculator over the given board.
    #[must_use]
    pub const fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Movement points `unit` spends to step from `from` into `to`.
    ///
    /// Only the terrain of the entered hex matters; off-board hexes cost the
    /// default.
    #[must_use]
    pub fn move_cost(&self, _unit: &Unit, _from: HexCoord, to: HexCoord) -> u32 {
        self.board.hex(to).map_or(1, |hex| hex.move_cost())
    }

    fn explore(&self, unit: &Unit, start: HexCoord, move_points: u32) -> SearchTree {
        let mut tree = SearchTree::default();
        if !self.board.contains(start) {
            return tree;
        }

        let mut sequence = 0_u64;
        let mut open: BinaryHeap<SearchNode> = BinaryHeap::new();
        tree.cost.insert(start, 0);
        open.push(SearchNode {
            coord: start,
            cost: 0,
            sequence,
        });

        while let Some(current) = open.pop() {
            if tree.cost.get(&current.coord).is_some_and(|&best| current.cost > best) {
                continue;
            }
            if current.cost >= move_points {
                continue;
            }
            if self.board.enemy_adjacent(unit, current.coord) {
                // Zone of control: reachable, but movement ends here.
                continue;
            }

            for neighbor in self.board.neighbors(current.coord) {
                let new_cost = current.cost + self.move_cost(unit, current.coord, neighbor);
                if new_cost > move_points {
                    continue;
                }
                let prior = tree.cost.get(&neighbor).copied().unwrap_or(u32::MAX);
                if new_cost < prior {
                    tree.cost.insert(neighbor, new_cost);
                    tree.came_from.insert(neighbor, current.coord);
                    sequence += 1;
                    open.push(SearchNode {
                        coord: neighbor,
                        cost: new_cost,
                        sequence,
                    });
                }
            }
        }

        tree
    }

    /// All hexes `unit` can reach from `start` spending at most `move_points`.
    ///
    /// Always contains `start` when it is on the board. A hex adjacent to an
    /// enemy is included but never expanded.
    #[must_use]
    pub fn get_reachable_hexes(
        &self,
        unit: &Unit,
        start: HexCoord,
        move_points: u32,
    ) -> BTreeSet<HexCoord> {
        self.explore(unit, start, move_points)
            .cost
            .into_keys()
            .collect()
    }

    /// Cheapest legal path from `start` to `end` within the unit's movement
    /// allowance, both ends included.
    ///
    /// Returns an empty path when no legal path exists.
    #[must_use]
    pub fn shortest_path(&self, unit: &Unit, start: HexCoord, end: HexCoord) -> Vec<HexCoord> {
        let path = self.explore(unit, start, unit.movement).path_to(end);
        tracing::debug!(
            unit = %unit.id,
            %start,
            %end,
            steps = path.len().saturating_sub(1),
            "Shortest path"
        );
        path
    }

    /// Path of at most `max_steps` moves that gets `unit` as close as
    /// possible to `target`.
    ///
    /// Among the closest reachable hexes, the one with the shortest path
    /// wins, then the one whose direction from the start best lines up with
    /// the direction to the target. Returns `[start]` when staying put is
    /// best and an empty path when the unit is off the board.
    #[must_use]
    pub fn path_towards(&self, unit: &Unit, target: HexCoord, max_steps: u32) -> Vec<HexCoord> {
        self.directed_path(unit, target, max_steps, Heading::Towards)
    }

    /// Path of at most `max_steps` moves that takes `unit` as far as
    /// possible from `threat`.
    ///
    /// Ties between equally distant hexes go to the shortest path.
    #[must_use]
    pub fn path_away_from(&self, unit: &Unit, threat: HexCoord, max_steps: u32) -> Vec<HexCoord> {
        self.directed_path(unit, threat, max_steps, Heading::AwayFrom)
    }

    fn directed_path(
        &self,
        unit: &Unit,
        target: HexCoord,
        max_steps: u32,
        heading: Heading,
    ) -> Vec<HexCoord> {
        let Some(start) = unit.coords() else {
            return Vec::new();
        };
        let tree = self.explore(unit, start, max_steps);
        let start_cube = start.to_cube();
        let target_vector = target.to_cube() - start_cube;

        // Sorted so ties that survive every criterion resolve the same way.
        let candidates: BTreeSet<HexCoord> = tree.cost.keys().copied().collect();
        let mut best: Option<(Rank, HexCoord)> = None;
        for coord in candidates {
            let distance = coord.distance(target);
            let alignment = match heading {
                Heading::Towards => (coord.to_cube() - start_cube).dot(target_vector),
                Heading::AwayFrom => 0,
            };
            let rank = Rank {
                distance: match heading {
                    Heading::Towards => i64::from(distance),
                    Heading::AwayFrom => -i64::from(distance),
                },
                path_len: tree.path_to(coord).len(),
                misalignment: -alignment,
            };
            if best.as_ref().map_or(true, |(current, _)| rank < *current) {
                best = Some((rank, coord));
            }
        }

        let Some((_, destination)) = best else {
            return vec![start];
        };
        let mut path = tree.path_to(destination);
        path.truncate(max_steps as usize + 1);
        path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Towards,
    AwayFrom,
}

/// Lexicographic ranking of a candidate destination; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rank {
    distance: i64,
    path_len: usize,
    misalignment: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Terrain;
    use crate::unit::{FactionId, PlayerId, UnitId};
    use std::sync::Arc;

    fn red() -> Unit {
        Unit::new(UnitId(1), "Red", FactionId(1), PlayerId(1), "Infantry", 2, 2, 6)
    }

    fn blue() -> Unit {
        Unit::new(UnitId(2), "Blue", FactionId(2), PlayerId(2), "Infantry", 4, 4, 4)
    }

    fn coords(list: &[(i32, i32)]) -> BTreeSet<HexCoord> {
        list.iter().copied().map(HexCoord::from).collect()
    }

    fn place(board: &mut Board, unit: Unit, row: i32, column: i32) -> Unit {
        let id = board.add_unit(unit, row, column).unwrap();
        board.get_unit_by_id(id).unwrap().clone()
    }

    #[test]
    fn test_reachable_within_move_points() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        let reachable = board.get_reachable_hexes(&red, HexCoord::new(2, 2), 2);

        let expected = coords(&[
            (2, 2),
            (1, 2), (1, 3), (2, 3), (3, 2), (2, 1), (1, 1),
            (0, 2), (0, 3), (1, 4), (2, 4), (3, 4), (3, 3),
            (4, 2), (3, 1), (3, 0), (2, 0), (1, 0), (0, 1),
        ]);
        assert_eq!(reachable, expected);
    }

    #[test]
    fn test_reachable_with_no_move_points() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        let reachable = board.get_reachable_hexes(&red, HexCoord::new(2, 2), 0);
        assert_eq!(reachable, coords(&[(2, 2)]));
    }

    #[test]
    fn test_reachable_with_enemy_zone_of_control() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        place(&mut board, blue(), 3, 3);

        let reachable = board.get_reachable_hexes(&red, HexCoord::new(2, 2), 2);
        assert_eq!(reachable.len(), 16);
    }

    #[test]
    fn test_reachable_stops_when_start_in_zone_of_control() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        place(&mut board, blue(), 1, 2);

        let reachable = board.get_reachable_hexes(&red, HexCoord::new(2, 2), 3);
        assert_eq!(reachable, coords(&[(2, 2)]));
    }

    #[test]
    fn test_reachable_respects_terrain_cost() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        let mountain = Arc::new(Terrain::new("mountain", "#777777").with_move_cost(3));
        let forest = Arc::new(Terrain::new("forest", "#558855").with_move_cost(2));
        board.set_terrain(HexCoord::new(2, 3), mountain).unwrap();
        board.set_terrain(HexCoord::new(3, 2), forest).unwrap();

        let reachable = board.get_reachable_hexes(&red, HexCoord::new(2, 2), 2);
        assert!(!reachable.contains(&HexCoord::new(2, 3)));
        assert!(reachable.contains(&HexCoord::new(3, 2)));
    }

    #[test]
    fn test_shortest_path_avoids_zone_of_control() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        place(&mut board, blue(), 0, 3);

        let path = board.shortest_path(&red, HexCoord::new(2, 2), HexCoord::new(0, 2));
        assert!(path.len() > 1);
        assert_eq!(path[0], HexCoord::new(2, 2));
        assert!(!path.contains(&HexCoord::new(1, 2)));
        assert_eq!(path.last(), Some(&HexCoord::new(0, 2)));
    }

    #[test]
    fn test_shortest_path_blocked_when_start_in_zone_of_control() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        place(&mut board, blue(), 1, 2);

        let path = board.shortest_path(&red, HexCoord::new(2, 2), HexCoord::new(2, 3));
        assert!(path.is_empty());
    }

    #[test]
    fn test_shortest_path_prefers_lower_total_cost() {
        let mut board = Board::new(3, 4);
        let red = place(&mut board, red(), 1, 0);
        let swamp = Arc::new(Terrain::new("swamp", "#445533").with_move_cost(4));
        board.set_terrain(HexCoord::new(1, 1), swamp).unwrap();

        let path = board.shortest_path(&red, HexCoord::new(1, 0), HexCoord::new(1, 3));
        assert_eq!(path.first(), Some(&HexCoord::new(1, 0)));
        assert_eq!(path.last(), Some(&HexCoord::new(1, 3)));
        assert!(!path.contains(&HexCoord::new(1, 1)));
    }

    #[test]
    fn test_shortest_path_to_start() {
        let mut board = Board::new(3, 3);
        let red = place(&mut board, red(), 1, 1);
        let path = board.shortest_path(&red, HexCoord::new(1, 1), HexCoord::new(1, 1));
        assert_eq!(path, vec![HexCoord::new(1, 1)]);
    }

    #[test]
    fn test_shortest_path_out_of_range() {
        let mut board = Board::new(1, 12);
        let red = place(&mut board, red(), 0, 0);
        let path = board.shortest_path(&red, HexCoord::new(0, 0), HexCoord::new(0, 11));
        assert!(path.is_empty());
    }

    #[test]
    fn test_path_towards_limited_steps() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 1);
        place(&mut board, blue(), 4, 1);

        let path = board.movement().path_towards(&red, HexCoord::new(4, 1), 1);
        assert_eq!(path, vec![HexCoord::new(2, 1), HexCoord::new(3, 1)]);
    }

    #[test]
    fn test_path_towards_prefers_shortest_adjacent_path() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 0, 0);
        place(&mut board, blue(), 1, 2);

        let path = board
            .movement()
            .path_towards(&red, HexCoord::new(1, 2), red.movement);
        assert_eq!(path, vec![HexCoord::new(0, 0), HexCoord::new(0, 1)]);
    }

    #[test]
    fn test_path_towards_breaks_ties_by_alignment() {
        let mut board = Board::new(10, 10);
        let red = place(&mut board, red(), 5, 5);
        let movement = board.movement();

        // (5, 6) and (6, 6) both close one hex; the step closer to the
        // straight line wins even when it sorts later.
        let steep = movement.path_towards(&red, HexCoord::new(6, 8), 1);
        assert_eq!(steep, vec![HexCoord::new(5, 5), HexCoord::new(6, 6)]);

        let shallow = movement.path_towards(&red, HexCoord::new(5, 8), 1);
        assert_eq!(shallow, vec![HexCoord::new(5, 5), HexCoord::new(5, 6)]);
    }

    #[test]
    fn test_path_away_from_increases_distance() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 1);
        place(&mut board, blue(), 0, 1);

        let threat = HexCoord::new(0, 1);
        let start_distance = HexCoord::new(2, 1).distance(threat);
        let path = board.movement().path_away_from(&red, threat, 1);
        assert_eq!(path.len(), 2);
        assert!(path[1].distance(threat) > start_distance);
    }

    #[test]
    fn test_directed_path_with_no_steps_stays_put() {
        let mut board = Board::new(5, 5);
        let red = place(&mut board, red(), 2, 2);
        let path = board.movement().path_towards(&red, HexCoord::new(4, 4), 0);
        assert_eq!(path, vec![HexCoord::new(2, 2)]);
    }

    #[test]
    fn test_directed_path_off_board_unit() {
        let board = Board::new(5, 5);
        let path = board.movement().path_towards(&red(), HexCoord::new(4, 4), 3);
        assert!(path.is_empty());
    }
}
