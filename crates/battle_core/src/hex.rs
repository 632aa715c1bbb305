//! Hex coordinate geometry.
//!
//! The board uses offset "odd-q" coordinates: columns are vertical strips
//! and odd columns sit half a hex lower than even columns. Distances and
//! directions are computed in cube coordinates, where every hex satisfies
//! `x + y + z = 0` and the hex distance is the Chebyshev distance.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::math::{ratio, round_to_int, Fixed};

/// Neighbor offsets `(d_row, d_column)` for hexes in even columns.
pub const EVEN_COLUMN_DIRECTIONS: [(i32, i32); 6] = [
    (-1, 0),  // North
    (-1, 1),  // Northeast
    (0, 1),   // Southeast
    (1, 0),   // South
    (0, -1),  // Southwest
    (-1, -1), // Northwest
];

/// Neighbor offsets `(d_row, d_column)` for hexes in odd columns.
pub const ODD_COLUMN_DIRECTIONS: [(i32, i32); 6] = [
    (-1, 0), // North
    (0, 1),  // Northeast
    (1, 1),  // Southeast
    (1, 0),  // South
    (1, -1), // Southwest
    (0, -1), // Northwest
];

/// Offset coordinate of a hex on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HexCoord {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub column: i32,
}

impl PartialOrd for HexCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HexCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Row-major ordering for deterministic iteration
        (self.row, self.column).cmp(&(other.row, other.column))
    }
}

impl HexCoord {
    /// Create a new hex coordinate.
    #[inline]
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Neighbor offset table for this hex's column parity.
    #[must_use]
    pub const fn directions(self) -> &'static [(i32, i32); 6] {
        if self.column % 2 == 0 {
            &EVEN_COLUMN_DIRECTIONS
        } else {
            &ODD_COLUMN_DIRECTIONS
        }
    }

    /// All six neighboring coordinates, without any bounds filtering.
    #[must_use]
    pub fn neighbor_coords(self) -> [HexCoord; 6] {
        self.directions()
            .map(|(d_row, d_column)| HexCoord::new(self.row + d_row, self.column + d_column))
    }

    /// Whether `other` is one of the six neighbors of this hex.
    #[must_use]
    pub fn is_adjacent(self, other: HexCoord) -> bool {
        self.neighbor_coords().contains(&other)
    }

    /// Convert to cube coordinates.
    #[must_use]
    pub const fn to_cube(self) -> Cube {
        let x = self.column;
        let z = self.row - (self.column - (self.column & 1)) / 2;
        Cube { x, y: -x - z, z }
    }

    /// Hex distance to another coordinate.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        self.to_cube().distance(other.to_cube())
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((row, column): (i32, i32)) -> Self {
        Self::new(row, column)
    }
}

/// Hex distance between two offset coordinates.
#[must_use]
pub fn hex_distance(a: HexCoord, b: HexCoord) -> u32 {
    a.distance(b)
}

/// Cube coordinate (or cube-space vector) with `x + y + z = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cube {
    /// X axis (equals the offset column).
    pub x: i32,
    /// Y axis.
    pub y: i32,
    /// Z axis.
    pub z: i32,
}

impl Cube {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a cube coordinate.
    ///
    /// Callers are responsible for `x + y + z == 0`.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Convert back to offset coordinates.
    #[must_use]
    pub const fn to_offset(self) -> HexCoord {
        HexCoord {
            row: self.z + (self.x - (self.x & 1)) / 2,
            column: self.x,
        }
    }

    /// Length of this vector in hex steps.
    #[must_use]
    pub fn length(self) -> u32 {
        self.x
            .unsigned_abs()
            .max(self.y.unsigned_abs())
            .max(self.z.unsigned_abs())
    }

    /// Chebyshev distance to another cube coordinate.
    #[must_use]
    pub fn distance(self, other: Cube) -> u32 {
        (self - other).length()
    }

    /// Dot product of two cube vectors.
    #[must_use]
    pub const fn dot(self, other: Cube) -> i32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Unit step pointing along this vector, snapped onto the grid.
    ///
    /// Divides the vector by its length and cube-rounds the result, so the
    /// step is always one of the six neighbor directions. Returns `None` for
    /// the zero vector.
    #[must_use]
    pub fn unit_direction(self) -> Option<Cube> {
        let length = self.length() as i32;
        if length == 0 {
            return None;
        }
        Some(round_cube(
            ratio(self.x, length),
            ratio(self.y, length),
            ratio(self.z, length),
        ))
    }
}

/// Snap a fractional cube position onto the nearest hex.
///
/// Each axis rounds half away from zero, then the axis that moved furthest
/// is recomputed from the other two so the result stays on the plane.
fn round_cube(fx: Fixed, fy: Fixed, fz: Fixed) -> Cube {
    let (mut rx, mut ry, mut rz) = (round_to_int(fx), round_to_int(fy), round_to_int(fz));

    let dx = (fixed_of(rx) - fx).abs();
    let dy = (fixed_of(ry) - fy).abs();
    let dz = (fixed_of(rz) - fz).abs();

    if dx > dy && dx > dz {
        rx = -ry - rz;
    } else if dy > dz {
        ry = -rx - rz;
    } else {
        rz = -rx - ry;
    }
    Cube::new(rx, ry, rz)
}

/// Every hex on the straight line from `a` to `b`, both ends included.
///
/// Samples `distance + 1` evenly spaced points along the cube segment and
/// rounds each onto the grid, so consecutive hexes are always adjacent.
#[must_use]
pub fn hex_line(a: HexCoord, b: HexCoord) -> Vec<HexCoord> {
    let steps = a.distance(b) as i32;
    if steps == 0 {
        return vec![a];
    }
    let (from, delta) = (a.to_cube(), b.to_cube() - a.to_cube());
    (0..=steps)
        .map(|i| {
            round_cube(
                fixed_of(from.x) + ratio(delta.x * i, steps),
                fixed_of(from.y) + ratio(delta.y * i, steps),
                fixed_of(from.z) + ratio(delta.z * i, steps),
            )
            .to_offset()
        })
        .collect()
}

fn fixed_of(value: i32) -> Fixed {
    Fixed::from_num(value)
}

impl Add for Cube {
    type Output = Cube;

    fn add(self, rhs: Cube) -> Cube {
        Cube::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Cube {
    type Output = Cube;

    fn sub(self, rhs: Cube) -> Cube {
        Cube::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for Cube {
    type Output = Cube;

    fn mul(self, rhs: i32) -> Cube {
        Cube::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
