//! Proptest strategies for rules engine inputs.
//!
//! These strategies generate random but reproducible inputs for
//! property-based testing of geometry and combat.

use battle_core::prelude::*;
use proptest::prelude::*;

/// Generate a coordinate in a band around a 10x10 board, off-board ones included.
pub fn arb_coord() -> impl Strategy<Value = HexCoord> {
    (-5i32..15i32, -5i32..15i32).prop_map(|(row, column)| HexCoord::new(row, column))
}

/// Generate a coordinate on a `rows x columns` board.
pub fn arb_coord_on(rows: i32, columns: i32) -> impl Strategy<Value = HexCoord> {
    (0..rows, 0..columns).prop_map(|(row, column)| HexCoord::new(row, column))
}

/// Generate a combat factor (1-40).
pub fn arb_factor() -> impl Strategy<Value = u32> {
    1u32..=40u32
}

/// Generate a die face (1-6).
pub fn arb_die_face() -> impl Strategy<Value = u8> {
    1u8..=6u8
}

/// Generate the attack factors of a 1 to 4 unit side.
pub fn arb_attack_factors() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..=8u32, 1..=4)
}

/// Generate a movement allowance (0-6).
pub fn arb_move_points() -> impl Strategy<Value = u32> {
    0u32..=6u32
}
