//! Test fixtures and helpers.
//!
//! Two sides, Red and Blue, each one faction played by one seat. Red units
//! are sturdy infantry (4-4-4) and Blue units fast recon (2-2-6), matching
//! the reference scenarios the combat tests are written against.

use battle_core::prelude::*;

/// Red faction id.
pub const RED: FactionId = FactionId(1);
/// Blue faction id.
pub const BLUE: FactionId = FactionId(2);
/// Red seat id.
pub const RED_PLAYER: PlayerId = PlayerId(1);
/// Blue seat id.
pub const BLUE_PLAYER: PlayerId = PlayerId(2);

/// The Red faction.
#[must_use]
pub fn red_faction() -> Faction {
    Faction::new(RED, "Red", "red")
}

/// The Blue faction.
#[must_use]
pub fn blue_faction() -> Faction {
    Faction::new(BLUE, "Blue", "blue")
}

/// Red seat.
#[must_use]
pub fn red_seat(kind: PlayerKind) -> Seat {
    Seat::new(RED_PLAYER, "Red Player", kind).with_faction(RED)
}

/// Blue seat.
#[must_use]
pub fn blue_seat(kind: PlayerKind) -> Seat {
    Seat::new(BLUE_PLAYER, "Blue Player", kind).with_faction(BLUE)
}

/// Builder for test units.
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    unit: Unit,
}

impl UnitBuilder {
    /// Red infantry, 4-4-4.
    #[must_use]
    pub fn red(id: u32) -> Self {
        Self {
            unit: Unit::new(UnitId(id), "Red Unit", RED, RED_PLAYER, "Infantry", 4, 4, 4),
        }
    }

    /// Blue recon, 2-2-6.
    #[must_use]
    pub fn blue(id: u32) -> Self {
        Self {
            unit: Unit::new(UnitId(id), "Blue Unit", BLUE, BLUE_PLAYER, "Recon", 2, 2, 6),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.unit.name = name.to_string();
        self
    }

    /// Set attack, defense and movement factors.
    #[must_use]
    pub fn factors(mut self, attack: u32, defense: u32, movement: u32) -> Self {
        self.unit.attack = attack;
        self.unit.defense = defense;
        self.unit.movement = movement;
        self
    }

    /// The unit, off the board.
    #[must_use]
    pub fn build(self) -> Unit {
        self.unit
    }

    /// Place the unit on a board and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the position is off the board.
    pub fn place(self, board: &mut Board, row: i32, column: i32) -> UnitId {
        board
            .add_unit(self.unit, row, column)
            .expect("fixture unit placed out of bounds")
    }
}

/// Red infantry with the given id.
#[must_use]
pub fn red_unit(id: u32) -> Unit {
    UnitBuilder::red(id).build()
}

/// Blue recon with the given id.
#[must_use]
pub fn blue_unit(id: u32) -> Unit {
    UnitBuilder::blue(id).build()
}

/// The standard empty 10x10 board.
#[must_use]
pub fn empty_board() -> Board {
    Board::new(10, 10)
}

/// Position of a unit that must still be on the board.
///
/// # Panics
///
/// Panics if the unit is not in play.
#[must_use]
pub fn position(board: &Board, id: UnitId) -> HexCoord {
    board
        .get_unit_by_id(id)
        .ok()
        .and_then(Unit::coords)
        .unwrap_or_else(|| panic!("unit {id} is not on the board"))
}

/// Ids of the units on the board, in placement order.
#[must_use]
pub fn unit_ids(board: &Board) -> Vec<UnitId> {
    board.units().map(|unit| unit.id).collect()
}

/// A two-seat game, Red moving first, with a die that always shows `face`.
///
/// # Panics
///
/// Panics if `face` is not a die face.
#[must_use]
pub fn two_player_game(
    board: Board,
    red: Box<dyn Player>,
    blue: Box<dyn Player>,
    face: u8,
) -> Game {
    Game::new(
        board,
        vec![(red_seat(PlayerKind::Cpu), red), (blue_seat(PlayerKind::Cpu), blue)],
        RulesConfig::default(),
        Box::new(FixedDie::new(face).expect("fixture die face out of range")),
    )
    .expect("fixture game is valid")
}
