//! Board bookkeeping and roster queries.

use battle_core::prelude::*;
use battle_test_utils::fixtures::{
    blue_faction, blue_seat, blue_unit, empty_board, red_faction, red_seat, red_unit, unit_ids,
    UnitBuilder, BLUE, RED,
};

#[test]
fn test_factions_compare_by_id() {
    let renamed = Faction::new(RED, "Crimson", "darkred");
    assert_eq!(red_faction(), renamed);
    assert_ne!(red_faction(), blue_faction());
}

#[test]
fn test_seat_owns_its_faction_units() {
    let mut board = empty_board();
    let red = board.add_unit(red_unit(1), 0, 0).unwrap();
    let blue = board.add_unit(blue_unit(2), 9, 9).unwrap();

    let seat = red_seat(PlayerKind::Cpu);
    let owned: Vec<UnitId> = seat.own_units(board.units()).iter().map(|u| u.id).collect();
    assert_eq!(owned, vec![red]);

    let found: Vec<UnitId> = board.find_units(&[BLUE]).iter().map(|u| u.id).collect();
    assert_eq!(found, vec![blue]);
    assert_eq!(board.find_units(&[RED, BLUE]).len(), 2);
}

#[test]
fn test_seat_with_two_factions() {
    let mut seat = blue_seat(PlayerKind::Human);
    seat.add_faction(RED);
    seat.add_faction(RED);
    assert_eq!(seat.factions, vec![BLUE, RED]);
    assert!(seat.owns(&red_unit(1)));
}

#[test]
fn test_removed_unit_leaves_play_but_keeps_record() {
    let mut board = empty_board();
    let red = board.add_unit(red_unit(1), 3, 3).unwrap();
    board.remove_unit(red).unwrap();

    assert!(!board.is_in_play(red));
    assert_eq!(board.unit_record(red).map(|u| u.coords()), Some(None));
    assert!(matches!(
        board.remove_unit(red),
        Err(BattleError::UnitNotFound(id)) if id == red
    ));
    assert!(matches!(
        board.move_unit(red, HexCoord::new(4, 4)),
        Err(BattleError::UnitNotFound(_))
    ));
}

#[test]
fn test_re_adding_an_id_replaces_the_record() {
    let mut board = empty_board();
    UnitBuilder::red(1).place(&mut board, 3, 3);
    UnitBuilder::blue(2).place(&mut board, 5, 5);
    UnitBuilder::red(1).factors(9, 9, 1).place(&mut board, 6, 6);

    assert_eq!(unit_ids(&board), vec![UnitId(1), UnitId(2)]);
    let unit = board.get_unit_by_id(UnitId(1)).unwrap();
    assert_eq!(unit.attack, 9);
    assert_eq!(unit.coords(), Some(HexCoord::new(6, 6)));
}

#[test]
fn test_returning_unit_moves_to_the_back() {
    let mut board = empty_board();
    UnitBuilder::red(1).place(&mut board, 3, 3);
    UnitBuilder::blue(2).place(&mut board, 5, 5);
    UnitBuilder::red(3).place(&mut board, 7, 7);
    board.remove_unit(UnitId(1)).unwrap();

    UnitBuilder::red(1).place(&mut board, 0, 0);
    assert_eq!(unit_ids(&board), vec![UnitId(2), UnitId(3), UnitId(1)]);
    assert_eq!(
        board.get_unit_by_id(UnitId(3)).unwrap().coords(),
        Some(HexCoord::new(7, 7))
    );
    assert_eq!(
        board.get_unit_by_id(UnitId(1)).unwrap().coords(),
        Some(HexCoord::new(0, 0))
    );
}

#[test]
fn test_placement_out_of_bounds_is_rejected() {
    let mut board = empty_board();
    assert_eq!(
        board.add_unit(red_unit(1), 10, 0),
        Err(BattleError::OutOfBounds { row: 10, column: 0 })
    );
    assert_eq!(board.unit_count(), 0);
}

#[test]
fn test_nearest_enemy_and_friend() {
    let mut board = empty_board();
    let red = UnitBuilder::red(1).place(&mut board, 5, 5);
    let friend = UnitBuilder::red(2).place(&mut board, 2, 5);
    let far = UnitBuilder::blue(3).place(&mut board, 9, 9);
    let near = UnitBuilder::blue(4).place(&mut board, 7, 5);

    let unit = board.get_unit_by_id(red).unwrap();
    assert_eq!(board.get_nearest_unit(unit, false).map(|u| u.id), Some(near));
    assert_eq!(board.get_nearest_unit(unit, true).map(|u| u.id), Some(friend));

    board.remove_unit(near).unwrap();
    let unit = board.get_unit_by_id(red).unwrap();
    assert_eq!(board.get_nearest_unit(unit, false).map(|u| u.id), Some(far));
}

#[test]
fn test_objectives_listed_by_hex() {
    let mut board = empty_board();
    board.add_objective(Objective::hold(HexCoord::new(1, 1), 2)).unwrap();
    board.add_objective(Objective::hold(HexCoord::new(0, 4), 1)).unwrap();

    let coords: Vec<HexCoord> = board.objectives().iter().map(|o| o.coord).collect();
    assert_eq!(coords, vec![HexCoord::new(0, 4), HexCoord::new(1, 1)]);
    assert!(board
        .add_objective(Objective::hold(HexCoord::new(-1, 0), 1))
        .is_err());
}
