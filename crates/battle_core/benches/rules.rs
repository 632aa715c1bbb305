//! Rules engine benchmarks for battle_core.
//!
//! Run with: `cargo bench -p battle_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use battle_core::prelude::*;
use battle_test_utils::fixtures::{red_seat, UnitBuilder};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

/// A 20x20 board with two facing lines of units.
fn front_line() -> Board {
    let mut board = Board::new(20, 20);
    for row in 0..20 {
        UnitBuilder::red(row as u32 * 2 + 1).place(&mut board, row, 9);
        UnitBuilder::blue(row as u32 * 2 + 2).place(&mut board, row, 10);
    }
    board
}

/// Reachability and path search on an open board.
pub fn movement_benchmark(c: &mut Criterion) {
    let mut board = Board::new(20, 20);
    let id = UnitBuilder::red(1).factors(4, 4, 8).place(&mut board, 10, 10);
    let unit = board.get_unit_by_id(id).cloned().unwrap();
    let start = HexCoord::new(10, 10);

    c.bench_function("reachable_hexes_8mp", |b| {
        b.iter(|| black_box(board.get_reachable_hexes(&unit, start, black_box(8))))
    });
    c.bench_function("shortest_path_8mp", |b| {
        b.iter(|| black_box(board.shortest_path(&unit, start, black_box(HexCoord::new(3, 14)))))
    });
}

/// A full combat phase along a 20 hex front.
pub fn combat_benchmark(c: &mut Criterion) {
    let seat = red_seat(PlayerKind::Cpu);
    c.bench_function("resolve_front_line", |b| {
        b.iter_batched(
            front_line,
            |mut board| {
                let mut resolver = CombatResolver::new(Box::new(SeededDie::new(42)));
                black_box(resolver.resolve_combat(&mut board, &seat).unwrap())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, movement_benchmark, combat_benchmark);
criterion_main!(benches);
