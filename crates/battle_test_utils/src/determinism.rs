//! Determinism testing utilities.
//!
//! The same scenario, seed and player scripts must always produce the same
//! board and the same combat reports. Things that could break this:
//!
//! - **HashMap iteration order**: unit iteration follows placement order
//!   and search results are sorted, so the randomized hasher never leaks.
//! - **Dice**: every roll comes from an injected, seeded [`DieRoller`].
//! - **Floating-point math**: retreat directions use fixed-point arithmetic
//!   via [`battle_core::math::Fixed`].

use std::collections::BTreeSet;
use std::thread;

use battle_core::prelude::*;

/// What one replay of a combat scenario produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDigest {
    /// Board hash after the last phase.
    pub board_hash: u64,
    /// Every battle of every phase, in resolution order.
    pub records: Vec<CombatResultRecord>,
}

/// Digests of repeated replays of one scenario.
#[derive(Debug, Clone, Default)]
pub struct DeterminismReport {
    /// One digest per run, in run order.
    pub runs: Vec<RunDigest>,
}

impl DeterminismReport {
    /// Whether every run matched the first.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.runs.windows(2).all(|pair| pair[0] == pair[1])
    }

    /// Distinct final board hashes across runs.
    #[must_use]
    pub fn distinct_hashes(&self) -> BTreeSet<u64> {
        self.runs.iter().map(|run| run.board_hash).collect()
    }

    /// Panic with the first diverging run if the replays disagree.
    ///
    /// # Panics
    ///
    /// Panics if any run differs from the first.
    pub fn assert_deterministic(&self) {
        let Some(first) = self.runs.first() else {
            return;
        };
        if let Some((index, run)) = self.runs.iter().enumerate().find(|(_, run)| *run != first) {
            panic!(
                "Combat is non-deterministic: run {index} diverged from run 0\n\
                 run 0: hash {:#x}, {} battles\n\
                 run {index}: hash {:#x}, {} battles\n\
                 distinct hashes: {:?}",
                first.board_hash,
                first.records.len(),
                run.board_hash,
                run.records.len(),
                self.distinct_hashes()
            );
        }
    }
}

/// Replay `phases` combat phases for `attacker` on a fresh board from
/// `setup_fn`, `runs` times, each run with its own die seeded with `seed`.
///
/// # Panics
///
/// Panics if a combat phase fails.
pub fn replay_combat<F>(setup_fn: F, attacker: &Seat, seed: u64, phases: u32, runs: usize) -> DeterminismReport
where
    F: Fn() -> Board,
{
    let runs = (0..runs)
        .map(|_| {
            let mut board = setup_fn();
            let mut resolver = CombatResolver::new(Box::new(SeededDie::new(seed)));
            let mut records = Vec::new();
            for _ in 0..phases {
                let results = resolver
                    .resolve_combat(&mut board, attacker)
                    .expect("combat phase failed");
                records.extend(results.to_records());
            }
            RunDigest {
                board_hash: board.state_hash(),
                records,
            }
        })
        .collect();
    DeterminismReport { runs }
}

/// Replay a combat scenario twice and report whether both runs agree.
///
/// Phases that find no battles leave the board unchanged.
///
/// # Panics
///
/// Panics if a combat phase fails.
pub fn verify_combat_determinism<F>(setup_fn: F, attacker: &Seat, seed: u64, phases: u32) -> bool
where
    F: Fn() -> Board,
{
    replay_combat(setup_fn, attacker, seed, phases, 2).is_deterministic()
}

/// Play full games on separate threads and collect the final board hashes.
///
/// Each thread builds its own game with `setup_fn` and calls
/// [`Game::play`], which catches state leaking between games.
///
/// # Panics
///
/// Panics if a game fails or a thread panics.
#[must_use]
pub fn run_parallel_games<F>(setup_fn: F, num_games: usize) -> Vec<u64>
where
    F: Fn() -> Game + Send + Sync,
{
    let setup = &setup_fn;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..num_games)
            .map(|_| {
                scope.spawn(move || {
                    let mut game = setup();
                    game.play().expect("game failed");
                    game.board().state_hash()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("game thread panicked"))
            .collect()
    })
}
