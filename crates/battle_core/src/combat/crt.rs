//! Odds computation, the combat results table, and dice.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::result::CombatResult;
use crate::error::{BattleError, Result};

/// Attacker:defender odds, reduced to one of the canonical ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Odds {
    /// Attacker side of the ratio.
    pub attacker: u32,
    /// Defender side of the ratio.
    pub defender: u32,
}

impl Odds {
    /// Create odds from a ratio.
    #[must_use]
    pub const fn new(attacker: u32, defender: u32) -> Self {
        Self { attacker, defender }
    }

    /// Position of these odds in [`CANONICAL_ODDS`], if canonical.
    #[must_use]
    pub fn table_index(self) -> Option<usize> {
        CANONICAL_ODDS.iter().position(|&odds| odds == self)
    }

    /// The ratio as a float, attacker over defender.
    fn as_f64(self) -> f64 {
        f64::from(self.attacker) / f64::from(self.defender)
    }

    /// Whether the odds are too lopsided to need a die roll.
    #[must_use]
    pub fn is_automatic(self) -> bool {
        self == WORST_ODDS || self == BEST_ODDS
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.attacker, self.defender)
    }
}

/// The 13 ratios the table is indexed by, from worst to best for the attacker.
pub const CANONICAL_ODDS: [Odds; 13] = [
    Odds::new(1, 7),
    Odds::new(1, 6),
    Odds::new(1, 5),
    Odds::new(1, 4),
    Odds::new(1, 3),
    Odds::new(1, 2),
    Odds::new(1, 1),
    Odds::new(2, 1),
    Odds::new(3, 1),
    Odds::new(4, 1),
    Odds::new(5, 1),
    Odds::new(6, 1),
    Odds::new(7, 1),
];

/// Odds at which the attacker is eliminated without a roll.
pub const WORST_ODDS: Odds = Odds::new(1, 7);

/// Odds at which the defender is eliminated without a roll.
pub const BEST_ODDS: Odds = Odds::new(7, 1);

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Snap an attack/defense factor pair to the nearest canonical odds.
///
/// The ratio is reduced by its GCD and the first canonical ratio with the
/// smallest absolute `f64` difference wins. Ties are decided by how the
/// float quotients round, so 5 vs 12 lands on 1:2 but 6 vs 4 on 1:1.
/// A zero defense snaps to the best odds, a zero attack to the worst.
#[must_use]
pub fn get_odds(attack_factor: u32, defense_factor: u32) -> Odds {
    if defense_factor == 0 {
        return if attack_factor == 0 { Odds::new(1, 1) } else { BEST_ODDS };
    }
    if attack_factor == 0 {
        return WORST_ODDS;
    }

    let divisor = gcd(attack_factor, defense_factor);
    let ratio = f64::from(attack_factor / divisor) / f64::from(defense_factor / divisor);

    let mut best = CANONICAL_ODDS[0];
    let mut best_gap = (ratio - best.as_f64()).abs();
    for &candidate in &CANONICAL_ODDS[1..] {
        let gap = (ratio - candidate.as_f64()).abs();
        if gap < best_gap {
            best = candidate;
            best_gap = gap;
        }
    }
    best
}

const AE: CombatResult = CombatResult::AttackerEliminated;
const AR: CombatResult = CombatResult::AttackerRetreat2;
const DE: CombatResult = CombatResult::DefenderEliminated;
const DR: CombatResult = CombatResult::DefenderRetreat2;
const EX: CombatResult = CombatResult::Exchange;

/// Outcome by odds row and die face (1..=6).
///
/// The first and last rows are never rolled on; they auto-resolve.
pub const COMBAT_RESULTS_TABLE: [[CombatResult; 6]; 13] = [
    [AE, AE, AE, AE, AE, AE], // 1:7
    [AE, AE, AR, AE, AE, AE], // 1:6
    [AE, AE, AR, AR, AE, AE], // 1:5
    [AR, AE, AR, AR, AE, AE], // 1:4
    [AR, AR, AR, AR, AE, AE], // 1:3
    [DR, EX, AR, AR, AE, AE], // 1:2
    [DE, EX, AR, AR, AE, AE], // 1:1
    [DE, EX, DR, AR, EX, AE], // 2:1
    [DE, EX, DR, DR, EX, DE], // 3:1
    [DE, EX, DE, DR, DR, DE], // 4:1
    [DE, DR, DE, DR, DE, DE], // 5:1
    [DE, DR, DE, DE, DE, DE], // 6:1
    [DE, DE, DE, DE, DE, DE], // 7:1
];

/// Look up the outcome for canonical odds and a die face.
///
/// # Errors
///
/// Returns [`BattleError::InvalidDieRoll`] for faces outside 1..=6 and
/// [`BattleError::InvalidState`] for non-canonical odds.
pub fn lookup(odds: Odds, die_roll: u8) -> Result<CombatResult> {
    let row = odds
        .table_index()
        .ok_or_else(|| BattleError::InvalidState(format!("Odds {odds} are not on the table")))?;
    let column = checked_face(die_roll)? as usize - 1;
    Ok(COMBAT_RESULTS_TABLE[row][column])
}

fn checked_face(face: u8) -> Result<u8> {
    if (1..=6).contains(&face) {
        Ok(face)
    } else {
        Err(BattleError::InvalidDieRoll(i32::from(face)))
    }
}

/// Source of six-sided die rolls for combat.
pub trait DieRoller: fmt::Debug {
    /// Roll one die, returning a face in 1..=6.
    fn roll(&mut self) -> u8;
}

/// Seeded pseudo-random die.
#[derive(Debug, Clone)]
pub struct SeededDie {
    rng: ChaCha8Rng,
}

impl SeededDie {
    /// Create a die from a seed. The same seed always rolls the same sequence.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DieRoller for SeededDie {
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// A die that always shows the same face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDie(u8);

impl FixedDie {
    /// Create a fixed die.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidDieRoll`] if `face` is not in 1..=6.
    pub fn new(face: u8) -> Result<Self> {
        checked_face(face).map(Self)
    }
}

impl DieRoller for FixedDie {
    fn roll(&mut self) -> u8 {
        self.0
    }
}
