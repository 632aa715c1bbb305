//! Combat outcomes and their export form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::crt::Odds;
use crate::error::{BattleError, Result};
use crate::unit::UnitId;

/// Die value written to export records when no die was rolled.
pub const NO_DIE_ROLL: i32 = -1;

/// The five outcomes on the combat results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatResult {
    /// Every attacking unit is removed.
    AttackerEliminated,
    /// Attacking units fall back two hexes.
    AttackerRetreat2,
    /// Every defending unit is removed.
    DefenderEliminated,
    /// Defending units fall back two hexes.
    DefenderRetreat2,
    /// Defenders are removed along with enough attackers to match them.
    Exchange,
}

impl CombatResult {
    /// All outcomes, in table order.
    pub const ALL: [CombatResult; 5] = [
        Self::AttackerEliminated,
        Self::AttackerRetreat2,
        Self::DefenderEliminated,
        Self::DefenderRetreat2,
        Self::Exchange,
    ];

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::AttackerEliminated => "ATTACKER_ELIMINATED",
            Self::AttackerRetreat2 => "ATTACKER_RETREAT_2",
            Self::DefenderEliminated => "DEFENDER_ELIMINATED",
            Self::DefenderRetreat2 => "DEFENDER_RETREAT_2",
            Self::Exchange => "EXCHANGE",
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::AttackerEliminated => "Attacker Eliminated",
            Self::AttackerRetreat2 => "Attacker Retreat 2 Hexes",
            Self::DefenderEliminated => "Defender Eliminated",
            Self::DefenderRetreat2 => "Defender Retreat 2 Hexes",
            Self::Exchange => "Exchange",
        }
    }
}

impl fmt::Display for CombatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl FromStr for CombatResult {
    type Err = BattleError;

    fn from_str(code: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|result| result.code() == code)
            .ok_or_else(|| BattleError::UnknownCombatResult(code.to_string()))
    }
}

/// Outcome of one battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatResultData {
    odds: Odds,
    die_roll: Option<u8>,
    combat_result: CombatResult,
    attackers: Vec<UnitId>,
    defenders: Vec<UnitId>,
    no_retreat: Vec<UnitId>,
}

impl CombatResultData {
    /// Create a result with no participants recorded.
    #[must_use]
    pub const fn new(odds: Odds, die_roll: Option<u8>, combat_result: CombatResult) -> Self {
        Self {
            odds,
            die_roll,
            combat_result,
            attackers: Vec::new(),
            defenders: Vec::new(),
            no_retreat: Vec::new(),
        }
    }

    /// Builder method to record the battle participants.
    #[must_use]
    pub fn with_participants(mut self, attackers: Vec<UnitId>, defenders: Vec<UnitId>) -> Self {
        self.attackers = attackers;
        self.defenders = defenders;
        self
    }

    /// Builder method to record the units that could not retreat.
    #[must_use]
    pub fn with_no_retreat(mut self, no_retreat: Vec<UnitId>) -> Self {
        self.no_retreat = no_retreat;
        self
    }

    /// Odds the battle was fought at.
    #[must_use]
    pub const fn odds(&self) -> Odds {
        self.odds
    }

    /// Die face rolled, or `None` for automatic results.
    #[must_use]
    pub const fn die_roll(&self) -> Option<u8> {
        self.die_roll
    }

    /// Final outcome of the battle.
    #[must_use]
    pub const fn combat_result(&self) -> CombatResult {
        self.combat_result
    }

    /// Attacking and defending unit ids.
    #[must_use]
    pub fn participants(&self) -> (&[UnitId], &[UnitId]) {
        (&self.attackers, &self.defenders)
    }

    /// Attacking unit ids.
    #[must_use]
    pub fn attackers(&self) -> &[UnitId] {
        &self.attackers
    }

    /// Defending unit ids.
    #[must_use]
    pub fn defenders(&self) -> &[UnitId] {
        &self.defenders
    }

    /// Units eliminated because their retreat was blocked or ran off the board.
    #[must_use]
    pub fn no_retreat_units(&self) -> &[UnitId] {
        &self.no_retreat
    }

    /// Flatten into an export record.
    #[must_use]
    pub fn to_record(&self) -> CombatResultRecord {
        CombatResultRecord::from(self)
    }
}

/// Flat, serializable form of a [`CombatResultData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResultRecord {
    /// Outcome code, e.g. `"EXCHANGE"`.
    pub result_code: String,
    /// Outcome description, e.g. `"Exchange"`.
    pub result_text: String,
    /// Attacker side of the odds.
    pub odds_numerator: u32,
    /// Defender side of the odds.
    pub odds_denominator: u32,
    /// Die face, or [`NO_DIE_ROLL`].
    pub die_roll: i32,
    /// Units eliminated for lack of a retreat path.
    pub no_retreat_unit_ids: Vec<UnitId>,
}

impl From<&CombatResultData> for CombatResultRecord {
    fn from(data: &CombatResultData) -> Self {
        Self {
            result_code: data.combat_result.code().to_string(),
            result_text: data.combat_result.text().to_string(),
            odds_numerator: data.odds.attacker,
            odds_denominator: data.odds.defender,
            die_roll: data.die_roll.map_or(NO_DIE_ROLL, i32::from),
            no_retreat_unit_ids: data.no_retreat.clone(),
        }
    }
}

impl TryFrom<&CombatResultRecord> for CombatResultData {
    type Error = BattleError;

    /// Rebuild odds, roll, outcome and no-retreat units from a record.
    ///
    /// Participants are not part of the record and come back empty.
    fn try_from(record: &CombatResultRecord) -> Result<Self> {
        let combat_result: CombatResult = record.result_code.parse()?;
        let odds = Odds::new(record.odds_numerator, record.odds_denominator);
        if odds.table_index().is_none() {
            return Err(BattleError::InvalidState(format!(
                "Odds {odds} are not on the table"
            )));
        }
        let die_roll = match record.die_roll {
            NO_DIE_ROLL => None,
            face @ 1..=6 => Some(face as u8),
            other => return Err(BattleError::InvalidDieRoll(other)),
        };
        Ok(Self::new(odds, die_roll, combat_result)
            .with_no_retreat(record.no_retreat_unit_ids.clone()))
    }
}

/// All battles of one combat phase, in resolution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatResults {
    battles: Vec<CombatResultData>,
}

impl CombatResults {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            battles: Vec::new(),
        }
    }

    /// Append a battle.
    pub fn add_battle(&mut self, battle: CombatResultData) {
        self.battles.push(battle);
    }

    /// Battles in resolution order.
    #[must_use]
    pub fn battles(&self) -> &[CombatResultData] {
        &self.battles
    }

    /// Number of battles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.battles.len()
    }

    /// Whether no battle was fought.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Export every battle.
    #[must_use]
    pub fn to_records(&self) -> Vec<CombatResultRecord> {
        self.battles.iter().map(CombatResultData::to_record).collect()
    }
}

impl fmt::Display for CombatResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Battles", self.battles.len())?;
        for battle in &self.battles {
            write!(f, "Result: {}, Odds: {}, Roll: ", battle.combat_result, battle.odds)?;
            match battle.die_roll {
                Some(face) => writeln!(f, "{face}")?,
                None => writeln!(f, "-")?,
            }
        }
        Ok(())
    }
}
