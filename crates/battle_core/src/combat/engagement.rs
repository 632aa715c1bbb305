//! Grouping engaged units into battles.

use crate::board::Board;
use crate::unit::{Seat, Unit, UnitId};

/// One battle: the attacking and defending units of a connected engagement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    /// Units of the active seat, in placement order.
    pub attackers: Vec<UnitId>,
    /// Opposing units, in placement order.
    pub defenders: Vec<UnitId>,
}

fn in_contact(a: &Unit, b: &Unit) -> bool {
    match (a.coords(), b.coords()) {
        (Some(x), Some(y)) => x == y || x.is_adjacent(y),
        _ => false,
    }
}

/// Find every battle the active seat is involved in.
///
/// A unit is engaged when it shares a hex with, or is adjacent to, an
/// unfriendly unit. Engaged units in contact with each other form one
/// battle, so a chain of adjacent units fights together. Components
/// without units on both sides are not battles.
#[must_use]
pub fn find_combat(board: &Board, attacker: &Seat) -> Vec<Battle> {
    let units: Vec<&Unit> = board.units().collect();
    let engaged: Vec<&Unit> = units
        .iter()
        .copied()
        .filter(|unit| {
            units
                .iter()
                .any(|other| !other.is_friendly(unit) && in_contact(unit, other))
        })
        .collect();

    let mut component_of: Vec<Option<usize>> = vec![None; engaged.len()];
    let mut battles = Vec::new();

    for root in 0..engaged.len() {
        if component_of[root].is_some() {
            continue;
        }
        let component = battles.len();
        component_of[root] = Some(component);

        let mut members = vec![root];
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for next in 0..engaged.len() {
                if component_of[next].is_none() && in_contact(engaged[current], engaged[next]) {
                    component_of[next] = Some(component);
                    members.push(next);
                    frontier.push(next);
                }
            }
        }
        members.sort_unstable();

        let (attackers, defenders): (Vec<&Unit>, Vec<&Unit>) = members
            .iter()
            .map(|&index| engaged[index])
            .partition(|unit| attacker.owns(unit));
        battles.push(Battle {
            attackers: attackers.iter().map(|unit| unit.id).collect(),
            defenders: defenders.iter().map(|unit| unit.id).collect(),
        });
    }

    battles.retain(|battle| !battle.attackers.is_empty() && !battle.defenders.is_empty());
    tracing::debug!(battles = battles.len(), seat = %attacker.id, "Found battles");
    battles
}
