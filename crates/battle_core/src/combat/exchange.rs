//! Attacker losses in an exchange.

/// Indices of the cheapest group of attackers whose attack factors cover `required`.
///
/// Groups are tried from the fewest units up. Within a size the group with
/// the smallest attack total wins, and among equal totals the first one in
/// lexicographic index order. Returns `None` when even the whole side falls
/// short.
#[must_use]
pub fn minimal_losses(attacks: &[u32], required: u32) -> Option<Vec<usize>> {
    if required == 0 {
        return Some(Vec::new());
    }
    for size in 1..=attacks.len() {
        let mut best: Option<(u32, Vec<usize>)> = None;
        for group in Combinations::new(attacks.len(), size) {
            let total: u32 = group.iter().map(|&index| attacks[index]).sum();
            if total < required {
                continue;
            }
            if best.as_ref().map_or(true, |(best_total, _)| total < *best_total) {
                best = Some((total, group));
            }
        }
        if let Some((_, group)) = best {
            return Some(group);
        }
    }
    None
}

/// Index combinations of `size` out of `n`, in lexicographic order.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(n: usize, size: usize) -> Self {
        Self {
            n,
            indices: (0..size).collect(),
            done: size > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let size = self.indices.len();
        // Rightmost index that can still be advanced.
        match (0..size).rev().find(|&i| self.indices[i] < self.n - size + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..size {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}
