//! Fenwick-tree weighted draw.
//!
//! Same per-step selection probabilities as the cumulative-table draw, but a
//! drawn record's weight is zeroed in place instead of rebuilding the table
//! on every step.

use rand::Rng;
use tracing::debug;

use super::normalized_total;
use crate::record::WeightedRecord;

/// Binary indexed tree over non-negative weights.
#[derive(Debug, Clone)]
pub struct FenwickTree {
    // 1-based; tree[0] unused.
    tree: Vec<f64>,
}

impl FenwickTree {
    /// Build in O(n) from the given weights.
    pub fn from_weights(weights: &[f64]) -> Self {
        let n = weights.len();
        let mut tree = vec![0.0; n + 1];
        tree[1..].copy_from_slice(weights);
        for i in 1..=n {
            let parent = i + lowest_bit(i);
            if parent <= n {
                tree[parent] += tree[i];
            }
        }
        Self { tree }
    }

    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add `delta` to the weight at `index` (0-based).
    pub fn add(&mut self, index: usize, delta: f64) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] += delta;
            i += lowest_bit(i);
        }
    }

    /// Sum of weights in `[0, end)`.
    pub fn prefix_sum(&self, end: usize) -> f64 {
        let mut i = end.min(self.len());
        let mut sum = 0.0;
        while i > 0 {
            sum += self.tree[i];
            i -= lowest_bit(i);
        }
        sum
    }

    pub fn total(&self) -> f64 {
        self.prefix_sum(self.len())
    }

    /// First index whose inclusive prefix sum is `>= target`, clamped to the
    /// last index. Mirrors a lower-bound search over the cumulative table.
    pub fn lower_bound(&self, target: f64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        let mut pos = 0;
        let mut remaining = target;
        let mut step = highest_power_of_two(n);
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] < remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        pos.min(n - 1)
    }
}

fn lowest_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

/// Weighted draw without replacement backed by a [`FenwickTree`].
///
/// Removing a weight that dominates the rest cancels the small weights
/// sharing its tree nodes, so the tree is rebuilt from the untaken weights
/// whenever the live total drops below half of its value at the last build.
pub fn fenwick_shuffle<T, R>(records: &[T], rng: &mut R) -> Vec<T>
where
    T: WeightedRecord + Clone,
    R: Rng,
{
    let mut weights: Vec<f64> = records.iter().map(WeightedRecord::tickets).collect();
    if let Some((divisor, _)) = normalized_total(weights.iter().copied()) {
        if divisor != 1.0 {
            debug!(divisor, "total weight overflows, rescaling pool");
            weights.iter_mut().for_each(|w| *w /= divisor);
        }
    }

    let mut tree = FenwickTree::from_weights(&weights);
    let mut live_total = tree.total();
    let mut rebuild_below = live_total / 2.0;
    let mut taken = vec![false; records.len()];
    let mut positive_left = weights.iter().filter(|w| **w > 0.0).count();
    let mut remaining = records.len();
    let mut drawn = Vec::with_capacity(records.len());

    while remaining > 0 {
        let index = if positive_left > 0 {
            let target = rng.gen::<f64>() * tree.total();
            nearest_untaken(&taken, tree.lower_bound(target))
        } else {
            debug!(remaining, "zero total weight, drawing uniformly");
            nth_untaken(&taken, rng.gen_range(0..remaining))
        };

        taken[index] = true;
        remaining -= 1;
        if weights[index] > 0.0 {
            positive_left -= 1;
            live_total -= weights[index];
            if positive_left > 0 && live_total < rebuild_below {
                tree = rebuild(&weights, &taken);
                live_total = tree.total();
                rebuild_below = live_total / 2.0;
            } else {
                tree.add(index, -weights[index]);
            }
        }
        drawn.push(records[index].clone());
    }

    drawn
}

fn rebuild(weights: &[f64], taken: &[bool]) -> FenwickTree {
    let untaken: Vec<f64> = weights
        .iter()
        .zip(taken)
        .map(|(&w, &t)| if t { 0.0 } else { w })
        .collect();
    FenwickTree::from_weights(&untaken)
}

/// Rounding in the tree can land the search on an already-drawn slot; step
/// back to the closest untaken one, then forward.
fn nearest_untaken(taken: &[bool], index: usize) -> usize {
    if !taken[index] {
        return index;
    }
    (0..index)
        .rev()
        .chain(index + 1..taken.len())
        .find(|&i| !taken[i])
        .unwrap_or(index)
}

fn nth_untaken(taken: &[bool], n: usize) -> usize {
    taken
        .iter()
        .enumerate()
        .filter(|(_, t)| !**t)
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(0)
}
