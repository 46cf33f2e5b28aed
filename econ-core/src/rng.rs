//! The single random source behind every stochastic decision.
//!
//! One `SimRng` is owned by the economy and handed down as `&mut` to each
//! agent procedure that needs it. Agents never hold their own generator, so a
//! seed plus a config reproduces the same trajectory run after run.

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

/// Simulation-level RNG shared by the scheduler and all agents.
#[derive(Debug, Clone)]
pub struct SimRng(StdRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(StdRng::seed_from_u64(seed))
    }

    /// Uniform draw in [0, 1).
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    /// `true` with probability `p`. Values above 1 always pass, values at or
    /// below 0 never do.
    #[inline]
    pub fn with_probability(&mut self, p: f64) -> bool {
        if p >= 1.0 {
            return true;
        }
        if p <= 0.0 {
            return false;
        }
        self.unit() < p
    }

    /// Uniform fraction in [0, max].
    #[inline]
    pub fn fraction(&mut self, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        self.0.random_range(0.0..=max)
    }

    /// Uniform index in [0, len). `None` when `len == 0`.
    #[inline]
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.0.random_range(0..len))
        }
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice. `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// Pick `amount` distinct elements (or all of them, if fewer exist).
    pub fn sample<T: Copy>(&mut self, slice: &[T], amount: usize) -> Vec<T> {
        let amount = amount.min(slice.len());
        rand::seq::index::sample(&mut self.0, slice.len(), amount)
            .into_iter()
            .map(|i| slice[i])
            .collect()
    }

    /// Pick an element with probability proportional to its weight.
    ///
    /// Walks the cumulative weight sum explicitly. Non-positive weights never
    /// win; if every weight is non-positive the pick is `None`.
    pub fn weighted_pick<'a, T>(&mut self, entries: &'a [(T, f64)]) -> Option<&'a T> {
        let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }
        let target = self.unit() * total;
        let mut cumulative = 0.0;
        let mut last_positive = None;
        for (item, weight) in entries {
            if *weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = Some(item);
            if target < cumulative {
                return Some(item);
            }
        }
        // Float drift can leave target == total
        last_positive
    }
}
