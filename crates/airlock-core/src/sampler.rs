//! Weighted sampling by Vose's alias method.
//!
//! The table construction walks indices from the highest down, which is the
//! order every interoperating producer uses. Changing it changes which
//! degree a given sequence number maps to.

use crate::xoshiro::Xoshiro256;

#[derive(Debug, Clone)]
pub struct AliasSampler {
    probs: Vec<f64>,
    aliases: Vec<usize>,
}

impl AliasSampler {
    /// Build a sampler over non-negative weights. Returns `None` if the
    /// weights are empty, negative, or sum to zero.
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() || weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return None;
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return None;
        }

        let n = weights.len();
        let mut p: Vec<f64> = weights.iter().map(|w| w * n as f64 / sum).collect();
        let mut small = Vec::with_capacity(n);
        let mut large = Vec::with_capacity(n);
        for i in (0..n).rev() {
            if p[i] < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        let mut probs = vec![0.0; n];
        let mut aliases = vec![0usize; n];
        while let (Some(a), Some(g)) = (small.last().copied(), large.last().copied()) {
            small.pop();
            large.pop();
            probs[a] = p[a];
            aliases[a] = g;
            p[g] += p[a] - 1.0;
            if p[g] < 1.0 {
                small.push(g);
            } else {
                large.push(g);
            }
        }
        // Leftovers on either list only happen through rounding.
        for i in large.into_iter().chain(small) {
            probs[i] = 1.0;
        }

        Some(Self { probs, aliases })
    }

    pub fn next(&self, rng: &mut Xoshiro256) -> usize {
        let r1 = rng.next_double();
        let r2 = rng.next_double();
        let i = (self.probs.len() as f64 * r1) as usize;
        if r2 < self.probs[i] {
            i
        } else {
            self.aliases[i]
        }
    }
}
