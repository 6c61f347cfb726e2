//! Xoshiro256** — the generator behind the fountain index chooser.
//!
//! Producers and consumers must draw exactly the same sequence for a given
//! seed, so every step here is fixed bit-for-bit: the state words are read
//! big-endian from a SHA-256 digest, and doubles are `next() / 2^64`.

use crate::checksum::sha256;

#[derive(Debug, Clone)]
pub struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    /// Seed from arbitrary bytes by hashing them with SHA-256.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self::from_digest(&sha256(seed))
    }

    /// Seed directly from a 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut s = [0u64; 4];
        for (word, bytes) in s.iter_mut().zip(digest.chunks_exact(8)) {
            let mut be = [0u8; 8];
            be.copy_from_slice(bytes);
            *word = u64::from_be_bytes(be);
        }
        Self { s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = self.s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform double in `[0, 1)`.
    pub fn next_double(&mut self) -> f64 {
        self.next_u64() as f64 / (u64::MAX as f64 + 1.0)
    }

    /// Uniform integer in `[low, high]`, inclusive on both ends.
    pub fn next_int(&mut self, low: u64, high: u64) -> u64 {
        (self.next_double() * (high - low + 1) as f64) as u64 + low
    }

    pub fn next_byte(&mut self) -> u8 {
        self.next_int(0, 255) as u8
    }

    pub fn next_data(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.next_byte()).collect()
    }

    /// Shuffle by repeatedly removing the item at a random position of the
    /// shrinking input.
    pub fn shuffled<T>(&mut self, items: Vec<T>) -> Vec<T> {
        let count = items.len();
        self.shuffled_prefix(items, count)
    }

    /// The first `count` items `shuffled` would return, drawing only as many
    /// values as those items need.
    pub fn shuffled_prefix<T>(&mut self, mut items: Vec<T>, count: usize) -> Vec<T> {
        let count = count.min(items.len());
        let mut out = Vec::with_capacity(count);
        while out.len() < count {
            let index = self.next_int(0, (items.len() - 1) as u64) as usize;
            out.push(items.remove(index));
        }
        out
    }
}
