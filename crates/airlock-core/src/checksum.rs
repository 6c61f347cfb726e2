//! Integrity primitives for airlock.
//!
//! Provides two things:
//!   1. CRC-32 (ISO-HDLC, the zlib polynomial) — the fragment-local check
//!      appended to every bytewords body, and the message checksum verified
//!      once a message is fully assembled
//!   2. SHA-256 — seeds the deterministic index chooser
//!
//! There is no unsafe code in this module.

use sha2::{Digest, Sha256};

// ── CRC-32 ────────────────────────────────────────────────────────────────────

/// CRC-32 of a byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC-32 as four big-endian bytes, the form appended to bytewords bodies.
pub fn crc32_bytes(data: &[u8]) -> [u8; 4] {
    crc32(data).to_be_bytes()
}

/// Incremental CRC-32 for payloads that arrive in pieces.
///
/// # Example
/// ```
/// use airlock_core::checksum::{crc32, Crc32};
/// let mut h = Crc32::new();
/// h.update(b"hello ");
/// h.update(b"world");
/// assert_eq!(h.finalize(), crc32(b"hello world"));
/// ```
pub struct Crc32(crc32fast::Hasher);

impl Crc32 {
    pub fn new() -> Self {
        Self(crc32fast::Hasher::new())
    }

    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    pub fn finalize(self) -> u32 {
        self.0.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

// ── SHA-256 ───────────────────────────────────────────────────────────────────

/// SHA-256 digest of a byte slice.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
