//! Part descriptors — one fragment's decoded content.
//!
//! The bytewords body of a multipart fragment is a CBOR array:
//!
//!   [seq_num, seq_len, message_len, checksum, data]
//!
//! `FountainPart` is that array field for field. `Part` is what the reducer
//! works with: the set of segment indexes whose XOR equals `data`, derived
//! from the sequence number by the chooser. `MessageHeader` is the identity
//! every part repeats so any one of them can establish a session.

use std::collections::BTreeSet;
use std::fmt;

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::fountain::choose_fragments;

// ── Message Header ────────────────────────────────────────────────────────────

/// Message-level metadata carried redundantly in every part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Number of original segments (N).
    pub segment_count: usize,
    /// Byte length of the final payload, before segment padding.
    pub total_length: usize,
    /// CRC-32 of the final payload.
    pub checksum: u32,
    /// Byte length of every part's data.
    pub fragment_len: usize,
}

// ── Index Set ─────────────────────────────────────────────────────────────────

/// The segment indexes a part XORs together. Ordered so that equal sets
/// compare and hash equal regardless of how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexSet(BTreeSet<usize>);

impl IndexSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn single(index: usize) -> Self {
        Self(BTreeSet::from([index]))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.0.remove(&index)
    }

    /// The member of a degree-1 set.
    pub fn only(&self) -> Option<usize> {
        if self.0.len() == 1 {
            self.0.first().copied()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for IndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}

// ── Part ──────────────────────────────────────────────────────────────────────

/// One part as the reducer sees it.
///
/// Degree 1 is a pure part: `data` is a segment value. Degree > 1 is a
/// mixed part: `data` is the XOR of the segments at `indexes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub sequence_number: u32,
    pub indexes: IndexSet,
    pub data: Vec<u8>,
}

impl Part {
    pub fn degree(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_pure(&self) -> bool {
        self.indexes.len() == 1
    }

    /// Remove a known segment from this part: drop `index` from the set and
    /// XOR the segment's bytes out of `data`. No-op if `index` is absent.
    pub fn peel(&mut self, index: usize, segment: &[u8]) -> bool {
        if !self.indexes.remove(index) {
            return false;
        }
        xor_into(&mut self.data, segment);
        true
    }
}

/// `dst ^= src`, byte by byte over the shorter of the two.
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

// ── Fountain Part (wire form) ─────────────────────────────────────────────────

/// The CBOR body of a multipart fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FountainPart {
    pub seq_num: u32,
    pub seq_len: usize,
    pub message_len: usize,
    pub checksum: u32,
    pub data: Vec<u8>,
}

impl FountainPart {
    /// Decode and validate the 5-element CBOR array.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, PartError> {
        let value: Value =
            ciborium::de::from_reader(bytes).map_err(|e| PartError::Cbor(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            _ => return Err(PartError::NotAnArray),
        };
        if items.len() != 5 {
            return Err(PartError::Arity(items.len()));
        }

        let mut items = items.into_iter();
        let mut next = || items.next().unwrap_or(Value::Null);

        let seq_num = uint(next(), "seq_num")?;
        let seq_len = uint(next(), "seq_len")?;
        let message_len = uint(next(), "message_len")?;
        let checksum = uint(next(), "checksum")?;
        let data = match next() {
            Value::Bytes(data) => data,
            _ => return Err(PartError::WrongType("data")),
        };

        let part = Self {
            seq_num: u32::try_from(seq_num).map_err(|_| PartError::OutOfRange("seq_num"))?,
            seq_len: usize::try_from(seq_len).map_err(|_| PartError::OutOfRange("seq_len"))?,
            message_len: usize::try_from(message_len)
                .map_err(|_| PartError::OutOfRange("message_len"))?,
            checksum: u32::try_from(checksum).map_err(|_| PartError::OutOfRange("checksum"))?,
            data,
        };
        part.validate()?;
        Ok(part)
    }

    /// Encode as the 5-element CBOR array, minimal integer heads.
    pub fn to_cbor(&self) -> Vec<u8> {
        let value = Value::Array(vec![
            Value::Integer(self.seq_num.into()),
            Value::Integer((self.seq_len as u64).into()),
            Value::Integer((self.message_len as u64).into()),
            Value::Integer(self.checksum.into()),
            Value::Bytes(self.data.clone()),
        ]);
        let mut out = Vec::with_capacity(self.data.len() + 24);
        // Writing into a Vec is infallible and the value holds no floats
        // or maps, so the serializer has nothing to reject.
        ciborium::ser::into_writer(&value, &mut out).expect("CBOR encoding into a Vec failed");
        out
    }

    fn validate(&self) -> Result<(), PartError> {
        if self.seq_num == 0 {
            return Err(PartError::Invalid("seq_num must be at least 1"));
        }
        if self.seq_len == 0 {
            return Err(PartError::Invalid("seq_len must be at least 1"));
        }
        if self.message_len == 0 {
            return Err(PartError::Invalid("message_len must be at least 1"));
        }
        if self.data.is_empty() {
            return Err(PartError::Invalid("data must not be empty"));
        }
        let capacity = self.data.len().checked_mul(self.seq_len);
        if capacity.map_or(false, |c| c < self.message_len) {
            return Err(PartError::Invalid("segments cannot hold message_len bytes"));
        }
        Ok(())
    }

    pub fn header(&self) -> MessageHeader {
        MessageHeader {
            segment_count: self.seq_len,
            total_length: self.message_len,
            checksum: self.checksum,
            fragment_len: self.data.len(),
        }
    }

    /// Segment indexes mixed into this part.
    pub fn indexes(&self) -> IndexSet {
        choose_fragments(self.seq_num, self.seq_len, self.checksum)
    }

    pub fn into_part(self) -> (MessageHeader, Part) {
        let header = self.header();
        let indexes = self.indexes();
        let part = Part {
            sequence_number: self.seq_num,
            indexes,
            data: self.data,
        };
        (header, part)
    }
}

fn uint(value: Value, field: &'static str) -> Result<u64, PartError> {
    match value {
        Value::Integer(i) => u64::try_from(i).map_err(|_| PartError::OutOfRange(field)),
        _ => Err(PartError::WrongType(field)),
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartError {
    #[error("invalid CBOR: {0}")]
    Cbor(String),

    #[error("part is not a CBOR array")]
    NotAnArray,

    #[error("part array has {0} items, expected 5")]
    Arity(usize),

    #[error("part field {0} has the wrong CBOR type")]
    WrongType(&'static str),

    #[error("part field {0} is out of range")]
    OutOfRange(&'static str),

    #[error("invalid part: {0}")]
    Invalid(&'static str),
}
