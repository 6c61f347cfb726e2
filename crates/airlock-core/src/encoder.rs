//! Fountain encoder — the producer side of the fragment stream.
//!
//! Emits the first `seq_len` parts pure and in order, then mixed parts
//! for as long as the caller keeps asking. A message that fits in one
//! fragment is emitted as a single-part envelope instead.

use tracing::debug;

use crate::checksum::crc32;
use crate::fountain::{choose_fragments, nominal_fragment_length, partition, DEFAULT_MIN_FRAGMENT_LEN};
use crate::fragment::{encode_multi, encode_single, is_ur_type};
use crate::part::{xor_into, FountainPart};

#[derive(Debug, Clone)]
pub struct Encoder {
    ur_type: String,
    message: Vec<u8>,
    checksum: u32,
    fragment_len: usize,
    segments: Vec<Vec<u8>>,
    seq_num: u32,
}

impl Encoder {
    pub fn new(ur_type: &str, message: &[u8], max_fragment_len: usize) -> Result<Self, EncodeError> {
        Self::with_bounds(ur_type, message, DEFAULT_MIN_FRAGMENT_LEN, max_fragment_len)
    }

    /// Fragment length is chosen so segments are as equal as possible,
    /// no longer than `max_fragment_len` and, unless the message itself is
    /// shorter, no shorter than `min_fragment_len`.
    pub fn with_bounds(
        ur_type: &str,
        message: &[u8],
        min_fragment_len: usize,
        max_fragment_len: usize,
    ) -> Result<Self, EncodeError> {
        if !is_ur_type(ur_type) {
            return Err(EncodeError::InvalidType(ur_type.to_string()));
        }
        if message.is_empty() {
            return Err(EncodeError::EmptyMessage);
        }
        if max_fragment_len == 0 {
            return Err(EncodeError::InvalidFragmentLen(max_fragment_len));
        }

        let fragment_len = nominal_fragment_length(message.len(), min_fragment_len, max_fragment_len);
        let segments = partition(message, fragment_len);
        let checksum = crc32(message);

        debug!(
            ur_type,
            message_len = message.len(),
            fragment_len,
            seq_len = segments.len(),
            checksum = hex::encode(checksum.to_be_bytes()),
            "encoder ready"
        );

        Ok(Self {
            ur_type: ur_type.to_string(),
            message: message.to_vec(),
            checksum,
            fragment_len,
            segments,
            seq_num: 0,
        })
    }

    /// Next fragment in the stream. Never runs out, though the sequence
    /// number saturates at `u32::MAX` and that part repeats from there on.
    pub fn next_part(&mut self) -> String {
        self.seq_num = self.seq_num.saturating_add(1);
        if self.is_single_part() {
            return encode_single(&self.ur_type, &self.message);
        }
        encode_multi(&self.ur_type, &self.fountain_part(self.seq_num))
    }

    fn fountain_part(&self, seq_num: u32) -> FountainPart {
        let mut data = vec![0u8; self.fragment_len];
        for index in choose_fragments(seq_num, self.seq_len(), self.checksum).iter() {
            xor_into(&mut data, &self.segments[index]);
        }
        FountainPart {
            seq_num,
            seq_len: self.seq_len(),
            message_len: self.message.len(),
            checksum: self.checksum,
            data,
        }
    }

    pub fn ur_type(&self) -> &str {
        &self.ur_type
    }

    /// Sequence number of the last emitted part; 0 before the first.
    pub fn seq_num(&self) -> u32 {
        self.seq_num
    }

    pub fn seq_len(&self) -> usize {
        self.segments.len()
    }

    pub fn fragment_len(&self) -> usize {
        self.fragment_len
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    pub fn is_single_part(&self) -> bool {
        self.segments.len() == 1
    }

    /// Every pure part has been emitted at least once.
    pub fn is_complete(&self) -> bool {
        self.seq_num as usize >= self.seq_len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("invalid type tag: {0:?}")]
    InvalidType(String),

    #[error("invalid maximum fragment length: {0}")]
    InvalidFragmentLen(usize),
}
