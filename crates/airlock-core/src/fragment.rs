//! Fragment parser — the textual envelope around each part.
//!
//!   ur:<type>/<seq>-<count>/<payload>   multipart
//!   ur:<type>/<payload>                 single part
//!
//! The payload is minimal bytewords. For a multipart fragment it decodes to
//! a CBOR `FountainPart`; for a single part it is the message itself. The
//! envelope is case-insensitive, since QR alphanumeric mode upper-cases
//! everything.
//!
//! Parsing has no side effects. A fragment that fails any check here never
//! reaches the session guard or the reducer.

use crate::bytewords::{self, BytewordsError, Style};
use crate::checksum::crc32;
use crate::part::{FountainPart, IndexSet, MessageHeader, Part, PartError};

/// URI scheme every fragment must carry.
pub const SCHEME: &str = "ur";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentBody {
    /// Whole message in one fragment; implicitly sequence 1 of 1.
    Single(Vec<u8>),
    /// One fountain part of a multipart message.
    Multi(FountainPart),
}

/// A parsed, integrity-checked fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Lower-cased type tag, e.g. `crypto-psbt`.
    pub ur_type: String,
    pub body: FragmentBody,
}

impl Fragment {
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let text = text.trim().to_ascii_lowercase();

        let path = text
            .strip_prefix(SCHEME)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or(EnvelopeError::InvalidScheme)?;

        let components: Vec<&str> = path.split('/').collect();
        if components.len() < 2 {
            return Err(EnvelopeError::InvalidPathLength(components.len()));
        }

        let ur_type = components[0];
        if !is_ur_type(ur_type) {
            return Err(EnvelopeError::InvalidType(ur_type.to_string()));
        }

        let body = match components[1..] {
            [payload] => FragmentBody::Single(bytewords::decode(Style::Minimal, payload)?),
            [sequence, payload] => {
                let (seq_num, seq_len) = parse_sequence(sequence)?;
                let cbor = bytewords::decode(Style::Minimal, payload)?;
                let part = FountainPart::from_cbor(&cbor)?;
                if part.seq_num != seq_num || part.seq_len != seq_len {
                    return Err(EnvelopeError::SequenceMismatch {
                        envelope: format!("{seq_num}-{seq_len}"),
                        body: format!("{}-{}", part.seq_num, part.seq_len),
                    });
                }
                FragmentBody::Multi(part)
            }
            _ => return Err(EnvelopeError::InvalidPathLength(components.len())),
        };

        Ok(Self {
            ur_type: ur_type.to_string(),
            body,
        })
    }

    /// Session metadata this fragment declares.
    pub fn header(&self) -> MessageHeader {
        match &self.body {
            FragmentBody::Single(data) => single_header(data),
            FragmentBody::Multi(part) => part.header(),
        }
    }

    /// Split into the session candidate and the reducer's part descriptor.
    pub fn into_descriptor(self) -> (String, MessageHeader, Part) {
        match self.body {
            FragmentBody::Single(data) => {
                let header = single_header(&data);
                let part = Part {
                    sequence_number: 1,
                    indexes: IndexSet::single(0),
                    data,
                };
                (self.ur_type, header, part)
            }
            FragmentBody::Multi(part) => {
                let (header, part) = part.into_part();
                (self.ur_type, header, part)
            }
        }
    }
}

fn single_header(data: &[u8]) -> MessageHeader {
    MessageHeader {
        segment_count: 1,
        total_length: data.len(),
        checksum: crc32(data),
        fragment_len: data.len(),
    }
}

/// `<seq>-<count>`, both at least 1.
fn parse_sequence(s: &str) -> Result<(u32, usize), EnvelopeError> {
    let invalid = || EnvelopeError::InvalidSequence(s.to_string());
    let (seq, count) = s.split_once('-').ok_or_else(invalid)?;
    let seq: u32 = seq.parse().map_err(|_| invalid())?;
    let count: usize = count.parse().map_err(|_| invalid())?;
    if seq < 1 || count < 1 {
        return Err(invalid());
    }
    Ok((seq, count))
}

/// Type tags are non-empty and use only `a-z`, `0-9` and `-`.
pub fn is_ur_type(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// `ur:<type>/<payload>` for a message that fits in one fragment.
pub fn encode_single(ur_type: &str, message: &[u8]) -> String {
    format!(
        "{SCHEME}:{ur_type}/{}",
        bytewords::encode(Style::Minimal, message)
    )
}

/// `ur:<type>/<seq>-<count>/<payload>` for one fountain part.
pub fn encode_multi(ur_type: &str, part: &FountainPart) -> String {
    format!(
        "{SCHEME}:{ur_type}/{}-{}/{}",
        part.seq_num,
        part.seq_len,
        bytewords::encode(Style::Minimal, &part.to_cbor())
    )
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("fragment does not start with \"{}:\"", SCHEME)]
    InvalidScheme,

    #[error("invalid type tag: {0:?}")]
    InvalidType(String),

    #[error("fragment path has {0} components, expected 2 or 3")]
    InvalidPathLength(usize),

    #[error("invalid sequence component: {0:?}")]
    InvalidSequence(String),

    #[error("envelope sequence {envelope} disagrees with part body {body}")]
    SequenceMismatch { envelope: String, body: String },

    #[error("{what} of {value} exceeds limit {limit}")]
    LimitExceeded {
        what: &'static str,
        value: usize,
        limit: usize,
    },

    #[error("payload: {0}")]
    Bytewords(#[from] BytewordsError),

    #[error("part: {0}")]
    Part(#[from] PartError),
}
