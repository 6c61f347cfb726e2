//! Decoder error taxonomy.
//!
//! Every rejection the facade can record folds into `DecodeError`. Only a
//! checksum mismatch at assembly is fatal; everything else drops the
//! offending fragment and leaves the session open.
//!
//! `ErrorCode` is the flat, stable view of the same taxonomy for callers
//! that can only carry an integer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bytewords::BytewordsError;
use crate::fragment::EnvelopeError;
use crate::part::IndexSet;

/// Session identity field that disagreed with the established session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictField {
    Type,
    SegmentCount,
    TotalLength,
    Checksum,
    FragmentLen,
}

impl fmt::Display for ConflictField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictField::Type => "type",
            ConflictField::SegmentCount => "segment count",
            ConflictField::TotalLength => "total length",
            ConflictField::Checksum => "checksum",
            ConflictField::FragmentLen => "fragment length",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Envelope syntax, payload codec, or part body failed to validate.
    #[error("malformed fragment: {0}")]
    Malformed(#[from] EnvelopeError),

    /// Fragment belongs to a different message than the established session.
    #[error("session conflict on {field}: session has {expected}, fragment has {actual}")]
    SessionConflict {
        field: ConflictField,
        expected: String,
        actual: String,
    },

    /// Peeling left non-zero residual data where the index set ran out.
    #[error("inconsistent reduction of part {indexes}: residual data is non-zero")]
    InconsistentReduction { indexes: IndexSet },

    /// Fully assembled message failed its checksum. Fatal for the session.
    #[error("message checksum mismatch: declared 0x{expected:08x}, assembled 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

impl DecodeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::ChecksumMismatch { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Malformed(e) => match e {
                EnvelopeError::InvalidScheme => ErrorCode::InvalidScheme,
                EnvelopeError::InvalidType(_) => ErrorCode::InvalidType,
                EnvelopeError::InvalidPathLength(_) => ErrorCode::InvalidPathLength,
                EnvelopeError::InvalidSequence(_) => ErrorCode::InvalidSequence,
                EnvelopeError::SequenceMismatch { .. } => ErrorCode::SequenceMismatch,
                EnvelopeError::LimitExceeded { .. } => ErrorCode::LimitExceeded,
                EnvelopeError::Bytewords(BytewordsError::ChecksumMismatch { .. }) => {
                    ErrorCode::BytewordsChecksum
                }
                EnvelopeError::Bytewords(_) => ErrorCode::InvalidBytewords,
                EnvelopeError::Part(_) => ErrorCode::InvalidPart,
            },
            DecodeError::SessionConflict { .. } => ErrorCode::SessionConflict,
            DecodeError::InconsistentReduction { .. } => ErrorCode::InconsistentReduction,
            DecodeError::ChecksumMismatch { .. } => ErrorCode::ChecksumMismatch,
        }
    }
}

/// Stable numeric error codes. Values never change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ErrorCode {
    None = 0,
    InvalidScheme = 1,
    InvalidType = 2,
    InvalidPathLength = 3,
    InvalidSequence = 4,
    SequenceMismatch = 5,
    InvalidBytewords = 6,
    BytewordsChecksum = 7,
    InvalidPart = 8,
    LimitExceeded = 9,
    SessionConflict = 10,
    InconsistentReduction = 11,
    ChecksumMismatch = 12,
}

impl ErrorCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::InvalidScheme),
            2 => Some(Self::InvalidType),
            3 => Some(Self::InvalidPathLength),
            4 => Some(Self::InvalidSequence),
            5 => Some(Self::SequenceMismatch),
            6 => Some(Self::InvalidBytewords),
            7 => Some(Self::BytewordsChecksum),
            8 => Some(Self::InvalidPart),
            9 => Some(Self::LimitExceeded),
            10 => Some(Self::SessionConflict),
            11 => Some(Self::InconsistentReduction),
            12 => Some(Self::ChecksumMismatch),
            _ => None,
        }
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> u8 {
        code as u8
    }
}
