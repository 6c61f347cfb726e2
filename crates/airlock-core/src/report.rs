//! Decoder report — a serialisable snapshot of facade state.
//!
//! Produced by `Decoder::report()` for the CLI's JSON output and for
//! callers that need to hand progress across a process boundary.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderReport {
    /// Type tag of the established session, if any.
    pub ur_type: Option<String>,
    pub complete: bool,
    pub success: bool,
    pub percent_complete: f64,
    /// Segments recovered so far.
    pub solved: usize,
    /// Segment count of the established session, if any.
    pub segment_count: Option<usize>,
    /// Mixed parts waiting on unknown segments.
    pub pending: usize,
    /// Fragments admitted to the session, duplicates included.
    pub processed: usize,
    pub last_error: Option<ErrorReport>,
    /// Payload length once decoding succeeded.
    pub result_len: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub fatal: bool,
    pub message: String,
}

impl From<&DecodeError> for ErrorReport {
    fn from(e: &DecodeError) -> Self {
        Self {
            code: e.code(),
            fatal: e.is_fatal(),
            message: e.to_string(),
        }
    }
}
