//! Session guard — one decoder, one message.
//!
//! The first admitted fragment fixes the session identity: type, segment
//! count, total length, checksum and fragment length. Every later fragment
//! must match all five. A mismatch drops that fragment and nothing else,
//! so a stray frame from another animated QR on screen cannot abort or
//! poison the message being received.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConflictField, DecodeError};
use crate::part::MessageHeader;

/// Identity of one in-progress reconstruction. Immutable once established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub ur_type: String,
    pub header: MessageHeader,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// First fragment; the session now exists.
    Established,
    /// Fragment matches the established session.
    Accepted,
    /// Fragment disagrees with the session on `field`.
    RejectedConflict(Conflict),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub field: ConflictField,
    pub expected: String,
    pub actual: String,
}

impl From<Conflict> for DecodeError {
    fn from(c: Conflict) -> Self {
        DecodeError::SessionConflict {
            field: c.field,
            expected: c.expected,
            actual: c.actual,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionGuard {
    session: Option<Session>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, ur_type: &str, header: &MessageHeader) -> Admission {
        let Some(session) = &self.session else {
            info!(
                ur_type,
                segment_count = header.segment_count,
                total_length = header.total_length,
                checksum = hex::encode(header.checksum.to_be_bytes()),
                "session established"
            );
            self.session = Some(Session {
                ur_type: ur_type.to_string(),
                header: *header,
            });
            return Admission::Established;
        };

        match conflict(session, ur_type, header) {
            None => Admission::Accepted,
            Some(c) => {
                warn!(
                    field = %c.field,
                    expected = %c.expected,
                    actual = %c.actual,
                    "fragment conflicts with session, dropping"
                );
                Admission::RejectedConflict(c)
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn reset(&mut self) {
        self.session = None;
    }
}

fn conflict(session: &Session, ur_type: &str, header: &MessageHeader) -> Option<Conflict> {
    let mismatch = |field, expected: String, actual: String| {
        Some(Conflict {
            field,
            expected,
            actual,
        })
    };
    let have = &session.header;

    if session.ur_type != ur_type {
        return mismatch(ConflictField::Type, session.ur_type.clone(), ur_type.to_string());
    }
    if have.segment_count != header.segment_count {
        return mismatch(
            ConflictField::SegmentCount,
            have.segment_count.to_string(),
            header.segment_count.to_string(),
        );
    }
    if have.total_length != header.total_length {
        return mismatch(
            ConflictField::TotalLength,
            have.total_length.to_string(),
            header.total_length.to_string(),
        );
    }
    if have.checksum != header.checksum {
        return mismatch(
            ConflictField::Checksum,
            format!("0x{:08x}", have.checksum),
            format!("0x{:08x}", header.checksum),
        );
    }
    if have.fragment_len != header.fragment_len {
        return mismatch(
            ConflictField::FragmentLen,
            have.fragment_len.to_string(),
            header.fragment_len.to_string(),
        );
    }
    None
}
