//! Decoder facade — one instance, one message.
//!
//! Feed fragments with `receive` in whatever order they arrive. Each call
//! runs the fragment through parse → limits → session guard → reducer and
//! returns whether it moved decoding forward. Nothing a fragment contains
//! can make `receive` panic or stop accepting further fragments, except a
//! completed assembly: success or a fatal checksum failure both end the
//! session, and later calls are no-ops.
//!
//! ```
//! use airlock_core::{Decoder, Encoder};
//!
//! let mut encoder = Encoder::new("bytes", b"a message spanning several frames", 12).unwrap();
//! let mut decoder = Decoder::new();
//! while !decoder.is_complete() {
//!     decoder.receive(&encoder.next_part());
//! }
//! assert!(decoder.is_success());
//! assert_eq!(&decoder.result().unwrap()[..], b"a message spanning several frames");
//! ```

use bytes::Bytes;
use tracing::{debug, warn};

use crate::assembler::assemble;
use crate::config::Limits;
use crate::error::{DecodeError, ErrorCode};
use crate::fragment::Fragment;
use crate::part::{IndexSet, MessageHeader};
use crate::reducer::{PeelingReducer, Reduction};
use crate::report::{DecoderReport, ErrorReport};
use crate::session::{Admission, Session, SessionGuard};

#[derive(Debug, Default)]
pub struct Decoder {
    limits: Limits,
    guard: SessionGuard,
    reducer: Option<PeelingReducer>,
    /// Set exactly once, when the last segment is solved.
    outcome: Option<Result<Bytes, DecodeError>>,
    last_error: Option<DecodeError>,
    last_part_indexes: Option<IndexSet>,
    processed: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Ingest one fragment. True if it was admitted and carried new
    /// information; false if it was rejected, a duplicate, or arrived after
    /// the session ended. Rejections are recorded in `last_error`.
    pub fn receive(&mut self, fragment: &str) -> bool {
        if self.outcome.is_some() {
            debug!("session already complete, ignoring fragment");
            return false;
        }
        match self.try_receive(fragment) {
            Ok(accepted) => accepted,
            Err(e) => {
                self.last_error = Some(e);
                false
            }
        }
    }

    fn try_receive(&mut self, text: &str) -> Result<bool, DecodeError> {
        self.limits.check_text(text)?;

        let fragment = Fragment::parse(text).map_err(|e| {
            warn!(error = %e, "malformed fragment, dropping");
            e
        })?;
        let header = fragment.header();
        self.limits.check_header(&header)?;

        let (ur_type, header, part) = fragment.into_descriptor();
        if let Admission::RejectedConflict(conflict) = self.guard.admit(&ur_type, &header) {
            return Err(conflict.into());
        }

        self.processed += 1;
        self.last_part_indexes = Some(part.indexes.clone());

        let reducer = self
            .reducer
            .get_or_insert_with(|| PeelingReducer::new(header.segment_count));

        match reducer.ingest(part) {
            Reduction::AlreadyKnown => Ok(false),
            Reduction::Pending => Ok(true),
            Reduction::Rejected(e) => Err(e),
            Reduction::SolvedNew { advisory, .. } => {
                if let Some(advisory) = advisory {
                    self.last_error = Some(advisory);
                }
                if reducer.is_complete() {
                    self.finish(&header);
                }
                Ok(true)
            }
        }
    }

    fn finish(&mut self, header: &MessageHeader) {
        let Some(segments) = self.reducer.as_ref().and_then(|r| r.segments()) else {
            return;
        };
        let outcome = assemble(segments, header);
        if let Err(e) = &outcome {
            self.last_error = Some(e.clone());
        }
        self.outcome = Some(outcome);
    }

    // ── State ─────────────────────────────────────────────────────────────────

    /// True once the session has ended, in success or fatal failure.
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Some(Ok(_)))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Some(Err(_)))
    }

    /// Fraction of segments solved, in `[0, 1]`. Exactly 1.0 only on
    /// success; a failed session stays below it.
    pub fn percent_complete(&self) -> f64 {
        let Some(reducer) = &self.reducer else {
            return 0.0;
        };
        let total = reducer.segment_count();
        let solved = match &self.outcome {
            Some(Ok(_)) => return 1.0,
            Some(Err(_)) => reducer.solved_count().min(total.saturating_sub(1)),
            None => reducer.solved_count(),
        };
        if total == 0 {
            return 0.0;
        }
        solved as f64 / total as f64
    }

    /// The verified payload. `None` unless `is_success()`.
    pub fn result(&self) -> Option<&Bytes> {
        match &self.outcome {
            Some(Ok(message)) => Some(message),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&DecodeError> {
        self.last_error.as_ref()
    }

    pub fn last_error_code(&self) -> ErrorCode {
        self.last_error
            .as_ref()
            .map_or(ErrorCode::None, DecodeError::code)
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    pub fn session(&self) -> Option<&Session> {
        self.guard.session()
    }

    pub fn expected_part_count(&self) -> Option<usize> {
        self.session().map(|s| s.header.segment_count)
    }

    /// Segment indexes solved so far.
    pub fn received_part_indexes(&self) -> IndexSet {
        self.reducer
            .as_ref()
            .map(PeelingReducer::solved_indexes)
            .unwrap_or_default()
    }

    /// Index set of the most recently admitted part, as declared.
    pub fn last_part_indexes(&self) -> Option<&IndexSet> {
        self.last_part_indexes.as_ref()
    }

    /// Fragments admitted to the session, duplicates included.
    pub fn processed_parts_count(&self) -> usize {
        self.processed
    }

    pub fn pending_count(&self) -> usize {
        self.reducer.as_ref().map_or(0, PeelingReducer::pending_count)
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn report(&self) -> DecoderReport {
        DecoderReport {
            ur_type: self.session().map(|s| s.ur_type.clone()),
            complete: self.is_complete(),
            success: self.is_success(),
            percent_complete: self.percent_complete(),
            solved: self.reducer.as_ref().map_or(0, PeelingReducer::solved_count),
            segment_count: self.expected_part_count(),
            pending: self.pending_count(),
            processed: self.processed,
            last_error: self.last_error.as_ref().map(ErrorReport::from),
            result_len: self.result().map(Bytes::len),
        }
    }

    /// Drop all session state. Limits are kept.
    pub fn reset(&mut self) {
        debug!("decoder reset");
        *self = Self::with_limits(self.limits);
    }
}
