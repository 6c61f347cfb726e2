//! Assembler & verifier — the one-shot step after the last segment lands.

use bytes::{Bytes, BytesMut};

use crate::checksum::Crc32;
use crate::error::DecodeError;
use crate::part::MessageHeader;

/// Concatenate `segments` in index order, trim to the declared length and
/// verify the message checksum.
///
/// A mismatch is final: every segment is already pinned, so no further
/// part can change what this returns.
pub fn assemble<'a, I>(segments: I, header: &MessageHeader) -> Result<Bytes, DecodeError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut message = BytesMut::with_capacity(header.segment_count * header.fragment_len);
    for segment in segments {
        message.extend_from_slice(segment);
    }
    message.truncate(header.total_length);

    let mut hasher = Crc32::new();
    hasher.update(&message);
    let actual = hasher.finalize();

    if actual != header.checksum {
        tracing::error!(
            expected = hex::encode(header.checksum.to_be_bytes()),
            actual = hex::encode(actual.to_be_bytes()),
            bytes = message.len(),
            segments = header.segment_count,
            "assembled message failed checksum"
        );
        return Err(DecodeError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    tracing::info!(
        bytes = message.len(),
        segments = header.segment_count,
        checksum = hex::encode(actual.to_be_bytes()),
        "message received and reassembled"
    );
    Ok(message.freeze())
}
