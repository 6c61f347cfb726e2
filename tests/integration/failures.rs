use airlock_core::bytewords::{self, Style};
use airlock_core::checksum::crc32;
use airlock_core::fragment::{encode_multi, Fragment, FragmentBody};
use airlock_core::part::FountainPart;
use airlock_core::{DecodeError, Decoder, Encoder, ErrorCode, Limits};

use crate::*;

/// Re-encode a fragment with one payload byte flipped but the original
/// bytewords checksum kept, so the codec check must catch it.
fn corrupt_payload(fragment: &str, byte: usize) -> String {
    let fragment = fragment.to_lowercase();
    let (head, payload) = fragment.rsplit_once('/').unwrap();
    let mut body = bytewords::decode(Style::Minimal, payload).unwrap();
    body[byte] ^= 0x01;
    let forged = bytewords::encode(Style::Minimal, &body);
    format!(
        "{head}/{}{}",
        &forged[..forged.len() - 8],
        &payload[payload.len() - 8..]
    )
}

// ══════════════════════════════════════════════════════════════════════════════
//  Malformed fragments
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_corrupted_fragment_is_rejected() {
    let corrupted = corrupt_payload(CAPTURED_STREAM[0], 20);

    let mut decoder = Decoder::new();
    assert!(!decoder.receive(&corrupted));
    assert_eq!(decoder.last_error_code(), ErrorCode::BytewordsChecksum);
    assert!(decoder.session().is_none(), "corrupt fragment must not establish a session");
    assert_eq!(decoder.processed_parts_count(), 0);

    // The rest of the stream still decodes.
    for fragment in &CAPTURED_STREAM[1..] {
        decoder.receive(fragment);
    }
    assert!(decoder.is_success());
    assert_eq!(&decoder.result().unwrap()[..], &captured_payload()[..]);
}

#[test]
fn test_malformed_envelopes_map_to_codes() {
    let first = encode_stream(&[0xa5; 100], 30, 1).remove(0);
    let cases: Vec<(String, ErrorCode)> = vec![
        ("".into(), ErrorCode::InvalidScheme),
        ("qr:bytes/aeadaolazmjendeoti".into(), ErrorCode::InvalidScheme),
        ("ur:by_tes/aeadaolazmjendeoti".into(), ErrorCode::InvalidType),
        ("ur:bytes".into(), ErrorCode::InvalidPathLength),
        ("ur:bytes/1/2/3/aeadaolazmjendeoti".into(), ErrorCode::InvalidPathLength),
        (first.replacen("/1-4/", "/0-4/", 1), ErrorCode::InvalidSequence),
        (first.replacen("/1-4/", "/x-4/", 1), ErrorCode::InvalidSequence),
        (first.replacen("/1-4/", "/2-4/", 1), ErrorCode::SequenceMismatch),
        ("ur:bytes/qqqq".into(), ErrorCode::InvalidBytewords),
        // Valid bytewords around a body that is not a fountain part.
        (
            format!("ur:bytes/1-1/{}", bytewords::encode(Style::Minimal, &[0x01, 0x02])),
            ErrorCode::InvalidPart,
        ),
    ];

    for (fragment, code) in cases {
        let mut decoder = Decoder::new();
        assert!(!decoder.receive(&fragment), "{fragment:?} accepted");
        assert_eq!(decoder.last_error_code(), code, "{fragment:?}");
        assert!(!decoder.last_error().unwrap().is_fatal());
        assert!(!decoder.is_complete());
    }
}

#[test]
fn test_rejections_do_not_stop_decoding() {
    let mut decoder = Decoder::new();
    for (i, fragment) in CAPTURED_STREAM.iter().enumerate() {
        decoder.receive("ur:bytes/not-bytewords");
        decoder.receive(fragment);
        if decoder.is_complete() {
            assert_eq!(i, 14);
            break;
        }
    }
    assert!(decoder.is_success());
}

// ══════════════════════════════════════════════════════════════════════════════
//  Session conflicts
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_foreign_type_is_a_conflict() {
    let mut psbt = Encoder::new("crypto-psbt", &captured_payload(), 81).unwrap();

    let mut decoder = Decoder::new();
    assert!(decoder.receive(CAPTURED_STREAM[0]));
    assert!(!decoder.receive(&psbt.next_part()));

    match decoder.last_error() {
        Some(DecodeError::SessionConflict { expected, actual, .. }) => {
            assert_eq!(expected, "bytes");
            assert_eq!(actual, "crypto-psbt");
        }
        other => panic!("expected a session conflict, got {other:?}"),
    }
    assert_eq!(decoder.received_part_indexes().len(), 1);
    assert_eq!(decoder.session().unwrap().ur_type, "bytes");
}

#[test]
fn test_interleaved_streams_keep_first_session() {
    let other = encode_stream(b"an unrelated message on the same screen", 12, 8);

    let mut decoder = Decoder::new();
    let mut conflicts = 0;
    for (ours, theirs) in CAPTURED_STREAM.iter().zip(other.iter().cycle()) {
        decoder.receive(ours);
        if decoder.is_complete() {
            break;
        }
        decoder.receive(theirs);
        if decoder.last_error_code() == ErrorCode::SessionConflict {
            conflicts += 1;
        }
    }
    assert!(conflicts > 0);
    assert!(decoder.is_success());
    assert_eq!(&decoder.result().unwrap()[..], &captured_payload()[..]);
}

// ══════════════════════════════════════════════════════════════════════════════
//  Inconsistent reduction
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_contradicting_mixed_part_is_dropped() {
    let message = wolf_cbor();
    let fragments = encode_stream(&message, 30, 12);
    // 9 segments of 29 bytes; part 12 mixes segments 2 and 6.
    let mixed = Fragment::parse(&fragments[11]).unwrap();
    let FragmentBody::Multi(mut part) = mixed.body else {
        panic!("expected a multipart fragment");
    };
    assert_eq!(part.indexes().iter().collect::<Vec<_>>(), vec![2, 6]);
    part.data[0] ^= 0xff;
    let forged = encode_multi("bytes", &part);

    let mut decoder = Decoder::new();
    assert!(decoder.receive(&fragments[2]));
    assert!(decoder.receive(&fragments[6]));
    assert!(!decoder.receive(&forged));
    assert_eq!(decoder.last_error_code(), ErrorCode::InconsistentReduction);
    assert!(!decoder.is_complete());

    for fragment in &fragments[..9] {
        decoder.receive(fragment);
    }
    assert!(decoder.is_success());
    assert_eq!(&decoder.result().unwrap()[..], &message[..]);
}

// ══════════════════════════════════════════════════════════════════════════════
//  Fatal assembly failure
// ══════════════════════════════════════════════════════════════════════════════

/// Pure parts of `message` that declare `checksum` instead of the real one.
fn parts_with_checksum(message: &[u8], fragment_len: usize, checksum: u32) -> Vec<String> {
    let seq_len = message.len().div_ceil(fragment_len);
    message
        .chunks(fragment_len)
        .enumerate()
        .map(|(i, chunk)| {
            let mut data = chunk.to_vec();
            data.resize(fragment_len, 0);
            encode_multi(
                "bytes",
                &FountainPart {
                    seq_num: i as u32 + 1,
                    seq_len,
                    message_len: message.len(),
                    checksum,
                    data,
                },
            )
        })
        .collect()
}

#[test]
fn test_checksum_mismatch_ends_session() {
    let message = b"the declared checksum of this message is wrong".to_vec();
    let declared = crc32(&message) ^ 0x8000_0000;
    let fragments = parts_with_checksum(&message, 16, declared);
    assert_eq!(fragments.len(), 3);

    let mut decoder = Decoder::new();
    for fragment in &fragments {
        assert!(decoder.receive(fragment));
    }

    assert!(decoder.is_complete());
    assert!(!decoder.is_success());
    assert!(decoder.result().is_none());
    assert!(decoder.percent_complete() < 1.0);
    match decoder.last_error() {
        Some(DecodeError::ChecksumMismatch { expected, actual }) => {
            assert_eq!(*expected, declared);
            assert_eq!(*actual, crc32(&message));
        }
        other => panic!("expected checksum mismatch, got {other:?}"),
    }
    assert!(decoder.last_error().unwrap().is_fatal());

    // No further fragment can revive the session.
    let before = decoder.report();
    for fragment in &fragments {
        assert!(!decoder.receive(fragment));
    }
    assert!(!decoder.receive(CAPTURED_STREAM[0]));
    assert!(decoder.is_complete());
    assert!(!decoder.is_success());
    assert_eq!(decoder.report(), before);
}

#[test]
fn test_reset_recovers_after_failure() {
    let message = b"the declared checksum of this message is wrong".to_vec();
    let fragments = parts_with_checksum(&message, 16, 0);

    let mut decoder = Decoder::new();
    for fragment in &fragments {
        decoder.receive(fragment);
    }
    assert!(decoder.is_failure());

    decoder.reset();
    assert_eq!(decoder.last_error_code(), ErrorCode::None);
    let (fresh, _) = feed(CAPTURED_STREAM);
    for fragment in CAPTURED_STREAM {
        decoder.receive(fragment);
    }
    assert!(decoder.is_success());
    assert_eq!(decoder.result(), fresh.result());
}

// ══════════════════════════════════════════════════════════════════════════════
//  Limits
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_oversized_session_is_refused() {
    let mut decoder = Decoder::with_limits(Limits {
        max_message_len: 300,
        ..Limits::default()
    });
    for fragment in CAPTURED_STREAM {
        assert!(!decoder.receive(fragment));
    }
    assert_eq!(decoder.last_error_code(), ErrorCode::LimitExceeded);
    assert!(decoder.session().is_none());
    assert_eq!(decoder.percent_complete(), 0.0);
}
