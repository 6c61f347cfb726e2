//! Fountain code parameters shared by producer and consumer.
//!
//! Which segments a mixed part combines is a pure function of the part's
//! sequence number, the segment count and the message checksum. Nothing
//! else feeds the generator, so any decoder can recompute a part's index
//! set from the fragment alone.

use tracing::trace;

use crate::part::IndexSet;
use crate::sampler::AliasSampler;
use crate::xoshiro::Xoshiro256;

/// Smallest fragment the encoder will emit unless the message is shorter.
pub const DEFAULT_MIN_FRAGMENT_LEN: usize = 10;

/// Segment indexes mixed into part `seq_num` of a `seq_len`-segment message.
///
/// The first `seq_len` sequence numbers are pure parts, in order. Later
/// ones draw a degree from a 1/k distribution and take that many indexes
/// from a seeded shuffle.
pub fn choose_fragments(seq_num: u32, seq_len: usize, checksum: u32) -> IndexSet {
    if (seq_num as usize) <= seq_len {
        return IndexSet::single((seq_num as usize).saturating_sub(1));
    }

    let mut seed = [0u8; 8];
    seed[..4].copy_from_slice(&seq_num.to_be_bytes());
    seed[4..].copy_from_slice(&checksum.to_be_bytes());
    let mut rng = Xoshiro256::from_seed(&seed);

    let degree = choose_degree(seq_len, &mut rng);
    let indexes: IndexSet = rng
        .shuffled_prefix((0..seq_len).collect(), degree)
        .into_iter()
        .collect();

    trace!(seq_num, seq_len, degree, %indexes, "chose fragments");
    indexes
}

fn choose_degree(seq_len: usize, rng: &mut Xoshiro256) -> usize {
    let weights: Vec<f64> = (1..=seq_len).map(|k| 1.0 / k as f64).collect();
    match AliasSampler::new(&weights) {
        Some(sampler) => sampler.next(rng) + 1,
        None => 1,
    }
}

/// Fragment length that splits `message_len` bytes into the fewest equal
/// fragments no longer than `max_len`, without going below `min_len`.
pub fn nominal_fragment_length(message_len: usize, min_len: usize, max_len: usize) -> usize {
    let max_count = (message_len / min_len.max(1)).max(1);
    let mut fragment_len = message_len;
    for count in 1..=max_count {
        fragment_len = message_len.div_ceil(count);
        if fragment_len <= max_len {
            break;
        }
    }
    fragment_len
}

/// Split `message` into `fragment_len` segments, zero-padding the last.
pub fn partition(message: &[u8], fragment_len: usize) -> Vec<Vec<u8>> {
    message
        .chunks(fragment_len.max(1))
        .map(|chunk| {
            let mut segment = chunk.to_vec();
            segment.resize(fragment_len, 0);
            segment
        })
        .collect()
}
