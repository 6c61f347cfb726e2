//! `encode` — split a payload into a fragment stream.

use anyhow::{Context, Result};
use airlock_core::Encoder;

/// `count` fragments, or one full pass over the pure parts by default.
pub fn encode_fragments(
    ur_type: &str,
    payload: &[u8],
    min_fragment_len: usize,
    max_fragment_len: usize,
    count: Option<usize>,
) -> Result<Vec<String>> {
    let mut encoder = Encoder::with_bounds(ur_type, payload, min_fragment_len, max_fragment_len)
        .context("cannot encode payload")?;
    let count = count.unwrap_or(encoder.seq_len());

    tracing::info!(
        ur_type,
        bytes = payload.len(),
        fragment_len = encoder.fragment_len(),
        seq_len = encoder.seq_len(),
        count,
        "encoding"
    );

    Ok((0..count).map(|_| encoder.next_part()).collect())
}

pub fn cmd_encode(
    ur_type: &str,
    path: Option<&str>,
    min_fragment_len: usize,
    max_fragment_len: usize,
    count: Option<usize>,
) -> Result<()> {
    let payload = super::read_input(path)?;
    for fragment in encode_fragments(ur_type, &payload, min_fragment_len, max_fragment_len, count)? {
        println!("{}", fragment);
    }
    Ok(())
}
