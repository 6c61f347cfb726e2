//! `inspect` — parse one fragment and show what it declares.

use anyhow::{Context, Result};
use airlock_core::fragment::{Fragment, FragmentBody};
use airlock_core::Limits;

#[derive(Debug)]
pub struct Inspection {
    pub ur_type: String,
    pub sequence: Option<(u32, usize)>,
    pub segment_count: usize,
    pub message_len: usize,
    pub checksum: u32,
    pub fragment_len: usize,
    pub indexes: Vec<usize>,
}

/// The chooser is sized by the declared segment count, so limits apply
/// before indexes are computed.
pub fn inspect(text: &str, limits: &Limits) -> Result<Inspection> {
    limits.check_text(text)?;
    let fragment = Fragment::parse(text).context("fragment did not parse")?;
    let header = fragment.header();
    limits
        .check_header(&header)
        .context("fragment declares an oversized message")?;
    let (sequence, indexes) = match &fragment.body {
        FragmentBody::Single(_) => (None, vec![0]),
        FragmentBody::Multi(part) => (
            Some((part.seq_num, part.seq_len)),
            part.indexes().iter().collect(),
        ),
    };
    Ok(Inspection {
        ur_type: fragment.ur_type,
        sequence,
        segment_count: header.segment_count,
        message_len: header.total_length,
        checksum: header.checksum,
        fragment_len: header.fragment_len,
        indexes,
    })
}

pub fn cmd_inspect(text: &str, limits: &Limits) -> Result<()> {
    let i = inspect(text, limits)?;

    println!("═══════════════════════════════════════");
    println!("  Fragment");
    println!("═══════════════════════════════════════");
    println!("  Type          : {}", i.ur_type);
    match i.sequence {
        Some((seq, len)) => println!("  Sequence      : {} of {}", seq, len),
        None => println!("  Sequence      : single part"),
    }
    println!("  Segments      : {}", i.segment_count);
    println!("  Message bytes : {}", i.message_len);
    println!("  Fragment bytes: {}", i.fragment_len);
    println!("  Checksum      : {}", hex::encode(i.checksum.to_be_bytes()));
    println!("  Indexes       : {:?}", i.indexes);

    Ok(())
}
