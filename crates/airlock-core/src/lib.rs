//! airlock-core — decoder for multipart fountain-coded fragment streams.
//!
//! A message too large for one QR frame is split into fixed-length
//! segments and sent as an open-ended stream of fragments: pure parts carry
//! one segment, mixed parts carry the XOR of several. `Decoder` accepts
//! those fragments in any order, with duplicates and foreign frames mixed
//! in, and reports success once the reassembled payload passes its
//! checksum. `Encoder` produces the same stream.

pub mod assembler;
pub mod bytewords;
pub mod checksum;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fountain;
pub mod fragment;
pub mod part;
pub mod reducer;
pub mod report;
pub mod sampler;
pub mod session;
pub mod xoshiro;

pub use config::{AirlockConfig, Limits, OutputFormat};
pub use decoder::Decoder;
pub use encoder::{EncodeError, Encoder};
pub use error::{DecodeError, ErrorCode};
pub use fragment::Fragment;
pub use part::{IndexSet, MessageHeader};
pub use report::DecoderReport;
