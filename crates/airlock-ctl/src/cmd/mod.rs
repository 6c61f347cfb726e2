//! CLI command modules.

pub mod decode;
pub mod encode;
pub mod inspect;

use std::io::Read;

use anyhow::{Context, Result};

/// Read all of FILE, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        None | Some("-") => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read file: {}", path))
        }
    }
}
