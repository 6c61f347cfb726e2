//! `decode` — feed a fragment stream to the decoder and print the payload.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use airlock_core::{Decoder, DecoderReport, Limits, OutputFormat};

/// Feed fragments one per line. Blank lines and `#` comments are skipped.
/// Stops at the first line after which the session has ended.
pub fn decode_lines<R: BufRead>(reader: R, limits: Limits) -> Result<Decoder> {
    let mut decoder = Decoder::with_limits(limits);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("failed to read fragment stream")?;
        let fragment = line.trim();
        if fragment.is_empty() || fragment.starts_with('#') {
            continue;
        }

        let accepted = decoder.receive(fragment);
        tracing::debug!(
            line = lineno + 1,
            accepted,
            percent = format!("{:.0}%", decoder.percent_complete() * 100.0),
            "fragment"
        );
        if !accepted {
            if let Some(e) = decoder.last_error() {
                tracing::info!(line = lineno + 1, code = ?e.code(), error = %e, "fragment not accepted");
            }
        }
        if decoder.is_complete() {
            break;
        }
    }

    Ok(decoder)
}

/// Payload plus report, in the requested format.
pub fn render(decoder: &Decoder, format: OutputFormat) -> Result<Vec<u8>> {
    let payload = decoder.result().map(|b| b.to_vec()).unwrap_or_default();
    let out = match format {
        OutputFormat::Raw => payload,
        OutputFormat::Hex => format!("{}\n", hex::encode(&payload)).into_bytes(),
        OutputFormat::Json => {
            let report: DecoderReport = decoder.report();
            let value = serde_json::json!({
                "report": report,
                "payload": decoder.result().map(hex::encode),
            });
            let mut text = serde_json::to_string_pretty(&value).context("failed to encode report")?;
            text.push('\n');
            text.into_bytes()
        }
    };
    Ok(out)
}

/// Returns whether decoding succeeded.
pub fn cmd_decode(path: Option<&str>, limits: Limits, format: OutputFormat) -> Result<bool> {
    let input = super::read_input(path)?;
    let decoder = decode_lines(input.as_slice(), limits)?;

    if decoder.is_success() || format == OutputFormat::Json {
        let out = render(&decoder, format)?;
        std::io::stdout()
            .write_all(&out)
            .context("failed to write output")?;
    }

    if !decoder.is_success() {
        let report = decoder.report();
        eprintln!("═══════════════════════════════════════");
        if decoder.is_failure() {
            eprintln!("  Decode failed");
        } else {
            eprintln!("  Stream ended before decoding completed");
        }
        eprintln!("═══════════════════════════════════════");
        eprintln!("  Progress   : {:.1}%", report.percent_complete * 100.0);
        eprintln!(
            "  Segments   : {}/{}",
            report.solved,
            report
                .segment_count
                .map_or_else(|| "?".to_string(), |n| n.to_string())
        );
        eprintln!("  Pending    : {}", report.pending);
        eprintln!("  Processed  : {}", report.processed);
        if let Some(e) = &report.last_error {
            eprintln!("  Last error : [{:?}] {}", e.code, e.message);
        }
    }

    Ok(decoder.is_success())
}
