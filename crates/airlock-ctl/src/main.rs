//! airlock-ctl — encode, decode and inspect fountain-coded fragment streams.

mod cmd;

use std::path::PathBuf;

use airlock_core::{AirlockConfig, OutputFormat};
use anyhow::{Context, Result};

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Options {
    config: Option<PathBuf>,
    format: Option<OutputFormat>,
    max_fragment_len: Option<usize>,
    count: Option<usize>,
}

/// Pull `--flag value` pairs out of `args`, leaving the positional words.
fn parse_args(args: &[String]) -> Result<(Options, Vec<&str>)> {
    let mut opts = Options::default();
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                opts.config = Some(args.get(i).context("--config requires a path")?.into());
            }
            "--format" => {
                i += 1;
                let value = args.get(i).context("--format requires a value")?;
                opts.format = Some(
                    value
                        .parse::<OutputFormat>()
                        .with_context(|| format!("--format must be raw, hex or json, got {}", value))?,
                );
            }
            "--max-fragment-len" => {
                i += 1;
                opts.max_fragment_len = Some(
                    args.get(i)
                        .context("--max-fragment-len requires a value")?
                        .parse::<usize>()
                        .context("--max-fragment-len must be a number")?,
                );
            }
            "--count" => {
                i += 1;
                opts.count = Some(
                    args.get(i)
                        .context("--count requires a value")?
                        .parse::<usize>()
                        .context("--count must be a number")?,
                );
            }
            other => remaining.push(other),
        }
        i += 1;
    }
    Ok((opts, remaining))
}

fn load_config(opts: &Options) -> AirlockConfig {
    let loaded = match &opts.config {
        Some(path) => AirlockConfig::load_from(path),
        None => AirlockConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        AirlockConfig::default()
    })
}

// ── Subcommand handlers ───────────────────────────────────────────────────────

fn cmd_config(config: &AirlockConfig, opts: &Options) -> Result<()> {
    let path = opts.config.clone().unwrap_or_else(AirlockConfig::file_path);
    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = AirlockConfig::write_default_if_missing()?;
    println!("Config at {}", path.display());
    Ok(())
}

fn print_usage() {
    println!("Usage: airlock-ctl [--config <path>] <command>");
    println!();
    println!("Commands:");
    println!("  decode [FILE]           Decode fragments, one per line (stdin if no FILE)");
    println!("  encode <TYPE> [FILE]    Split a payload into fragments");
    println!("  inspect <FRAGMENT>      Show what a single fragment declares");
    println!("  config                  Print the resolved configuration");
    println!("  config init             Write a default config file if none exists");
    println!();
    println!("Options:");
    println!("  --config <path>             Config file (default: $AIRLOCK_CONFIG or XDG path)");
    println!("  --format <raw|hex|json>     decode output format (default: from config)");
    println!("  --max-fragment-len <n>      encode fragment size cap (default: from config)");
    println!("  --count <n>                 encode fragment count (default: one pass)");
    println!();
    println!("Logging is controlled by RUST_LOG, e.g. RUST_LOG=airlock_core=debug.");
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (opts, remaining) = parse_args(&args)?;
    let config = load_config(&opts);

    let max_fragment_len = opts.max_fragment_len.unwrap_or(config.encoder.max_fragment_len);
    let min_fragment_len = config.encoder.min_fragment_len;

    match remaining.as_slice() {
        ["decode"] => exit_on_failure(cmd::decode::cmd_decode(
            None,
            config.limits,
            opts.format.unwrap_or(config.output.format),
        )),
        ["decode", path] => exit_on_failure(cmd::decode::cmd_decode(
            Some(*path),
            config.limits,
            opts.format.unwrap_or(config.output.format),
        )),
        ["encode", ur_type] => {
            cmd::encode::cmd_encode(ur_type, None, min_fragment_len, max_fragment_len, opts.count)
        }
        ["encode", ur_type, path] => cmd::encode::cmd_encode(
            ur_type,
            Some(*path),
            min_fragment_len,
            max_fragment_len,
            opts.count,
        ),
        ["inspect", fragment] => cmd::inspect::cmd_inspect(fragment, &config.limits),
        ["config"] => cmd_config(&config, &opts),
        ["config", "init"] => cmd_config_init(),
        ["help"] | ["--help"] | ["-h"] | [] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn exit_on_failure(result: Result<bool>) -> Result<()> {
    if !result? {
        std::process::exit(1);
    }
    Ok(())
}
