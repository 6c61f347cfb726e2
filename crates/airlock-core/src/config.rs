//! Configuration system for airlock.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $AIRLOCK_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/airlock/config.toml
//!   3. ~/.config/airlock/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::fountain::DEFAULT_MIN_FRAGMENT_LEN;
use crate::fragment::EnvelopeError;
use crate::part::MessageHeader;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirlockConfig {
    pub limits: Limits,
    pub encoder: EncoderSettings,
    pub output: OutputSettings,
}

/// Caps applied to every fragment before the decoder allocates anything
/// for it. The stream is untrusted; these bound what one frame can cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest segment count a session may declare.
    pub max_segment_count: usize,
    /// Largest total message length a session may declare.
    pub max_message_len: usize,
    /// Longest fragment text accepted, in bytes.
    pub max_fragment_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSettings {
    pub max_fragment_len: usize,
    pub min_fragment_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// How a decoded payload is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Raw,
    #[default]
    Hex,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "hex" => Ok(Self::Hex),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "output.format",
                value: s.to_string(),
            }),
        }
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_segment_count: 65_536,
            max_message_len: 16 * 1024 * 1024, // 16 MiB
            max_fragment_chars: 1024 * 1024,
        }
    }
}

impl Limits {
    /// Fragment text length, checked before any parsing.
    pub fn check_text(&self, text: &str) -> Result<(), EnvelopeError> {
        check_limit("fragment length", text.len(), self.max_fragment_chars)
    }

    /// Declared session size, checked before anything is sized from it.
    pub fn check_header(&self, header: &MessageHeader) -> Result<(), EnvelopeError> {
        check_limit("segment count", header.segment_count, self.max_segment_count)?;
        check_limit("message length", header.total_length, self.max_message_len)
    }
}

fn check_limit(what: &'static str, value: usize, limit: usize) -> Result<(), EnvelopeError> {
    if value > limit {
        tracing::warn!(what, value, limit, "fragment exceeds limit, dropping");
        return Err(EnvelopeError::LimitExceeded { what, value, limit });
    }
    Ok(())
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            max_fragment_len: 200,
            min_fragment_len: DEFAULT_MIN_FRAGMENT_LEN,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Hex,
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("airlock")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl AirlockConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::file_path())
    }

    /// Same as `load`, reading an explicit file. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))?
        } else {
            AirlockConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("AIRLOCK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        write_default_to(&path)?;
        Ok(path)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)
    }

    /// Apply AIRLOCK_* env var overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overrides from any key/value source. Unparseable values are skipped
    /// with a warning so a stray variable cannot stop the tool from starting.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        fn parse_into(key: &str, value: String, slot: &mut usize) {
            match value.parse() {
                Ok(v) => *slot = v,
                Err(_) => tracing::warn!(key, value = %value, "ignoring unparseable override"),
            }
        }

        if let Some(v) = var("AIRLOCK_LIMITS__MAX_SEGMENT_COUNT") {
            parse_into("AIRLOCK_LIMITS__MAX_SEGMENT_COUNT", v, &mut self.limits.max_segment_count);
        }
        if let Some(v) = var("AIRLOCK_LIMITS__MAX_MESSAGE_LEN") {
            parse_into("AIRLOCK_LIMITS__MAX_MESSAGE_LEN", v, &mut self.limits.max_message_len);
        }
        if let Some(v) = var("AIRLOCK_LIMITS__MAX_FRAGMENT_CHARS") {
            parse_into("AIRLOCK_LIMITS__MAX_FRAGMENT_CHARS", v, &mut self.limits.max_fragment_chars);
        }
        if let Some(v) = var("AIRLOCK_ENCODER__MAX_FRAGMENT_LEN") {
            parse_into("AIRLOCK_ENCODER__MAX_FRAGMENT_LEN", v, &mut self.encoder.max_fragment_len);
        }
        if let Some(v) = var("AIRLOCK_OUTPUT__FORMAT") {
            match v.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => tracing::warn!(error = %e, "ignoring AIRLOCK_OUTPUT__FORMAT"),
            }
        }
    }
}

fn write_default_to(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))?;
    }
    let text = AirlockConfig::default().to_toml()?;
    std::fs::write(path, text).map_err(|e| ConfigError::WriteFailed(path.to_path_buf(), e))
}
