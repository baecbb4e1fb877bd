//! Error types for board profiles and board description files.

use std::path::PathBuf;

use cpumap_core::{ConfigError, GroupKind, Signal};

/// Errors raised while loading, lowering or resolving a board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading or writing board files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("board file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unknown MCU '{name}'")]
    UnknownMcu { name: String },

    #[error("unknown board profile '{name}'")]
    UnknownProfile { name: String },

    #[error("unknown signal '{name}'")]
    UnknownSignal { name: String },

    #[error("signal {signal} has an invalid pin name '{name}' (expected e.g. PA2)")]
    InvalidPin { signal: Signal, name: String },

    /// Both external lines and a pin-change bank were given.
    #[error("{group} interrupt declares both external lines and a pin-change bank")]
    AmbiguousInterrupt { group: GroupKind },

    /// The board resolved to an inconsistent pin map.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
