// Error type shared by every fallible songsmith operation.
//
// Only conditions that must stop a generation run are errors. Lookups that
// miss a table (an unknown chord or key name) are not: they fall back to a
// documented default and log a warning at the call site (see theory.rs).

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by song generation.
#[derive(Error, Debug)]
pub enum SongError {
    /// The pattern-statistics provider produced nothing usable.
    #[error("pattern source is empty: no progressions, melodies, keys or tempos to learn from")]
    EmptyPatternSource,

    #[error("failed to read pattern statistics from {}: {source}", path.display())]
    PatternRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pattern statistics: {0}")]
    PatternParse(#[from] serde_json::Error),

    /// Serializing or writing the MIDI file failed. Nothing is left at the
    /// destination path when this is returned.
    #[error("failed to write song: {0}")]
    Sink(#[from] std::io::Error),

    #[error("unknown {kind} '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

pub type Result<T> = std::result::Result<T, SongError>;
