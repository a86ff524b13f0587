use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A JSON content tree could not be loaded.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("invalid content tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The requested selection could not be resolved against the document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("invalid block range {0:?}, expected N, N..M or N..")]
    InvalidRange(String),

    #[error("block range {start}..{end} is empty or reversed")]
    EmptyRange { start: usize, end: usize },

    #[error("block range {start}..{end} is outside the document ({len} blocks)")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard program found (tried {tried})")]
    NoProgram { tried: String },

    #[error("failed to run clipboard program `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("clipboard program `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("failed to write to the clipboard: {0}")]
    Io(#[from] std::io::Error),
}

/// A copy action failed at the clipboard boundary. The serialized text is
/// kept so the caller can offer it another way.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("copying {} characters failed: {source}", .text.chars().count())]
    Clipboard {
        text: String,
        #[source]
        source: ClipboardError,
    },
}

impl CopyError {
    /// The text that was going to be copied.
    pub fn text(&self) -> &str {
        match self {
            CopyError::Clipboard { text, .. } => text,
        }
    }
}
