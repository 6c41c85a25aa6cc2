//! Error type shared by the obfuscation pass and its configuration loaders.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ObfuscationError>;

/// Failures that abort the obfuscation step.
///
/// Policy exclusions (entries without an id, color state lists, exempt names) are not errors
/// and never surface here.
#[derive(Debug, Error)]
pub enum ObfuscationError {
  /// Every suffixed candidate for a shortened file name is already taken.
  #[error("no free shortened path for '{path}' after {candidates} candidates")]
  PathNamespaceExhausted {
    /// Original path that could not be placed.
    path: String,
    /// Number of candidates tried.
    candidates: u64,
  },
  /// A file reference points outside the table's string pool.
  #[error("file reference points at string {index}, which is not in the string pool")]
  DanglingStringRef {
    /// Index of the unresolved handle.
    index: u32,
  },
  /// A resource name could not be parsed.
  #[error("invalid resource name: {0}")]
  InvalidResourceName(String),
  /// A line in an exemption config could not be parsed.
  #[error("invalid exemption on line {line}: {reason}")]
  InvalidExemption {
    /// One-based line number.
    line: usize,
    /// What was wrong with the line.
    reason: String,
  },
  /// Reading or writing a file failed.
  #[error("failed to access {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A JSON document could not be parsed or produced.
  #[error("failed to process JSON in {}: {source}", path.display())]
  Json {
    /// Path of the document.
    path: PathBuf,
    /// Source serde error.
    source: serde_json::Error,
  },
}
