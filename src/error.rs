use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Crate-wide error type
// ---------------------------------------------------------------------------

/// Everything that can go wrong while selecting, loading, or reducing
/// confounds. All variants are terminal: inputs are static files, so no
/// failure here is worth retrying.
#[derive(Debug, Error)]
pub enum ConfoundsError {
    /// An option value outside its documented range (variance ratio not in
    /// (0, 1), zero component count, empty strategy list, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A requested column is absent from the raw confounds table.
    #[error("column '{name}' not found in confounds table")]
    MissingColumn { name: String },

    /// A malformed cell or ragged row in a delimited confounds file.
    #[error("parse error in {}: row {row}, column '{column}': {message}", .path.display())]
    Parse {
        path: PathBuf,
        /// 1-based data row (the header is row 0).
        row: usize,
        column: String,
        message: String,
    },

    /// Underlying file I/O failure while opening or reading a table.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Motion reduction requested on too few complete rows, or a component
    /// target the available data cannot satisfy.
    #[error("insufficient data for motion reduction: {0}")]
    InsufficientData(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfoundsError>;
