//! Error types for file store operations.

use taskline_core::task::RecordError;
use thiserror::Error;

/// Errors that can occur during `FileStore` operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A recognized record on the given 1-based line could not be
    /// decoded.
    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        /// 1-based line number in the data file.
        line: usize,
        /// The decode failure.
        #[source]
        source: RecordError,
    },

    /// A rewrite targeted a line the file does not have.
    #[error("No record at line {0}")]
    MissingLine(usize),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
