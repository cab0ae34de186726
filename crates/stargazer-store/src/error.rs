//! Error types for the storage layer.

/// Errors that can occur while reading or writing a save slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O error on slot {key}: {source}")]
    Io {
        /// The slot being accessed.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The slot key is empty or contains characters that cannot be used
    /// as a file name.
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),
}
