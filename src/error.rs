use thiserror::Error;

/// Result type alias for DMS operations
pub type Result<T> = std::result::Result<T, DmsError>;

/// Errors that can occur when working with DMS archives
#[derive(Debug, Error)]
pub enum DmsError {
    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unrecognized archive format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Parse error at specific offset
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where error occurred
        offset: usize,
        /// Error message
        message: String,
    },

    /// Data integrity error
    #[error("Data integrity error: {0}")]
    IntegrityError(String),

    /// Compression mode not implemented by this library
    #[error("Unsupported compression mode: {mode}")]
    UnsupportedCompression {
        /// Raw compression mode value from the archive
        mode: u8,
    },
}

impl DmsError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(offset: usize, message: S) -> Self {
        DmsError::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        DmsError::InvalidFormat(message.into())
    }

    /// Create an integrity error
    pub fn integrity<S: Into<String>>(message: S) -> Self {
        DmsError::IntegrityError(message.into())
    }
}
