//! Error types for dataset loading.
//!
//! Every failure is fatal: a malformed line or an unexpected label aborts the
//! load instead of being skipped, so the label vector and the tensor can never
//! drift out of alignment.

use thiserror::Error;

/// Errors produced while loading, assembling or partitioning a dataset.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The input text does not follow the block grammar.
    #[error("Format error at line {line}: {reason} (content: {content:?})")]
    Format {
        /// 1-based line number, counting the header line
        line: usize,
        /// The offending line as it appeared in the file
        content: String,
        /// What was wrong with it
        reason: String,
    },

    /// The parsed data violates a dataset invariant.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LoaderError {
    /// Build a [`LoaderError::Format`] for the given line.
    pub fn format(line: usize, content: &str, reason: impl Into<String>) -> Self {
        LoaderError::Format {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this is a parse failure.
    pub fn is_format(&self) -> bool {
        matches!(self, LoaderError::Format { .. })
    }

    /// Whether this is an integrity failure.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, LoaderError::DataIntegrity(_))
    }
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = LoaderError::format(4, "1.0 2.0 3.0", "expected 2 tokens, found 3");
        let msg = format!("{err}");
        assert!(msg.contains("line 4"));
        assert!(msg.contains("expected 2 tokens"));
        assert!(msg.contains("1.0 2.0 3.0"));
        assert!(err.is_format());
        assert!(!err.is_data_integrity());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
        let err: LoaderError = io.into();
        assert!(matches!(err, LoaderError::Io(_)));
        assert!(format!("{err}").contains("missing.txt"));
    }
}
