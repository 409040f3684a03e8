//! Header schema for skillshot recordings.
//!
//! The first line of every recording names the per-frame measurement channels.
//! Its token count fixes the feature dimension `F` for the rest of the file;
//! the names themselves are carried along for reporting only.
//!
//! # Example
//!
//! ```
//! use skillshot_loader::schema::Header;
//!
//! let header = Header::from_line(1, "pos_x pos_y vel_x").unwrap();
//! assert_eq!(header.feature_count(), 3);
//! assert_eq!(header.index_of("vel_x"), Some(2));
//! ```

use crate::error::{LoaderError, Result};
use serde::{Deserialize, Serialize};

/// Number of leading channels that receive z-score scaling.
///
/// The trailing channels are bounded/categorical inputs (button flags and
/// similar) and are passed through unscaled.
pub const DEFAULT_SCALED_CHANNELS: usize = 7;

/// Smallest usable header width.
///
/// With a single column a measurement row would have exactly one token and
/// could not be told apart from a label line.
pub const MIN_FEATURE_COUNT: usize = 2;

/// Ordered feature names read from the header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Create a header from already-split names.
    pub fn new(names: Vec<String>) -> Result<Self> {
        let line = names.join(" ");
        Self::checked(1, &line, names)
    }

    /// Parse the header line.
    ///
    /// `line_no` is only used for error reporting.
    pub fn from_line(line_no: usize, line: &str) -> Result<Self> {
        let names = line.split_whitespace().map(str::to_string).collect();
        Self::checked(line_no, line, names)
    }

    fn checked(line_no: usize, line: &str, names: Vec<String>) -> Result<Self> {
        if names.len() < MIN_FEATURE_COUNT {
            return Err(LoaderError::format(
                line_no,
                line,
                format!(
                    "header must name at least {MIN_FEATURE_COUNT} features, found {}",
                    names.len()
                ),
            ));
        }
        Ok(Self { names })
    }

    /// Feature dimension `F`.
    #[inline]
    pub fn feature_count(&self) -> usize {
        self.names.len()
    }

    /// Feature names in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Column index of a feature name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Names of the channels that get scaled for a given channel budget.
    pub fn scaled_names(&self, channels: usize) -> &[String] {
        &self.names[..channels.min(self.names.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_from_line() {
        let header = Header::from_line(1, "  a\tb   c ").unwrap();
        assert_eq!(header.feature_count(), 3);
        assert_eq!(header.names(), &["a", "b", "c"]);
        assert_eq!(header.index_of("b"), Some(1));
        assert_eq!(header.index_of("z"), None);
    }

    #[test]
    fn test_single_column_header_rejected() {
        let err = Header::from_line(1, "only").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_empty_header_rejected() {
        assert!(Header::from_line(1, "   ").is_err());
        assert!(Header::new(Vec::new()).is_err());
    }

    #[test]
    fn test_scaled_names_clamped() {
        let header = Header::from_line(1, "a b c").unwrap();
        assert_eq!(header.scaled_names(DEFAULT_SCALED_CHANNELS).len(), 3);
        assert_eq!(header.scaled_names(2), &["a", "b"]);
    }
}
