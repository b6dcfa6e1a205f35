//! Extraction options and configuration.

use super::stream::StreamConfig;

/// Options for extracting tables from a document.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-page failures
    pub error_mode: ErrorMode,

    /// Stream detector tuning
    pub stream: StreamConfig,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort extraction on the first page that fails instead of skipping it.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip pages that fail and keep going (the default).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set stream detector configuration.
    pub fn with_stream_config(mut self, stream: StreamConfig) -> Self {
        self.stream = stream;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            stream: StreamConfig::default(),
        }
    }
}

/// Error handling mode for per-page extraction failures.
///
/// A page that fails in lenient mode contributes zero tables; the rest of
/// the document is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Skip failing pages and continue
    #[default]
    Lenient,
    /// Fail the whole extraction on any page error
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.stream.min_rows, 2);
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new().strict();
        assert_eq!(options.error_mode, ErrorMode::Strict);

        let options = options.lenient();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
    }
}
