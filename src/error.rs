use thiserror::Error;

/// Caller-facing failure kinds of a conversion run.
///
/// Only [`ConversionError::Cancelled`] is an expected outcome; every other
/// variant aborts the run and discards any pages already reconstructed.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Conversion cancelled")]
    Cancelled,

    #[error(
        "Document has {requested} pages but OCR is limited to {allowed}; use text extraction instead"
    )]
    PageLimitExceeded { requested: usize, allowed: usize },

    #[error("OCR engine failed to start: {0}")]
    EngineInitFailure(String),

    #[error("Text recognition failed on page {page}: {reason}")]
    PageRecognitionFailure { page: usize, reason: String },

    #[error("Rendering failed on page {page}: {reason}")]
    PageRenderFailure { page: usize, reason: String },

    #[error("Invalid or unreadable PDF: {0}")]
    SourceMalformed(String),

    #[error("Failed to build document: {0}")]
    AssemblyFailure(String),
}

impl ConversionError {
    /// True for a user-requested stop, which callers should not report as an error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConversionError::Cancelled)
    }

    /// Page number the failure is attached to, if any.
    pub fn page(&self) -> Option<usize> {
        match self {
            ConversionError::PageRecognitionFailure { page, .. }
            | ConversionError::PageRenderFailure { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// Errors raised while loading a [`crate::ConversionConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ConversionError>;
