//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A request field was missing or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The configuration could not be loaded or is incomplete.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The content generator call failed.
    #[error("Content generation failed: {0}")]
    GenerationError(String),

    /// The theme template could not be loaded or is malformed.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// The template has no slide layout at the requested index.
    #[error("Template has no slide layout at index {0}")]
    LayoutMissing(usize),

    /// A slide has no placeholder of the requested kind.
    #[error("Slide has no {0} placeholder")]
    PlaceholderMissing(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// An image could not be inserted into a slide.
    #[error("Image error: {0}")]
    ImageError(String),
}

impl Error {
    /// Whether the error stems from caller input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
