//! Error types for PPTX rendering.

use docugen_ast::OutputType;
use docugen_ooxml::OoxmlError;
use thiserror::Error;

/// Result type for PPTX operations
pub type Result<T> = std::result::Result<T, PptxError>;

/// Errors that can occur while rendering or reading a deck
#[derive(Error, Debug)]
pub enum PptxError {
    /// The outline items are not slides
    #[error("Cannot render slides from a '{found}' outline")]
    ItemShapeMismatch { found: OutputType },

    /// The selected palette or font is unusable
    #[error("Invalid theme: {reason}")]
    InvalidTheme { reason: String },

    /// A package being read lacks a required part or reference
    #[error("Invalid package: {reason}")]
    InvalidPackage { reason: String },

    /// XML generation or parsing error
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// ZIP archive error
    #[error("Archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the shared package layer
    #[error("Package error: {0}")]
    Package(#[from] OoxmlError),
}

impl PptxError {
    /// Create an invalid theme error
    pub fn invalid_theme(reason: impl Into<String>) -> Self {
        Self::InvalidTheme {
            reason: reason.into(),
        }
    }

    /// Create an invalid package error
    pub fn invalid_package(reason: impl Into<String>) -> Self {
        Self::InvalidPackage {
            reason: reason.into(),
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::ItemShapeMismatch { .. } => "PPTX001",
            Self::InvalidTheme { .. } => "PPTX002",
            Self::InvalidPackage { .. } => "PPTX003",
            Self::XmlError(_) => "PPTX004",
            Self::ZipError(_) => "PPTX005",
            Self::IoError(_) => "PPTX006",
            Self::Package(_) => "PPTX007",
        }
    }
}
