//! Error types for OOXML operations

use docugen_ast::OutputType;
use thiserror::Error;

/// Errors that can occur during OOXML operations
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required file not found in archive
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid package structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// The outline items are not document sections
    #[error("Cannot render a document from a '{found}' outline")]
    ItemShapeMismatch { found: OutputType },

    /// The selected palette or font is unusable
    #[error("Invalid theme: {0}")]
    InvalidTheme(String),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OoxmlError::ItemShapeMismatch {
            found: OutputType::Slides,
        };
        assert!(err.to_string().contains("slides"));

        let err = OoxmlError::MissingFile("word/document.xml".to_string());
        assert!(err.to_string().contains("word/document.xml"));
    }
}
