//! # docugen-ooxml
//!
//! OOXML package plumbing and the DOCX document renderer.
//!
//! The crate provides:
//! - [`OoxmlArchive`]: in-memory ZIP packages with deterministic part order
//! - [`Relationships`]: `.rels` parts shared with the PPTX renderer
//! - [`DocumentLayout`] and [`DocxWriter`]: outline + theme to a `.docx`
//! - [`DocumentReader`]: reads exported packages back
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use docugen_ast::{DocumentSection, GeneratedData, ThemeCatalog};
//! use docugen_ooxml::render_document_on;
//!
//! let catalog = ThemeCatalog::builtin();
//! let data = GeneratedData::document("Report", vec![DocumentSection::new("Intro", ["A."])]);
//! let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
//!
//! let file = render_document_on(&data, catalog.default_palette(), catalog.default_font(), date)?;
//! assert_eq!(file.file_name, "Report_Document.docx");
//! # Ok::<(), docugen_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod error;
pub mod layout;
pub mod reader;
pub mod relationships;
pub mod writer;
pub mod xml;

use chrono::{Local, NaiveDate};
use tracing::info;

use docugen_ast::{ExportedFile, GeneratedData, OutputType, ThemeFont, ThemePalette};

// Re-exports
pub use archive::{OoxmlArchive, CONTENT_TYPES_PATH};
pub use error::{OoxmlError, Result};
pub use layout::{check_theme, format_issue_date, Alignment, DocBlock, DocumentLayout, ParagraphSpec};
pub use reader::{core_title, DocumentReader, ReadParagraph, CORE_PROPERTIES_PATH};
pub use relationships::{resolve_target, Relationships};
pub use writer::DocxWriter;
pub use xml::escape_xml;

/// DOCX-related constants
pub mod constants {
    /// Twips per inch
    pub const TWIPS_PER_INCH: u32 = 1_440;

    /// US Letter width in twips (8.5")
    pub const PAGE_WIDTH_TWIPS: u32 = 12_240;

    /// US Letter height in twips (11")
    pub const PAGE_HEIGHT_TWIPS: u32 = 15_840;

    /// One-inch margin on every side
    pub const PAGE_MARGIN_TWIPS: u32 = TWIPS_PER_INCH;

    /// WordprocessingML namespace
    pub const NS_WORDPROCESSING: &str =
        "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
}

/// Render a document outline, dating the cover today
pub fn render_document(
    data: &GeneratedData,
    palette: &ThemePalette,
    font: &ThemeFont,
) -> Result<ExportedFile> {
    render_document_on(data, palette, font, Local::now().date_naive())
}

/// Render a document outline with an explicit cover date
pub fn render_document_on(
    data: &GeneratedData,
    palette: &ThemePalette,
    font: &ThemeFont,
    issued_on: NaiveDate,
) -> Result<ExportedFile> {
    render_document_with(DocxWriter::new(), data, palette, font, issued_on)
}

/// Render a document outline through a configured writer
///
/// Use this to carry the tone or language into the package properties.
pub fn render_document_with(
    writer: DocxWriter,
    data: &GeneratedData,
    palette: &ThemePalette,
    font: &ThemeFont,
    issued_on: NaiveDate,
) -> Result<ExportedFile> {
    let blocks = DocumentLayout::build(data, palette, font, issued_on)?;
    let bytes = writer.generate(&data.title, &blocks, font)?;

    let file = ExportedFile::new(&data.title, OutputType::Document, bytes);
    info!(
        file = %file.file_name,
        bytes = file.bytes.len(),
        palette = %palette.id,
        font = %font.id,
        "Rendered document"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_constants() {
        assert_eq!(constants::PAGE_WIDTH_TWIPS, 17 * constants::TWIPS_PER_INCH / 2);
        assert_eq!(constants::PAGE_HEIGHT_TWIPS, 11 * constants::TWIPS_PER_INCH);
        assert_eq!(constants::PAGE_MARGIN_TWIPS, 1_440);
    }
}
