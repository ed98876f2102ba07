//! # docugen-pptx
//!
//! PowerPoint deck rendering for docugen.
//!
//! A slides outline becomes a 16:9 deck: one title slide followed by one
//! content slide per outline item. [`DeckLayout`] decides geometry and colors,
//! [`PptxWriter`] serializes the resulting [`Slide`] values, and
//! [`DeckReader`] reads a package back.
//!
//! ## Example
//!
//! ```
//! use docugen_ast::{GeneratedData, SlideContent, ThemeCatalog};
//! use docugen_pptx::{render_slides, DeckReader};
//!
//! let catalog = ThemeCatalog::builtin();
//! let data = GeneratedData::slides("Q3 Plan", vec![SlideContent::new("Revenue", ["Up 12%"])]);
//!
//! let file = render_slides(&data, catalog.default_palette(), catalog.default_font())?;
//! assert_eq!(file.file_name, "Q3_Plan_Presentation.pptx");
//!
//! let deck = DeckReader::from_bytes(&file.bytes)?;
//! assert_eq!(deck.slide_count(), 2);
//! # Ok::<(), docugen_pptx::PptxError>(())
//! ```

pub mod error;
pub mod layout;
pub mod reader;
pub mod slide;
pub mod writer;

use tracing::info;

use docugen_ast::{ExportedFile, GeneratedData, OutputType, ThemeFont, ThemePalette};

// Re-exports
pub use error::{PptxError, Result};
pub use layout::{branding_caption, footer_text, DeckLayout, FALLBACK_SUBTITLE};
pub use reader::{DeckReader, ReadSlide};
pub use slide::{Anchor, Frame, RunStyle, Shape, Slide, TextAlign, TextBox, TextParagraph};
pub use writer::PptxWriter;

/// PPTX-related constants
pub mod constants {
    /// EMUs per inch
    pub const EMU_PER_INCH: i64 = 914_400;

    /// EMUs per point
    pub const EMU_PER_POINT: i64 = 12_700;

    /// 16:9 slide width in EMUs (10")
    pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;

    /// 16:9 slide height in EMUs (5.625")
    pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

    /// Notes page width in EMUs (7.5")
    pub const NOTES_WIDTH_EMU: i64 = 6_858_000;

    /// Notes page height in EMUs (10")
    pub const NOTES_HEIGHT_EMU: i64 = 9_144_000;

    /// PresentationML namespace
    pub const NS_PRESENTATION: &str =
        "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Content types namespace
    pub const NS_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";
}

/// Render a slides outline to a `.pptx` file
pub fn render_slides(
    data: &GeneratedData,
    palette: &ThemePalette,
    font: &ThemeFont,
) -> Result<ExportedFile> {
    render_slides_with(&PptxWriter::new(), data, palette, font)
}

/// Render a slides outline through a configured writer
pub fn render_slides_with(
    writer: &PptxWriter,
    data: &GeneratedData,
    palette: &ThemePalette,
    font: &ThemeFont,
) -> Result<ExportedFile> {
    let slides = DeckLayout::build(data, palette, font)?;
    let bytes = writer.generate(&data.title, &slides, palette, font)?;

    let file = ExportedFile::new(&data.title, OutputType::Slides, bytes);
    info!(
        file = %file.file_name,
        slides = slides.len(),
        bytes = file.bytes.len(),
        palette = %palette.id,
        font = %font.id,
        "Rendered deck"
    );
    Ok(file)
}
