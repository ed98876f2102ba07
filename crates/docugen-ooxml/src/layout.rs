//! Document layout: outline + theme to an ordered list of blocks
//!
//! Layout is a pure function of the outline, the palette, the font and the
//! issue date. Only colors and the font family vary with the theme; sizes,
//! spacing and margins are fixed.

use chrono::NaiveDate;
use tracing::debug;

use docugen_ast::{neutral, DocumentSection, GeneratedData, RgbColor, ThemeFont, ThemePalette};

use crate::error::{OoxmlError, Result};

/// Brand mark printed at the top of the cover
pub const BRAND_MARK: &str = "DG.";

/// Fixed line under the cover title
pub const COVER_TAGLINE: &str = "STRATEGIC ANALYSIS & DOCUMENTATION";

/// Paragraph style id of section headings
pub const HEADING_STYLE: &str = "Heading1";

/// Paragraph alignment (`w:jc`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Justify,
}

impl Alignment {
    /// Value of the `w:jc` element
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Justify => "both",
        }
    }

    /// Parse a `w:jc` value, treating unknown values as left
    pub fn from_ooxml(value: &str) -> Self {
        match value {
            "center" => Alignment::Center,
            "both" | "distribute" => Alignment::Justify,
            _ => Alignment::Left,
        }
    }
}

/// A bottom border drawn under a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomBorder {
    /// Line color
    pub color: RgbColor,
    /// Width in eighths of a point
    pub size: u32,
    /// Distance from the text in points
    pub space: u32,
}

/// One paragraph with a single formatted run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphSpec {
    pub text: String,
    /// Paragraph style id, if any
    pub style: Option<&'static str>,
    pub alignment: Alignment,
    /// Font size in half-points
    pub size: u32,
    pub bold: bool,
    pub color: RgbColor,
    /// Spacing before, in twips
    pub before: u32,
    /// Spacing after, in twips
    pub after: u32,
    /// Line spacing in 240ths of a line (`auto` rule)
    pub line: Option<u32>,
    /// Character spacing in twips
    pub character_spacing: Option<i32>,
    pub bottom_border: Option<BottomBorder>,
}

impl ParagraphSpec {
    fn new(text: impl Into<String>, size: u32, color: RgbColor) -> Self {
        Self {
            text: text.into(),
            style: None,
            alignment: Alignment::Left,
            size,
            bold: false,
            color,
            before: 0,
            after: 0,
            line: None,
            character_spacing: None,
            bottom_border: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn spacing(mut self, before: u32, after: u32) -> Self {
        self.before = before;
        self.after = after;
        self
    }
}

/// A layout block in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    Paragraph(ParagraphSpec),
    /// A paragraph holding only a hard page break
    PageBreak,
}

/// Document layout builder
pub struct DocumentLayout;

impl DocumentLayout {
    /// Lay out a document outline
    ///
    /// The cover always fills exactly one page: it ends with a page break
    /// even when there are no sections after it.
    pub fn build(
        data: &GeneratedData,
        palette: &ThemePalette,
        font: &ThemeFont,
        issued_on: NaiveDate,
    ) -> Result<Vec<DocBlock>> {
        let sections = data
            .section_items()
            .ok_or(OoxmlError::ItemShapeMismatch {
                found: data.output_type(),
            })?;
        check_theme(palette, font)?;

        let mut blocks = cover_blocks(&data.title, palette, issued_on);
        for (index, section) in sections.iter().enumerate() {
            blocks.extend(section_blocks(index, section, palette));
        }

        debug!(
            sections = sections.len(),
            blocks = blocks.len(),
            palette = %palette.id,
            font = %font.family,
            "Laid out document"
        );
        Ok(blocks)
    }
}

/// The one check renderers make on a theme: usable ids and a font family
pub fn check_theme(palette: &ThemePalette, font: &ThemeFont) -> Result<()> {
    if palette.id.trim().is_empty() {
        return Err(OoxmlError::InvalidTheme("palette id is empty".to_string()));
    }
    if font.id.trim().is_empty() {
        return Err(OoxmlError::InvalidTheme("font id is empty".to_string()));
    }
    if font.family.trim().is_empty() {
        return Err(OoxmlError::InvalidTheme(format!(
            "font '{}' has an empty family",
            font.id
        )));
    }
    Ok(())
}

/// Long US date used on the cover, e.g. `March 5, 2025`
pub fn format_issue_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn cover_blocks(title: &str, palette: &ThemePalette, issued_on: NaiveDate) -> Vec<DocBlock> {
    let brand = ParagraphSpec::new(BRAND_MARK, 48, palette.primary.clone())
        .bold()
        .spacing(0, 1200);

    let title = ParagraphSpec::new(title, 72, palette.dark.clone())
        .bold()
        .align(Alignment::Center)
        .spacing(1000, 400);

    let mut tagline = ParagraphSpec::new(COVER_TAGLINE, 24, palette.primary.clone())
        .bold()
        .align(Alignment::Center)
        .spacing(0, 2000);
    tagline.character_spacing = Some(2);

    let issued = ParagraphSpec::new(
        format!("Issued on: {}", format_issue_date(issued_on)),
        24,
        neutral::caption(),
    )
    .align(Alignment::Center);

    vec![
        DocBlock::Paragraph(brand),
        DocBlock::Paragraph(title),
        DocBlock::Paragraph(tagline),
        DocBlock::Paragraph(issued),
        DocBlock::PageBreak,
    ]
}

fn section_blocks(index: usize, section: &DocumentSection, palette: &ThemePalette) -> Vec<DocBlock> {
    let mut heading = ParagraphSpec::new(
        format!("SECTION {}: {}", index + 1, section.heading.to_uppercase()),
        28,
        palette.primary.clone(),
    )
    .bold()
    .spacing(600, 400);
    heading.style = Some(HEADING_STYLE);
    heading.bottom_border = Some(BottomBorder {
        color: palette.primary.clone(),
        size: 6,
        space: 1,
    });

    let mut blocks = vec![DocBlock::Paragraph(heading)];
    for text in &section.paragraphs {
        let mut paragraph = ParagraphSpec::new(text.as_str(), 24, neutral::body_text())
            .align(Alignment::Justify)
            .spacing(0, 250);
        paragraph.line = Some(360);
        blocks.push(DocBlock::Paragraph(paragraph));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use docugen_ast::ThemeCatalog;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn paragraphs(blocks: &[DocBlock]) -> Vec<&ParagraphSpec> {
        blocks
            .iter()
            .filter_map(|b| match b {
                DocBlock::Paragraph(p) => Some(p),
                DocBlock::PageBreak => None,
            })
            .collect()
    }

    #[test]
    fn test_cover_only_for_empty_outline() {
        let catalog = ThemeCatalog::builtin();
        let data = GeneratedData::document("Report", vec![]);

        let blocks = DocumentLayout::build(
            &data,
            catalog.default_palette(),
            catalog.default_font(),
            date(),
        )
        .unwrap();

        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks.last(), Some(&DocBlock::PageBreak));

        let texts: Vec<_> = paragraphs(&blocks).iter().map(|p| p.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["DG.", "Report", COVER_TAGLINE, "Issued on: March 5, 2025"]
        );
    }

    #[test]
    fn test_section_heading_and_paragraphs() {
        let catalog = ThemeCatalog::builtin();
        let palette = catalog.default_palette();
        let data = GeneratedData::document(
            "Report",
            vec![DocumentSection::new("Intro", ["A.", "B."])],
        );

        let blocks = DocumentLayout::build(&data, palette, catalog.default_font(), date()).unwrap();
        let body = &paragraphs(&blocks)[4..];

        assert_eq!(body[0].text, "SECTION 1: INTRO");
        assert_eq!(body[0].style, Some(HEADING_STYLE));
        assert_eq!(body[0].color, palette.primary);
        assert_eq!(
            body[0].bottom_border.as_ref().map(|b| &b.color),
            Some(&palette.primary)
        );

        assert_eq!(body[1].text, "A.");
        assert_eq!(body[2].text, "B.");
        for p in &body[1..] {
            assert_eq!(p.alignment, Alignment::Justify);
            assert_eq!(p.line, Some(360));
            assert_eq!(p.size, 24);
        }
    }

    #[test]
    fn test_slides_outline_rejected() {
        let catalog = ThemeCatalog::builtin();
        let data = GeneratedData::slides("Deck", vec![]);

        let result = DocumentLayout::build(
            &data,
            catalog.default_palette(),
            catalog.default_font(),
            date(),
        );
        assert!(matches!(result, Err(OoxmlError::ItemShapeMismatch { .. })));
    }

    #[test]
    fn test_empty_font_family_rejected() {
        let catalog = ThemeCatalog::builtin();
        let mut font = catalog.default_font().clone();
        font.family = "  ".to_string();

        let data = GeneratedData::document("Report", vec![]);
        let result = DocumentLayout::build(&data, catalog.default_palette(), &font, date());
        assert!(matches!(result, Err(OoxmlError::InvalidTheme(_))));
    }

    #[test]
    fn test_palette_only_changes_colors() {
        let catalog = ThemeCatalog::builtin();
        let data = GeneratedData::document(
            "Report",
            vec![DocumentSection::new("Intro", ["A."])],
        );
        let font = catalog.default_font();

        let indigo = DocumentLayout::build(&data, catalog.palette("indigo").unwrap(), font, date())
            .unwrap();
        let ruby =
            DocumentLayout::build(&data, catalog.palette("ruby").unwrap(), font, date()).unwrap();

        let text = |blocks: &[DocBlock]| -> Vec<String> {
            paragraphs(blocks).iter().map(|p| p.text.clone()).collect()
        };
        assert_eq!(text(&indigo), text(&ruby));
        assert_ne!(indigo, ruby);
    }

    #[test]
    fn test_issue_date_format() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(format_issue_date(date), "December 25, 2024");
    }
}
