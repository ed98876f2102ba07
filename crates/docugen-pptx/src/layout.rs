//! Deck layout: outline + theme to slides.
//!
//! One pass over the outline items. Slide 0 is the title slide, slide `i`
//! (1-based) shows `items[i - 1]`. Only colors and the typeface depend on
//! the theme; geometry is fixed on a 10 x 5.625 inch canvas.

use tracing::debug;

use docugen_ast::{neutral, GeneratedData, SlideContent, ThemeFont, ThemePalette, PRODUCT_NAME};
use docugen_ooxml::OoxmlError;

use crate::error::{PptxError, Result};
use crate::slide::{Anchor, Frame, RunStyle, Shape, Slide, TextAlign, TextBox, TextParagraph};

/// Subtitle shown when the outline has none
pub const FALLBACK_SUBTITLE: &str = "Generated Strategic Presentation";

/// Branding caption at the bottom of the title slide
pub fn branding_caption() -> String {
    format!("{} • Strategic Deck", PRODUCT_NAME)
}

/// Footer line of every content slide
pub fn footer_text(title: &str) -> String {
    format!("{} | {}", PRODUCT_NAME, title)
}

/// Deck layout builder
pub struct DeckLayout;

impl DeckLayout {
    /// Lay out a deck outline: one title slide plus one slide per item
    pub fn build(data: &GeneratedData, palette: &ThemePalette, font: &ThemeFont) -> Result<Vec<Slide>> {
        let items = data.slide_items().ok_or(PptxError::ItemShapeMismatch {
            found: data.output_type(),
        })?;
        check_theme(palette, font)?;

        let mut slides = Vec::with_capacity(items.len() + 1);
        slides.push(title_slide(data, palette, font));
        for (index, item) in items.iter().enumerate() {
            slides.push(content_slide(index, item, &data.title, palette, font));
        }

        debug!(
            slides = slides.len(),
            palette = %palette.id,
            font = %font.family,
            "Laid out deck"
        );
        Ok(slides)
    }
}

/// Theme check shared with the document renderer, reported as a deck error
fn check_theme(palette: &ThemePalette, font: &ThemeFont) -> Result<()> {
    docugen_ooxml::check_theme(palette, font).map_err(|err| match err {
        OoxmlError::InvalidTheme(reason) => PptxError::invalid_theme(reason),
        other => PptxError::Package(other),
    })
}

fn text_box(
    name: &str,
    frame: Frame,
    paragraphs: Vec<TextParagraph>,
    style: RunStyle,
    align: TextAlign,
    anchor: Anchor,
) -> Shape {
    Shape::Text(TextBox {
        name: name.to_string(),
        frame,
        paragraphs,
        style,
        align,
        anchor,
    })
}

fn title_slide(data: &GeneratedData, palette: &ThemePalette, font: &ThemeFont) -> Slide {
    let family = font.family.as_str();
    let mut slide = Slide::new(palette.dark.clone());

    slide.push(Shape::Rect {
        name: "Accent Bar".to_string(),
        frame: Frame::inches(0.0, 0.0, 10.0, 0.1),
        fill: palette.accent.clone(),
    });

    slide.push(text_box(
        "Title",
        Frame::inches(0.5, 1.5, 9.0, 1.5),
        vec![TextParagraph::plain(data.title.to_uppercase())],
        RunStyle::new(48, palette.light.clone(), family).bold(),
        TextAlign::Center,
        Anchor::Middle,
    ));

    let subtitle = data.subtitle().unwrap_or(FALLBACK_SUBTITLE);
    slide.push(text_box(
        "Subtitle",
        Frame::inches(1.0, 3.5, 8.0, 0.8),
        vec![TextParagraph::plain(subtitle)],
        RunStyle::new(24, palette.accent.clone(), family).italic(),
        TextAlign::Center,
        Anchor::Middle,
    ));

    slide.push(text_box(
        "Branding",
        Frame::inches(1.0, 5.0, 8.0, 0.4),
        vec![TextParagraph::plain(branding_caption())],
        RunStyle::new(12, neutral::caption(), family).bold(),
        TextAlign::Center,
        Anchor::Middle,
    ));

    slide
}

fn content_slide(
    index: usize,
    item: &SlideContent,
    deck_title: &str,
    palette: &ThemePalette,
    font: &ThemeFont,
) -> Slide {
    let family = font.family.as_str();
    let mut slide = Slide::new(neutral::white());

    slide.push(Shape::Rect {
        name: "Side Bar".to_string(),
        frame: Frame::inches(0.0, 0.0, 0.15, 5.625),
        fill: palette.primary.clone(),
    });

    slide.push(text_box(
        "Slide Number",
        Frame::inches(8.5, 0.3, 1.0, 0.8),
        vec![TextParagraph::plain(format!("{:02}", index + 1))],
        RunStyle::new(40, neutral::watermark(), family).bold(),
        TextAlign::Right,
        Anchor::Middle,
    ));

    slide.push(text_box(
        "Heading",
        Frame::inches(0.5, 0.4, 8.0, 0.7),
        vec![TextParagraph::plain(item.title.as_str())],
        RunStyle::new(32, palette.dark.clone(), family).bold(),
        TextAlign::Left,
        Anchor::Middle,
    ));

    slide.push(Shape::Line {
        name: "Divider".to_string(),
        frame: Frame::inches(0.5, 1.1, 4.0, 0.0),
        color: palette.primary.clone(),
        width: 2,
    });

    slide.push(text_box(
        "Bullets",
        Frame::inches(0.5, 1.6, 9.0, 3.5),
        item.points.iter().map(TextParagraph::bullet).collect(),
        RunStyle::new(20, neutral::body_text(), family),
        TextAlign::Left,
        Anchor::Top,
    ));

    slide.push(text_box(
        "Footer",
        Frame::inches(0.5, 5.2, 9.0, 0.3),
        vec![TextParagraph::plain(footer_text(deck_title))],
        RunStyle::new(10, neutral::muted(), family).bold(),
        TextAlign::Left,
        Anchor::Middle,
    ));

    slide
}
