//! Slide layout instructions.
//!
//! A [`Slide`] is a background color plus positioned shapes. Layout produces
//! these values; the writer only serializes them, so every geometry and color
//! decision is visible here before any XML exists.

use docugen_ast::RgbColor;

use crate::constants::{EMU_PER_INCH, EMU_PER_POINT};

/// Convert inches to EMU, rounding to the nearest unit
pub fn emu_from_inches(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    /// Frame from inch coordinates on the slide canvas
    pub fn inches(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x: emu_from_inches(x),
            y: emu_from_inches(y),
            cx: emu_from_inches(w),
            cy: emu_from_inches(h),
        }
    }
}

/// Vertical anchoring of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    /// DrawingML `anchor` attribute value
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        }
    }
}

/// Horizontal paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// DrawingML `algn` attribute value
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
            TextAlign::Right => "r",
        }
    }
}

/// Character formatting shared by every run of a text box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStyle {
    /// Font size in points
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub color: RgbColor,
    /// Font family
    pub typeface: String,
}

impl RunStyle {
    /// Plain run style
    pub fn new(size: u32, color: RgbColor, typeface: impl Into<String>) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color,
            typeface: typeface.into(),
        }
    }

    /// Set bold
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set italic
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Size in hundredths of a point (the DrawingML `sz` unit)
    pub fn size_hundredths(&self) -> u32 {
        self.size * 100
    }
}

/// One paragraph of a text box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextParagraph {
    pub text: String,
    /// Draw a bullet glyph before the text
    pub bullet: bool,
}

impl TextParagraph {
    /// Plain paragraph
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bullet: false,
        }
    }

    /// Bulleted paragraph
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bullet: true,
        }
    }
}

/// A positioned text box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    pub name: String,
    pub frame: Frame,
    /// Paragraphs in reading order (may be empty)
    pub paragraphs: Vec<TextParagraph>,
    pub style: RunStyle,
    pub align: TextAlign,
    pub anchor: Anchor,
}

/// A shape on a slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Filled rectangle without outline
    Rect {
        name: String,
        frame: Frame,
        fill: RgbColor,
    },
    /// Straight connector line
    Line {
        name: String,
        frame: Frame,
        color: RgbColor,
        /// Stroke width in points
        width: u32,
    },
    /// Text box
    Text(TextBox),
}

impl Shape {
    /// Shape name as shown in the selection pane
    pub fn name(&self) -> &str {
        match self {
            Shape::Rect { name, .. } | Shape::Line { name, .. } => name,
            Shape::Text(text) => &text.name,
        }
    }

    /// Stroke width in EMU, for lines
    pub fn line_width_emu(width: u32) -> i64 {
        i64::from(width) * EMU_PER_POINT
    }
}

/// A slide: a solid background and shapes in z-order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub background: RgbColor,
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Empty slide with a background
    pub fn new(background: RgbColor) -> Self {
        Self {
            background,
            shapes: Vec::new(),
        }
    }

    /// Append a shape
    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Paragraph texts in reading order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().flat_map(|shape| match shape {
            Shape::Text(text) => text.paragraphs.iter().map(|p| p.text.as_str()).collect(),
            _ => Vec::new(),
        })
    }

    /// Find a text box by name
    pub fn text_box(&self, name: &str) -> Option<&TextBox> {
        self.shapes.iter().find_map(|shape| match shape {
            Shape::Text(text) if text.name == name => Some(text),
            _ => None,
        })
    }
}
