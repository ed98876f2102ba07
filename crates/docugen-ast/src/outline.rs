//! Outline model definitions
//!
//! The outline is the normalized result of a synthesis call: a title, an
//! optional subtitle and an ordered list of items whose shape depends on the
//! output type. Both renderers consume it read-only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::OutputType;

/// One content slide: a heading and its bullet points
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlideContent {
    /// Slide heading
    pub title: String,
    /// Bullet points in reading order (may be empty)
    pub points: Vec<String>,
}

impl SlideContent {
    /// Create a slide item
    pub fn new<I, S>(title: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            points: points.into_iter().map(Into::into).collect(),
        }
    }
}

/// One document section: a heading and its paragraphs
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Section heading
    pub heading: String,
    /// Body paragraphs in document order (may be empty)
    pub paragraphs: Vec<String>,
}

impl DocumentSection {
    /// Create a document section
    pub fn new<I, S>(heading: impl Into<String>, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            heading: heading.into(),
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Homogeneous outline items, tagged by output type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineItems {
    /// Content slides of a deck
    Slides(Vec<SlideContent>),
    /// Sections of a document
    Document(Vec<DocumentSection>),
}

impl OutlineItems {
    /// Empty item list for an output type
    pub fn empty(output_type: OutputType) -> Self {
        match output_type {
            OutputType::Slides => Self::Slides(Vec::new()),
            OutputType::Document => Self::Document(Vec::new()),
        }
    }

    /// Output type the items belong to
    pub fn output_type(&self) -> OutputType {
        match self {
            Self::Slides(_) => OutputType::Slides,
            Self::Document(_) => OutputType::Document,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        match self {
            Self::Slides(items) => items.len(),
            Self::Document(items) => items.len(),
        }
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outline shape problems detected while decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    /// The items do not have the shape required by the declared type
    #[error("outline declares type '{declared}' but its items are {found} items")]
    ShapeMismatch {
        declared: OutputType,
        found: OutputType,
    },
}

/// The generated outline (title, optional subtitle, typed items)
///
/// The output type is not stored separately: it is the tag of [`OutlineItems`],
/// so an outline with mixed item shapes cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OutlineWire", into = "OutlineWire")]
pub struct GeneratedData {
    /// Deck or document title
    pub title: String,
    /// Optional subtitle (decks only use it)
    pub subtitle: Option<String>,
    /// Ordered items
    pub items: OutlineItems,
}

impl GeneratedData {
    /// Create a deck outline
    pub fn slides(title: impl Into<String>, items: Vec<SlideContent>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            items: OutlineItems::Slides(items),
        }
    }

    /// Create a document outline
    pub fn document(title: impl Into<String>, items: Vec<DocumentSection>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            items: OutlineItems::Document(items),
        }
    }

    /// Set the subtitle
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Output type, derived from the item tag
    pub fn output_type(&self) -> OutputType {
        self.items.output_type()
    }

    /// Subtitle, treating a blank string as absent
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Slide items, if this is a deck outline
    pub fn slide_items(&self) -> Option<&[SlideContent]> {
        match &self.items {
            OutlineItems::Slides(items) => Some(items),
            OutlineItems::Document(_) => None,
        }
    }

    /// Section items, if this is a document outline
    pub fn section_items(&self) -> Option<&[DocumentSection]> {
        match &self.items {
            OutlineItems::Document(items) => Some(items),
            OutlineItems::Slides(_) => None,
        }
    }
}

/// JSON shape of an outline: `{"title", "subtitle"?, "type", "items"}`
#[derive(Serialize, Deserialize)]
struct OutlineWire {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(rename = "type")]
    output_type: OutputType,
    items: WireItems,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireItems {
    Slides(Vec<SlideContent>),
    Document(Vec<DocumentSection>),
}

impl TryFrom<OutlineWire> for GeneratedData {
    type Error = OutlineError;

    fn try_from(wire: OutlineWire) -> Result<Self, Self::Error> {
        // An empty array decodes as the first variant; it fits either type.
        let items = match (wire.output_type, wire.items) {
            (OutputType::Slides, WireItems::Slides(items)) => OutlineItems::Slides(items),
            (OutputType::Document, WireItems::Document(items)) => OutlineItems::Document(items),
            (declared, WireItems::Slides(items)) if items.is_empty() => {
                OutlineItems::empty(declared)
            }
            (declared, WireItems::Slides(_)) => {
                return Err(OutlineError::ShapeMismatch {
                    declared,
                    found: OutputType::Slides,
                })
            }
            (declared, WireItems::Document(_)) => {
                return Err(OutlineError::ShapeMismatch {
                    declared,
                    found: OutputType::Document,
                })
            }
        };

        Ok(Self {
            title: wire.title,
            subtitle: wire.subtitle,
            items,
        })
    }
}

impl From<GeneratedData> for OutlineWire {
    fn from(data: GeneratedData) -> Self {
        let output_type = data.output_type();
        let items = match data.items {
            OutlineItems::Slides(items) => WireItems::Slides(items),
            OutlineItems::Document(items) => WireItems::Document(items),
        };
        Self {
            title: data.title,
            subtitle: data.subtitle,
            output_type,
            items,
        }
    }
}
