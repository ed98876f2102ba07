//! Generation request parameters
//!
//! This module defines the values the user interface collects before a
//! synthesis call: the output kind, the tone and language hints, and the
//! target number of sections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest number of sections a request may ask for
pub const MIN_COUNT: u32 = 1;

/// Largest number of sections a request may ask for
pub const MAX_COUNT: u32 = 15;

/// Kind of file a generation request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputType {
    /// Slide deck (presentation package)
    #[default]
    #[serde(rename = "slides")]
    Slides,
    /// Word-processor document
    #[serde(rename = "document", alias = "word")]
    Document,
}

impl OutputType {
    /// Suffix appended to the file stem of an export
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Slides => "Presentation",
            Self::Document => "Document",
        }
    }

    /// File extension of an export (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Slides => "pptx",
            Self::Document => "docx",
        }
    }

    /// MIME type of an export
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Slides => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Document => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slides => write!(f, "slides"),
            Self::Document => write!(f, "document"),
        }
    }
}

impl FromStr for OutputType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slides" | "deck" | "pptx" => Ok(Self::Slides),
            "document" | "word" | "docx" => Ok(Self::Document),
            other => Err(ParseEnumError::new("output type", other)),
        }
    }
}

/// Register of the generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Academic,
    Simple,
    Business,
}

impl Tone {
    /// All tones in display order
    pub fn all() -> &'static [Tone] {
        &[Self::Professional, Self::Academic, Self::Simple, Self::Business]
    }

    /// Label used in briefs and document metadata
    pub fn label(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Academic => "Academic",
            Self::Simple => "Simple",
            Self::Business => "Business",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseEnumError::new("tone", s))
    }
}

/// Natural language of the generated text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Urdu,
}

impl Language {
    /// All languages in display order
    pub fn all() -> &'static [Language] {
        &[Self::English, Self::Urdu]
    }

    /// Label used in briefs
    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Urdu => "Urdu",
        }
    }

    /// BCP-47 tag written into `lang` attributes of exported text
    pub fn lang_tag(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Urdu => "ur-PK",
        }
    }

    /// Whether the language is written right-to-left
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Urdu)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|l| l.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseEnumError::new("language", s))
    }
}

/// Error returned when a textual enum value is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Rejected generation parameters, caught before any external call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The topic is empty or whitespace only
    #[error("Please enter a topic or instructions.")]
    EmptyPrompt,

    /// The section count lies outside the accepted range
    #[error("count must be between 1 and 15, got {count}")]
    CountOutOfRange { count: u32 },
}

/// Parameters of one generation request
///
/// Built by the user interface and treated as immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Topic or free-form instructions
    pub prompt: String,
    /// Kind of output to synthesize
    #[serde(rename = "type")]
    pub output_type: OutputType,
    /// Register of the text
    pub tone: Tone,
    /// Target number of slides or sections
    pub count: u32,
    /// Language of the text
    pub language: Language,
}

impl GenerationParams {
    /// Create validated parameters
    pub fn new(
        prompt: impl Into<String>,
        output_type: OutputType,
        tone: Tone,
        count: u32,
        language: Language,
    ) -> Result<Self, ValidationError> {
        let params = Self {
            prompt: prompt.into(),
            output_type,
            tone,
            count,
            language,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the parameters without consuming them
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        if !(MIN_COUNT..=MAX_COUNT).contains(&self.count) {
            return Err(ValidationError::CountOutOfRange { count: self.count });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_prompt_rejected() {
        let err = GenerationParams::new("   ", OutputType::Slides, Tone::Simple, 5, Language::English)
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyPrompt);
    }

    #[test]
    fn test_count_bounds() {
        for count in [0, 16] {
            let err = GenerationParams::new(
                "Topic",
                OutputType::Document,
                Tone::Academic,
                count,
                Language::English,
            )
            .unwrap_err();
            assert_eq!(err, ValidationError::CountOutOfRange { count });
        }

        for count in [MIN_COUNT, MAX_COUNT] {
            assert!(GenerationParams::new(
                "Topic",
                OutputType::Document,
                Tone::Academic,
                count,
                Language::English,
            )
            .is_ok());
        }
    }

    #[test]
    fn test_output_type_wire_names() {
        assert_eq!(serde_json::to_string(&OutputType::Slides).unwrap(), "\"slides\"");
        assert_eq!(
            serde_json::from_str::<OutputType>("\"word\"").unwrap(),
            OutputType::Document
        );
        assert_eq!("DOCX".parse::<OutputType>().unwrap(), OutputType::Document);
        assert!("spreadsheet".parse::<OutputType>().is_err());
    }

    #[test]
    fn test_tone_and_language_parsing() {
        assert_eq!("business".parse::<Tone>().unwrap(), Tone::Business);
        assert_eq!("URDU".parse::<Language>().unwrap(), Language::Urdu);
        assert!(Language::Urdu.is_rtl());
        assert!(!Language::English.is_rtl());

        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn test_export_naming_parts() {
        assert_eq!(OutputType::Slides.file_suffix(), "Presentation");
        assert_eq!(OutputType::Document.extension(), "docx");
        assert!(OutputType::Slides.content_type().contains("presentationml"));
    }
}
