//! Reading exported DOCX packages back
//!
//! The reader recovers paragraph text, alignment, heading style and page
//! breaks from `word/document.xml`. It is what the round-trip tests and the
//! `inspect` command use to prove that nothing was lost in serialization.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};
use crate::layout::{Alignment, HEADING_STYLE};
use crate::relationships::Relationships;
use crate::xml::local_attr;

/// Core properties part written by both renderers
pub const CORE_PROPERTIES_PATH: &str = "docProps/core.xml";

/// A paragraph recovered from a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadParagraph {
    /// Concatenated run text
    pub text: String,
    /// Paragraph style id
    pub style: Option<String>,
    pub alignment: Alignment,
    /// First run color
    pub color: Option<String>,
    /// First run font family
    pub font: Option<String>,
    /// The paragraph holds a hard page break
    pub page_break: bool,
}

impl ReadParagraph {
    fn empty() -> Self {
        Self {
            text: String::new(),
            style: None,
            alignment: Alignment::Left,
            color: None,
            font: None,
            page_break: false,
        }
    }

    /// Whether the paragraph is a section heading
    pub fn is_heading(&self) -> bool {
        self.style.as_deref() == Some(HEADING_STYLE)
    }
}

/// Parsed view of a DOCX package
#[derive(Debug, Clone)]
pub struct DocumentReader {
    title: Option<String>,
    paragraphs: Vec<ReadParagraph>,
}

impl DocumentReader {
    /// Open a package on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(&OoxmlArchive::open(path)?)
    }

    /// Read a package held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(&OoxmlArchive::from_bytes(bytes)?)
    }

    /// Read an unpacked package
    pub fn from_archive(archive: &OoxmlArchive) -> Result<Self> {
        let root = Relationships::parse(archive.require("_rels/.rels")?)?;
        let document_path = root
            .find_by_type(Relationships::TYPE_OFFICE_DOCUMENT)
            .map(|target| target.trim_start_matches('/').to_string())
            .ok_or_else(|| {
                OoxmlError::InvalidStructure("package has no main document".to_string())
            })?;

        let paragraphs = parse_paragraphs(archive.require(&document_path)?)?;
        let title = core_title(archive)?;

        Ok(Self { title, paragraphs })
    }

    /// Title from the core properties
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// All paragraphs in document order
    pub fn paragraphs(&self) -> &[ReadParagraph] {
        &self.paragraphs
    }

    /// Paragraphs that carry text
    pub fn text_paragraphs(&self) -> impl Iterator<Item = &ReadParagraph> {
        self.paragraphs.iter().filter(|p| !p.text.is_empty())
    }

    /// Section headings in document order
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.paragraphs
            .iter()
            .filter(|p| p.is_heading())
            .map(|p| p.text.as_str())
    }

    /// Number of hard page breaks
    pub fn page_breaks(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.page_break).count()
    }
}

fn parse_paragraphs(xml: &[u8]) -> Result<Vec<ReadParagraph>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current: Option<ReadParagraph> = None;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"p" => {
                        if let Some(done) = current.replace(ReadParagraph::empty()) {
                            paragraphs.push(done);
                        }
                    }
                    b"t" => in_text = true,
                    b"pStyle" => {
                        if let Some(p) = current.as_mut() {
                            p.style = local_attr(e, b"val");
                        }
                    }
                    b"jc" => {
                        if let (Some(p), Some(value)) = (current.as_mut(), local_attr(e, b"val")) {
                            p.alignment = Alignment::from_ooxml(&value);
                        }
                    }
                    b"color" => {
                        if let Some(p) = current.as_mut().filter(|p| p.color.is_none()) {
                            p.color = local_attr(e, b"val");
                        }
                    }
                    b"rFonts" => {
                        if let Some(p) = current.as_mut().filter(|p| p.font.is_none()) {
                            p.font = local_attr(e, b"ascii");
                        }
                    }
                    b"br" => {
                        if local_attr(e, b"type").as_deref() == Some("page") {
                            if let Some(p) = current.as_mut() {
                                p.page_break = true;
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Some(p) = current.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| OoxmlError::InvalidStructure(err.to_string()))?;
                        p.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(done) = current.take() {
                        paragraphs.push(done);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(done) = current.take() {
        paragraphs.push(done);
    }
    Ok(paragraphs)
}

/// `dc:title` of the package core properties, if present
pub fn core_title(archive: &OoxmlArchive) -> Result<Option<String>> {
    match archive.get(CORE_PROPERTIES_PATH) {
        Some(core) => parse_title(core),
        None => Ok(None),
    }
}

fn parse_title(xml: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut in_title = false;
    let mut title = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"title" => in_title = true,
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"title" => in_title = false,
            Ok(Event::Text(e)) if in_title => {
                let text = e
                    .unescape()
                    .map_err(|err| OoxmlError::InvalidStructure(err.to_string()))?;
                title.get_or_insert_with(String::new).push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(title)
}
