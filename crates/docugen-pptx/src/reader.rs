//! Reading exported PPTX packages back
//!
//! Follows the package from `_rels/.rels` to the presentation part and then
//! through `p:sldIdLst` to each slide, in deck order.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use docugen_ooxml::xml::local_attr;
use docugen_ooxml::{core_title, resolve_target, OoxmlArchive, Relationships};

use crate::error::{PptxError, Result};

/// Visible content of one slide
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSlide {
    /// Non-empty paragraph texts in reading order
    pub paragraphs: Vec<String>,
    /// Every explicit color used by shapes and runs, in document order
    pub colors: Vec<String>,
    /// Distinct latin typefaces of the runs
    pub typefaces: Vec<String>,
    /// Solid background color
    pub background: Option<String>,
}

/// Parsed view of a PPTX package
#[derive(Debug, Clone)]
pub struct DeckReader {
    title: Option<String>,
    slides: Vec<ReadSlide>,
}

impl DeckReader {
    /// Open a deck on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(&OoxmlArchive::open(path)?)
    }

    /// Read a deck held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(&OoxmlArchive::from_bytes(bytes)?)
    }

    /// Read an unpacked deck
    pub fn from_archive(archive: &OoxmlArchive) -> Result<Self> {
        let root = Relationships::parse(archive.require("_rels/.rels")?)?;
        let presentation_path = root
            .find_by_type(Relationships::TYPE_OFFICE_DOCUMENT)
            .map(|target| resolve_target("", target))
            .ok_or_else(|| PptxError::invalid_package("package has no presentation part"))?;

        let rels_path = rels_path_for(&presentation_path);
        let rels = Relationships::parse(archive.require(&rels_path)?)?;

        let mut slides = Vec::new();
        for rel_id in slide_rel_ids(archive.require(&presentation_path)?)? {
            let target = rels.get(&rel_id).ok_or_else(|| {
                PptxError::invalid_package(format!("slide reference '{}' is not in {}", rel_id, rels_path))
            })?;
            let slide_path = resolve_target(&presentation_path, target);
            slides.push(parse_slide(archive.require(&slide_path)?)?);
        }

        Ok(Self {
            title: core_title(archive)?,
            slides,
        })
    }

    /// Title from the core properties
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Slides in deck order
    pub fn slides(&self) -> &[ReadSlide] {
        &self.slides
    }

    /// Number of slides
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// `ppt/presentation.xml` -> `ppt/_rels/presentation.xml.rels`
fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((folder, file)) => format!("{}/_rels/{}.rels", folder, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Relationship id of a prefixed `r:id` attribute
fn relationship_id(e: &BytesStart) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn slide_rel_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"sldId" =>
            {
                if let Some(id) = relationship_id(e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PptxError::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

fn parse_slide(xml: &[u8]) -> Result<ReadSlide> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut slide = ReadSlide::default();
    let mut in_background = false;
    let mut in_text = false;
    let mut paragraph: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"bg" => in_background = true,
                b"p" => paragraph = Some(String::new()),
                b"t" => in_text = true,
                b"srgbClr" => {
                    if let Some(value) = local_attr(e, b"val") {
                        if in_background {
                            slide.background.get_or_insert(value);
                        } else {
                            slide.colors.push(value);
                        }
                    }
                }
                b"latin" => {
                    if let Some(face) = local_attr(e, b"typeface") {
                        if !slide.typefaces.contains(&face) {
                            slide.typefaces.push(face);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                if let Some(text) = paragraph.as_mut() {
                    let value = e
                        .unescape()
                        .map_err(|err| PptxError::invalid_package(err.to_string()))?;
                    text.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"bg" => in_background = false,
                b"t" => in_text = false,
                b"p" => {
                    if let Some(text) = paragraph.take().filter(|t| !t.is_empty()) {
                        slide.paragraphs.push(text);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PptxError::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(slide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_path_for("presentation.xml"), "_rels/presentation.xml.rels");
    }

    #[test]
    fn test_slide_ids_use_prefixed_attribute() {
        let xml = br#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="256" r:id="rId6"/><p:sldId id="257" r:id="rId7"/></p:sldIdLst></p:presentation>"#;
        assert_eq!(slide_rel_ids(xml).unwrap(), vec!["rId6", "rId7"]);
    }

    #[test]
    fn test_parse_slide() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a">
            <p:cSld>
              <p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></p:bgPr></p:bg>
              <p:spTree>
                <p:sp><p:spPr><a:solidFill><a:srgbClr val="4F46E5"/></a:solidFill></p:spPr></p:sp>
                <p:sp><p:txBody>
                  <a:p><a:r><a:rPr><a:latin typeface="Arial"/></a:rPr><a:t>R&amp;D</a:t></a:r></a:p>
                  <a:p><a:endParaRPr/></a:p>
                  <a:p><a:r><a:t xml:space="preserve"> spaced </a:t></a:r></a:p>
                </p:txBody></p:sp>
              </p:spTree>
            </p:cSld>
          </p:sld>"#;

        let slide = parse_slide(xml.as_bytes()).unwrap();
        assert_eq!(slide.background.as_deref(), Some("FFFFFF"));
        assert_eq!(slide.colors, vec!["4F46E5"]);
        assert_eq!(slide.typefaces, vec!["Arial"]);
        assert_eq!(slide.paragraphs, vec!["R&D", " spaced "]);
    }

    #[test]
    fn test_missing_presentation_rejected() {
        let mut archive = OoxmlArchive::new();
        archive.set_string("_rels/.rels", Relationships::new().to_xml());

        let err = DeckReader::from_archive(&archive).unwrap_err();
        assert_eq!(err.code(), "PPTX003");
    }
}
