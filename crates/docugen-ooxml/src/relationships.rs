//! Relationship parts (`_rels/*.rels`) for OOXML packages
//!
//! Relationship files map IDs to the parts a source part refers to. Writers
//! build them in insertion order; readers use them to follow a package from
//! its root to the slides or the document body.
//!
//! # Example
//!
//! ```
//! use docugen_ooxml::Relationships;
//!
//! let mut rels = Relationships::new();
//! let id = rels.add("styles.xml", Relationships::TYPE_STYLES);
//! assert_eq!(id, "rId1");
//! assert!(rels.to_xml().contains("styles.xml"));
//! ```

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::escape_xml;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Common relationship type URIs
impl Relationships {
    /// Main part of a package (document.xml / presentation.xml)
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Core properties (title, creator, dates)
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// Extended (application) properties
    pub const TYPE_EXTENDED_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Settings relationship type
    pub const TYPE_SETTINGS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    /// Theme relationship type
    pub const TYPE_THEME: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    /// Slide relationship type
    pub const TYPE_SLIDE: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    /// Slide layout relationship type
    pub const TYPE_SLIDE_LAYOUT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    /// Slide master relationship type
    pub const TYPE_SLIDE_MASTER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    /// Presentation properties relationship type
    pub const TYPE_PRES_PROPS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    /// View properties relationship type
    pub const TYPE_VIEW_PROPS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    /// Table styles relationship type
    pub const TYPE_TABLE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

/// Relationships of one source part
///
/// Maintains insertion order for deterministic XML serialization.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Ordered list of relationship IDs (maintains insertion order)
    order: Vec<String>,
    /// Map of relationship ID to target (for fast lookups)
    map: HashMap<String, RelationshipTarget>,
    /// Counter for generating unique IDs (starts at 1)
    next_id_counter: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            map: HashMap::new(),
            next_id_counter: 1,
        }
    }
}

/// A relationship target with its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// The target path, relative to the source part's folder
    pub target: String,
    /// The relationship type URI
    pub rel_type: String,
}

impl Relationships {
    /// Create an empty relationships map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse relationships from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Self::new();
        let mut max_id: u32 = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut id = None;
                        let mut target = None;
                        let mut rel_type = None;

                        for attr in e.attributes().filter_map(|a| a.ok()) {
                            let value = attr.unescape_value().ok().map(|s| s.to_string());
                            match attr.key.as_ref() {
                                b"Id" => id = value,
                                b"Target" => target = value,
                                b"Type" => rel_type = value,
                                _ => {}
                            }
                        }

                        if let (Some(id), Some(target)) = (id, target) {
                            if let Some(num) = extract_id_number(&id) {
                                max_id = max_id.max(num);
                            }
                            rels.order.push(id.clone());
                            rels.map.insert(
                                id,
                                RelationshipTarget {
                                    target,
                                    rel_type: rel_type.unwrap_or_default(),
                                },
                            );
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        rels.next_id_counter = max_id + 1;
        Ok(rels)
    }

    /// Add a new relationship and return the generated ID (`rIdN`)
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        let id = format!("rId{}", self.next_id_counter);
        self.next_id_counter += 1;

        self.order.push(id.clone());
        self.map.insert(
            id.clone(),
            RelationshipTarget {
                target: target.into(),
                rel_type: rel_type.into(),
            },
        );

        id
    }

    /// Serialize relationships to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');

        for (id, rel) in self.iter() {
            xml.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape_xml(id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Get the target for a relationship ID
    pub fn get(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(|r| r.target.as_str())
    }

    /// First target of the given relationship type
    pub fn find_by_type(&self, rel_type: &str) -> Option<&str> {
        self.iter()
            .find(|(_, rel)| rel.rel_type == rel_type)
            .map(|(_, rel)| rel.target.as_str())
    }

    /// Get the number of relationships
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over relationships in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipTarget)> {
        self.order
            .iter()
            .filter_map(|id| self.map.get(id).map(|rel| (id.as_str(), rel)))
    }
}

/// Extract the numeric portion from a relationship ID (e.g., "rId5" -> 5)
fn extract_id_number(id: &str) -> Option<u32> {
    id.strip_prefix("rId")
        .or_else(|| id.strip_prefix("RId"))
        .and_then(|num_str| num_str.parse().ok())
}

/// Resolve a relationship target against the folder of its source part
///
/// `resolve_target("ppt/presentation.xml", "slides/slide1.xml")` gives
/// `ppt/slides/slide1.xml`; `..` segments climb out of the folder.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();

    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relationships() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
            <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
        </Relationships>"#;

        let mut rels = Relationships::parse(xml).unwrap();

        assert_eq!(rels.get("rId7"), Some("styles.xml"));
        assert_eq!(
            rels.find_by_type(Relationships::TYPE_SLIDE_MASTER),
            Some("slideMasters/slideMaster1.xml")
        );
        assert_eq!(rels.len(), 2);

        // New IDs continue after the highest parsed one
        assert_eq!(rels.add("settings.xml", Relationships::TYPE_SETTINGS), "rId8");
    }

    #[test]
    fn test_empty_relationships() {
        let xml = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        assert!(rels.get("rId1").is_none());
        assert!(rels.is_empty());
    }

    #[test]
    fn test_to_xml_keeps_insertion_order() {
        let mut rels = Relationships::new();
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        rels.add("settings.xml", Relationships::TYPE_SETTINGS);

        let xml = rels.to_xml();
        let styles = xml.find("styles.xml").unwrap();
        let settings = xml.find("settings.xml").unwrap();
        assert!(styles < settings);

        let reparsed = Relationships::parse(xml.as_bytes()).unwrap();
        assert_eq!(reparsed.get("rId2"), Some("settings.xml"));
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../slideLayouts/slideLayout1.xml"),
            "ppt/slideLayouts/slideLayout1.xml"
        );
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("_rels/x", "/word/document.xml"), "word/document.xml");
    }
}
