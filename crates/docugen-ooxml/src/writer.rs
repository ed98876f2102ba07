//! DOCX Writer - serializes layout blocks into a WordprocessingML package
//!
//! The package is built from scratch: no template is read. Every part is
//! assembled in an [`OoxmlArchive`] first, so a failed export never leaves a
//! partial file behind.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use docugen_ast::{Language, ThemeFont, Tone, PRODUCT_NAME};

use crate::archive::{OoxmlArchive, CONTENT_TYPES_PATH};
use crate::constants;
use crate::error::Result;
use crate::layout::{DocBlock, ParagraphSpec, HEADING_STYLE};
use crate::relationships::Relationships;
use crate::xml::{escape_xml, space_attr, XML_DECLARATION};

/// Main document part
pub const DOCUMENT_PATH: &str = "word/document.xml";

/// DOCX Writer for generating packages from layout blocks
pub struct DocxWriter {
    /// XML output buffer for the document body
    output: String,
    /// Document relationships (word/_rels/document.xml.rels)
    relationships: Relationships,
    /// Tone echoed into the package keywords
    tone: Option<Tone>,
    /// Language of the generated text
    language: Option<Language>,
    /// Creation timestamp written to core properties
    timestamp: Option<DateTime<Utc>>,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    /// Create a new DocxWriter
    pub fn new() -> Self {
        Self {
            output: String::new(),
            relationships: Relationships::new(),
            tone: None,
            language: None,
            timestamp: None,
        }
    }

    /// Record the tone the outline was written in
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Tag the text with a language
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Fix the creation timestamp (defaults to now)
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Generate the package bytes
    pub fn generate(self, title: &str, blocks: &[DocBlock], font: &ThemeFont) -> Result<Vec<u8>> {
        let archive = self.build_archive(title, blocks, font);
        archive.to_bytes()
    }

    /// Assemble every part of the package
    pub fn build_archive(mut self, title: &str, blocks: &[DocBlock], font: &ThemeFont) -> OoxmlArchive {
        let mut archive = OoxmlArchive::new();

        archive.set_string(CONTENT_TYPES_PATH, content_types_xml());
        archive.set_string("_rels/.rels", root_rels_xml());

        self.relationships
            .add("styles.xml", Relationships::TYPE_STYLES);
        self.relationships
            .add("settings.xml", Relationships::TYPE_SETTINGS);
        archive.set_string("word/_rels/document.xml.rels", self.relationships.to_xml());

        let document = self.generate_document_xml(blocks, font);
        archive.set_string(DOCUMENT_PATH, document);
        archive.set_string("word/styles.xml", self.styles_xml(font));
        archive.set_string("word/settings.xml", settings_xml());
        archive.set_string("docProps/core.xml", self.core_xml(title));
        archive.set_string("docProps/app.xml", app_xml());

        debug!(parts = archive.len(), blocks = blocks.len(), "Assembled DOCX package");
        archive
    }

    fn generate_document_xml(&mut self, blocks: &[DocBlock], font: &ThemeFont) -> String {
        self.output.clear();

        self.output.push_str(XML_DECLARATION);
        self.output.push('\n');
        self.output.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}">"#,
            constants::NS_WORDPROCESSING,
            constants::NS_RELATIONSHIPS
        ));
        self.output.push('\n');
        self.output.push_str("<w:body>\n");

        for block in blocks {
            match block {
                DocBlock::Paragraph(spec) => self.generate_paragraph(spec, font),
                DocBlock::PageBreak => self.generate_page_break(),
            }
        }

        self.output.push_str(&format!(
            concat!(
                "<w:sectPr>",
                r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
                r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="720" w:footer="720" w:gutter="0"/>"#,
                "</w:sectPr>\n"
            ),
            constants::PAGE_WIDTH_TWIPS,
            constants::PAGE_HEIGHT_TWIPS,
            m = constants::PAGE_MARGIN_TWIPS
        ));

        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");
        self.output.clone()
    }

    fn generate_paragraph(&mut self, spec: &ParagraphSpec, font: &ThemeFont) {
        self.output.push_str("<w:p>\n<w:pPr>\n");

        if let Some(style) = spec.style {
            self.output
                .push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", style));
        }

        if let Some(border) = &spec.bottom_border {
            self.output.push_str(&format!(
                "<w:pBdr><w:bottom w:val=\"single\" w:sz=\"{}\" w:space=\"{}\" w:color=\"{}\"/></w:pBdr>\n",
                border.size,
                border.space,
                border.color.hex()
            ));
        }

        let line = spec
            .line
            .map(|line| format!(" w:line=\"{}\" w:lineRule=\"auto\"", line))
            .unwrap_or_default();
        self.output.push_str(&format!(
            "<w:spacing w:before=\"{}\" w:after=\"{}\"{}/>\n",
            spec.before, spec.after, line
        ));

        self.output.push_str(&format!(
            "<w:jc w:val=\"{}\"/>\n",
            spec.alignment.as_ooxml()
        ));
        self.output.push_str("</w:pPr>\n");

        self.output.push_str("<w:r>\n<w:rPr>\n");
        let family = escape_xml(&font.family);
        self.output.push_str(&format!(
            "<w:rFonts w:ascii=\"{f}\" w:hAnsi=\"{f}\" w:eastAsia=\"{f}\" w:cs=\"{f}\"/>\n",
            f = family
        ));
        if spec.bold {
            self.output.push_str("<w:b/>\n<w:bCs/>\n");
        }
        self.output
            .push_str(&format!("<w:color w:val=\"{}\"/>\n", spec.color.hex()));
        if let Some(spacing) = spec.character_spacing {
            self.output
                .push_str(&format!("<w:spacing w:val=\"{}\"/>\n", spacing));
        }
        self.output
            .push_str(&format!("<w:sz w:val=\"{}\"/>\n", spec.size));
        self.output
            .push_str(&format!("<w:szCs w:val=\"{}\"/>\n", spec.size));
        self.output.push_str("</w:rPr>\n");

        self.output.push_str(&format!(
            "<w:t{}>{}</w:t>\n",
            space_attr(&spec.text),
            escape_xml(&spec.text)
        ));
        self.output.push_str("</w:r>\n</w:p>\n");
    }

    fn generate_page_break(&mut self) {
        self.output.push_str("<w:p>\n");
        self.output.push_str("<w:r>\n");
        self.output.push_str("<w:br w:type=\"page\"/>\n");
        self.output.push_str("</w:r>\n");
        self.output.push_str("</w:p>\n");
    }

    fn styles_xml(&self, font: &ThemeFont) -> String {
        let family = escape_xml(&font.family);
        let lang = self
            .language
            .map(|language| {
                format!(
                    "<w:lang w:val=\"{tag}\" w:eastAsia=\"{tag}\" w:bidi=\"{tag}\"/>",
                    tag = language.lang_tag()
                )
            })
            .unwrap_or_default();

        format!(
            r#"{decl}
<w:styles xmlns:w="{ns}">
<w:docDefaults>
<w:rPrDefault><w:rPr><w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:eastAsia="{f}" w:cs="{f}"/><w:sz w:val="24"/><w:szCs w:val="24"/>{lang}</w:rPr></w:rPrDefault>
<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>
</w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>
<w:style w:type="paragraph" w:styleId="{heading}"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:bCs/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style>
</w:styles>"#,
            decl = XML_DECLARATION,
            ns = constants::NS_WORDPROCESSING,
            f = family,
            lang = lang,
            heading = HEADING_STYLE,
        )
    }

    fn core_xml(&self, title: &str) -> String {
        let timestamp = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut core = String::from(XML_DECLARATION);
        core.push('\n');
        core.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
        core.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
        core.push_str(&format!("<dc:creator>{}</dc:creator>", PRODUCT_NAME));
        if let Some(tone) = self.tone {
            core.push_str(&format!("<cp:keywords>{}</cp:keywords>", tone.label()));
        }
        if let Some(language) = self.language {
            core.push_str(&format!("<dc:language>{}</dc:language>", language.lang_tag()));
        }
        core.push_str(&format!(
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{t}</dcterms:created><dcterms:modified xsi:type=\"dcterms:W3CDTF\">{t}</dcterms:modified>",
            t = timestamp
        ));
        core.push_str("</cp:coreProperties>");
        core
    }
}

fn content_types_xml() -> String {
    format!(
        r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#,
        XML_DECLARATION
    )
}

fn root_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add(DOCUMENT_PATH, Relationships::TYPE_OFFICE_DOCUMENT);
    rels.add("docProps/core.xml", Relationships::TYPE_CORE_PROPERTIES);
    rels.add("docProps/app.xml", Relationships::TYPE_EXTENDED_PROPERTIES);
    rels.to_xml()
}

fn settings_xml() -> String {
    format!(
        r#"{}
<w:settings xmlns:w="{}"><w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat></w:settings>"#,
        XML_DECLARATION,
        constants::NS_WORDPROCESSING
    )
}

fn app_xml() -> String {
    format!(
        r#"{}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{}</Application><DocSecurity>0</DocSecurity></Properties>"#,
        XML_DECLARATION, PRODUCT_NAME
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DocumentLayout;
    use chrono::{NaiveDate, TimeZone};
    use docugen_ast::{DocumentSection, GeneratedData, ThemeCatalog};

    fn sample_blocks() -> Vec<DocBlock> {
        let catalog = ThemeCatalog::builtin();
        let data = GeneratedData::document(
            "Report",
            vec![DocumentSection::new("Intro", ["A.", "B & C"])],
        );
        DocumentLayout::build(
            &data,
            catalog.default_palette(),
            catalog.default_font(),
            NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_write_basic_doc() {
        let catalog = ThemeCatalog::builtin();
        let archive =
            DocxWriter::new().build_archive("Report", &sample_blocks(), catalog.default_font());

        for part in [
            CONTENT_TYPES_PATH,
            "_rels/.rels",
            DOCUMENT_PATH,
            "word/_rels/document.xml.rels",
            "word/styles.xml",
            "word/settings.xml",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(archive.contains(part), "missing {}", part);
        }

        let document = archive.get_string(DOCUMENT_PATH).unwrap();
        assert!(document.contains("SECTION 1: INTRO"));
        assert!(document.contains("B &amp; C"));
        assert!(document.contains(r#"<w:br w:type="page"/>"#));
        assert!(document.contains(r#"<w:jc w:val="both"/>"#));
        assert!(document.contains(r#"w:line="360""#));
        assert!(document.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
        assert!(document.contains(r#"w:top="1440" w:right="1440" w:bottom="1440" w:left="1440""#));
    }

    #[test]
    fn test_styles_use_font_family() {
        let catalog = ThemeCatalog::builtin();
        let font = catalog.font("serif").unwrap();
        let archive = DocxWriter::new()
            .with_language(Language::Urdu)
            .build_archive("Report", &sample_blocks(), font);

        let styles = archive.get_string("word/styles.xml").unwrap();
        assert!(styles.contains(r#"w:ascii="Georgia""#));
        assert!(styles.contains(r#"w:styleId="Heading1""#));
        assert!(styles.contains(r#"w:bidi="ur-PK""#));
    }

    #[test]
    fn test_document_relationships() {
        let catalog = ThemeCatalog::builtin();
        let archive =
            DocxWriter::new().build_archive("Report", &sample_blocks(), catalog.default_font());

        let rels =
            Relationships::parse(archive.get("word/_rels/document.xml.rels").unwrap()).unwrap();
        assert_eq!(rels.find_by_type(Relationships::TYPE_STYLES), Some("styles.xml"));
        assert_eq!(
            rels.find_by_type(Relationships::TYPE_SETTINGS),
            Some("settings.xml")
        );

        let root = Relationships::parse(archive.get("_rels/.rels").unwrap()).unwrap();
        assert_eq!(
            root.find_by_type(Relationships::TYPE_OFFICE_DOCUMENT),
            Some(DOCUMENT_PATH)
        );
    }

    #[test]
    fn test_core_properties_with_tone() {
        let catalog = ThemeCatalog::builtin();
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 5, 9, 30, 0).unwrap();
        let archive = DocxWriter::new()
            .with_tone(Tone::Academic)
            .with_timestamp(timestamp)
            .build_archive("R&D Review", &sample_blocks(), catalog.default_font());

        let core = archive.get_string("docProps/core.xml").unwrap();
        assert!(core.contains("<dc:title>R&amp;D Review</dc:title>"));
        assert!(core.contains("<dc:creator>DocuGenius AI</dc:creator>"));
        assert!(core.contains("<cp:keywords>Academic</cp:keywords>"));
        assert!(core.contains("2025-03-05T09:30:00Z"));
    }

    #[test]
    fn test_core_properties_without_tone() {
        let catalog = ThemeCatalog::builtin();
        let archive =
            DocxWriter::new().build_archive("Report", &sample_blocks(), catalog.default_font());

        let core = archive.get_string("docProps/core.xml").unwrap();
        assert!(!core.contains("cp:keywords"));
    }

    #[test]
    fn test_generate_produces_zip() {
        let catalog = ThemeCatalog::builtin();
        let bytes = DocxWriter::new()
            .generate("Report", &sample_blocks(), catalog.default_font())
            .unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
