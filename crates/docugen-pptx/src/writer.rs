//! PPTX generation from slide layout instructions.
//!
//! The writer emits a self-contained PresentationML package: one slide
//! master, one blank layout, a theme derived from the palette and font, and
//! one part per slide. Every shape is drawn explicitly; no placeholders are
//! inherited from the layout.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use docugen_ast::{Language, ThemeFont, ThemePalette, PRODUCT_NAME};
use docugen_ooxml::xml::{space_attr, XML_DECLARATION};
use docugen_ooxml::{escape_xml, OoxmlArchive, Relationships, CONTENT_TYPES_PATH};

use crate::constants::*;
use crate::error::Result;
use crate::slide::{Frame, Shape, Slide, TextBox};

/// Main presentation part
pub const PRESENTATION_PATH: &str = "ppt/presentation.xml";

/// Left margin and hanging indent of bulleted paragraphs (0.375")
const BULLET_INDENT_EMU: i64 = 342_900;

/// PPTX document writer
pub struct PptxWriter {
    /// Language tag written on every run
    lang: String,
    /// Creation timestamp written to core properties
    timestamp: Option<DateTime<Utc>>,
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PptxWriter {
    /// Create a new PPTX writer
    pub fn new() -> Self {
        Self {
            lang: Language::English.lang_tag().to_string(),
            timestamp: None,
        }
    }

    /// Tag runs with the outline language
    pub fn with_language(mut self, language: Language) -> Self {
        self.lang = language.lang_tag().to_string();
        self
    }

    /// Fix the creation timestamp (defaults to now)
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Generate the PPTX as bytes
    pub fn generate(
        &self,
        title: &str,
        slides: &[Slide],
        palette: &ThemePalette,
        font: &ThemeFont,
    ) -> Result<Vec<u8>> {
        let archive = self.build_archive(title, slides, palette, font);
        Ok(archive.to_bytes()?)
    }

    /// Assemble every part of the package
    pub fn build_archive(
        &self,
        title: &str,
        slides: &[Slide],
        palette: &ThemePalette,
        font: &ThemeFont,
    ) -> OoxmlArchive {
        let mut archive = OoxmlArchive::new();

        archive.set_string(CONTENT_TYPES_PATH, content_types_xml(slides.len()));
        archive.set_string("_rels/.rels", root_rels_xml());
        archive.set_string("docProps/app.xml", app_xml(slides.len()));
        archive.set_string("docProps/core.xml", self.core_xml(title));

        let mut rels = Relationships::new();
        let master_rel = rels.add("slideMasters/slideMaster1.xml", Relationships::TYPE_SLIDE_MASTER);
        rels.add("presProps.xml", Relationships::TYPE_PRES_PROPS);
        rels.add("viewProps.xml", Relationships::TYPE_VIEW_PROPS);
        rels.add("theme/theme1.xml", Relationships::TYPE_THEME);
        rels.add("tableStyles.xml", Relationships::TYPE_TABLE_STYLES);
        let slide_rels: Vec<String> = (1..=slides.len())
            .map(|i| rels.add(format!("slides/slide{}.xml", i), Relationships::TYPE_SLIDE))
            .collect();

        archive.set_string(PRESENTATION_PATH, presentation_xml(&master_rel, &slide_rels));
        archive.set_string("ppt/_rels/presentation.xml.rels", rels.to_xml());
        archive.set_string("ppt/presProps.xml", pres_props_xml());
        archive.set_string("ppt/viewProps.xml", view_props_xml());
        archive.set_string("ppt/tableStyles.xml", table_styles_xml());
        archive.set_string("ppt/theme/theme1.xml", theme_xml(palette, font));

        let mut master_rels = Relationships::new();
        let layout_rel = master_rels.add(
            "../slideLayouts/slideLayout1.xml",
            Relationships::TYPE_SLIDE_LAYOUT,
        );
        master_rels.add("../theme/theme1.xml", Relationships::TYPE_THEME);
        archive.set_string("ppt/slideMasters/slideMaster1.xml", slide_master_xml(&layout_rel));
        archive.set_string(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            master_rels.to_xml(),
        );

        let mut layout_rels = Relationships::new();
        layout_rels.add(
            "../slideMasters/slideMaster1.xml",
            Relationships::TYPE_SLIDE_MASTER,
        );
        archive.set_string("ppt/slideLayouts/slideLayout1.xml", slide_layout_xml());
        archive.set_string(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            layout_rels.to_xml(),
        );

        let mut slide_rels = Relationships::new();
        slide_rels.add(
            "../slideLayouts/slideLayout1.xml",
            Relationships::TYPE_SLIDE_LAYOUT,
        );
        let slide_rels = slide_rels.to_xml();

        for (i, slide) in slides.iter().enumerate() {
            let number = i + 1;
            archive.set_string(
                format!("ppt/slides/slide{}.xml", number),
                self.generate_slide_xml(slide),
            );
            archive.set_string(
                format!("ppt/slides/_rels/slide{}.xml.rels", number),
                slide_rels.clone(),
            );
        }

        debug!(parts = archive.len(), slides = slides.len(), "Assembled PPTX package");
        archive
    }

    /// Generate slide XML content
    fn generate_slide_xml(&self, slide: &Slide) -> String {
        let mut shapes = String::new();
        for (i, shape) in slide.shapes.iter().enumerate() {
            // id 1 is the group shape tree itself
            let id = i + 2;
            match shape {
                Shape::Rect { name, frame, fill } => {
                    shapes.push_str(&rect_xml(id, name, frame, fill.hex()));
                }
                Shape::Line {
                    name,
                    frame,
                    color,
                    width,
                } => {
                    shapes.push_str(&line_xml(
                        id,
                        name,
                        frame,
                        color.hex(),
                        Shape::line_width_emu(*width),
                    ));
                }
                Shape::Text(text) => shapes.push_str(&self.text_box_xml(id, text)),
            }
        }

        format!(
            r#"{}
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
{}    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#,
            XML_DECLARATION,
            NS_DRAWING,
            NS_RELATIONSHIPS,
            NS_PRESENTATION,
            slide.background.hex(),
            shapes
        )
    }

    /// Generate a text box shape
    fn text_box_xml(&self, id: usize, text: &TextBox) -> String {
        let style = &text.style;
        let typeface = escape_xml(&style.typeface);

        let mut rpr = format!("lang=\"{}\" sz=\"{}\"", self.lang, style.size_hundredths());
        if style.bold {
            rpr.push_str(" b=\"1\"");
        }
        if style.italic {
            rpr.push_str(" i=\"1\"");
        }
        let run_props = format!(
            "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:latin typeface=\"{t}\"/><a:ea typeface=\"{t}\"/><a:cs typeface=\"{t}\"/>",
            style.color.hex(),
            t = typeface
        );

        let mut paragraphs = String::new();
        for paragraph in &text.paragraphs {
            let ppr = if paragraph.bullet {
                format!(
                    "<a:pPr marL=\"{m}\" indent=\"-{m}\" algn=\"{}\"><a:spcBef><a:spcPts val=\"1000\"/></a:spcBef><a:buFont typeface=\"Arial\"/><a:buChar char=\"•\"/></a:pPr>",
                    text.align.as_ooxml(),
                    m = BULLET_INDENT_EMU
                )
            } else {
                format!("<a:pPr algn=\"{}\"/>", text.align.as_ooxml())
            };
            paragraphs.push_str(&format!(
                "          <a:p>{}<a:r><a:rPr {}>{}</a:rPr><a:t{}>{}</a:t></a:r></a:p>\n",
                ppr,
                rpr,
                run_props,
                space_attr(&paragraph.text),
                escape_xml(&paragraph.text)
            ));
        }
        if paragraphs.is_empty() {
            // A text body needs at least one paragraph
            paragraphs.push_str(&format!(
                "          <a:p><a:endParaRPr lang=\"{}\" sz=\"{}\"/></a:p>\n",
                self.lang,
                style.size_hundredths()
            ));
        }

        format!(
            r#"      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="{}" name="{}"/>
          <p:cNvSpPr txBox="1"/>
          <p:nvPr/>
        </p:nvSpPr>
        <p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>
        <p:txBody>
          <a:bodyPr wrap="square" rtlCol="0" anchor="{}"><a:noAutofit/></a:bodyPr>
          <a:lstStyle/>
{}        </p:txBody>
      </p:sp>
"#,
            id,
            escape_xml(&text.name),
            xfrm_xml(&text.frame),
            text.anchor.as_ooxml(),
            paragraphs
        )
    }

    /// Core properties (title, creator, timestamps)
    fn core_xml(&self, title: &str) -> String {
        let now = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        format!(
            r#"{}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{}</dc:title>
  <dc:creator>{}</dc:creator>
  <cp:lastModifiedBy>{}</cp:lastModifiedBy>
  <dc:language>{}</dc:language>
  <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>
</cp:coreProperties>"#,
            XML_DECLARATION,
            escape_xml(title),
            PRODUCT_NAME,
            PRODUCT_NAME,
            self.lang,
            now,
            now
        )
    }
}

fn xfrm_xml(frame: &Frame) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        frame.x, frame.y, frame.cx, frame.cy
    )
}

fn rect_xml(id: usize, name: &str, frame: &Frame, fill: &str) -> String {
    format!(
        r#"      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="{}" name="{}"/>
          <p:cNvSpPr/>
          <p:nvPr/>
        </p:nvSpPr>
        <p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr>
      </p:sp>
"#,
        id,
        escape_xml(name),
        xfrm_xml(frame),
        fill
    )
}

fn line_xml(id: usize, name: &str, frame: &Frame, color: &str, width_emu: i64) -> String {
    format!(
        r#"      <p:cxnSp>
        <p:nvCxnSpPr>
          <p:cNvPr id="{}" name="{}"/>
          <p:cNvCxnSpPr/>
          <p:nvPr/>
        </p:nvCxnSpPr>
        <p:spPr>{}<a:prstGeom prst="line"><a:avLst/></a:prstGeom><a:ln w="{}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln></p:spPr>
      </p:cxnSp>
"#,
        id,
        escape_xml(name),
        xfrm_xml(frame),
        width_emu,
        color
    )
}

fn content_types_xml(slide_count: usize) -> String {
    let mut content = format!(
        r#"{}
<Types xmlns="{}">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>
  <Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/>
  <Override PartName="/ppt/tableStyles.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"/>
  <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
  <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
        XML_DECLARATION, NS_CONTENT_TYPES
    );

    for i in 1..=slide_count {
        content.push_str(&format!(
            "  <Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>\n",
            i
        ));
    }

    content.push_str("</Types>");
    content
}

fn root_rels_xml() -> String {
    let mut rels = Relationships::new();
    rels.add(PRESENTATION_PATH, Relationships::TYPE_OFFICE_DOCUMENT);
    rels.add("docProps/core.xml", Relationships::TYPE_CORE_PROPERTIES);
    rels.add("docProps/app.xml", Relationships::TYPE_EXTENDED_PROPERTIES);
    rels.to_xml()
}

fn app_xml(slide_count: usize) -> String {
    format!(
        r#"{}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>0</TotalTime>
  <Application>{}</Application>
  <PresentationFormat>On-screen Show (16:9)</PresentationFormat>
  <Slides>{}</Slides>
  <Notes>0</Notes>
  <HiddenSlides>0</HiddenSlides>
  <ScaleCrop>false</ScaleCrop>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
</Properties>"#,
        XML_DECLARATION, PRODUCT_NAME, slide_count
    )
}

fn presentation_xml(master_rel: &str, slide_rels: &[String]) -> String {
    let mut slide_refs = String::new();
    for (i, rel) in slide_rels.iter().enumerate() {
        slide_refs.push_str(&format!(
            "    <p:sldId id=\"{}\" r:id=\"{}\"/>\n",
            256 + i,
            rel
        ));
    }

    format!(
        r#"{}
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">
  <p:sldMasterIdLst>
    <p:sldMasterId id="2147483648" r:id="{}"/>
  </p:sldMasterIdLst>
  <p:sldIdLst>
{}  </p:sldIdLst>
  <p:sldSz cx="{}" cy="{}" type="screen16x9"/>
  <p:notesSz cx="{}" cy="{}"/>
</p:presentation>"#,
        XML_DECLARATION,
        NS_DRAWING,
        NS_RELATIONSHIPS,
        NS_PRESENTATION,
        master_rel,
        slide_refs,
        SLIDE_WIDTH_EMU,
        SLIDE_HEIGHT_EMU,
        NOTES_WIDTH_EMU,
        NOTES_HEIGHT_EMU
    )
}

fn pres_props_xml() -> String {
    format!(
        r#"{}
<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"/>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
    )
}

fn table_styles_xml() -> String {
    format!(
        r#"{}
<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        XML_DECLARATION, NS_DRAWING
    )
}

fn view_props_xml() -> String {
    format!(
        r#"{}
<p:viewPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:normalViewPr>
    <p:restoredLeft sz="15620"/>
    <p:restoredTop sz="94660"/>
  </p:normalViewPr>
  <p:slideViewPr>
    <p:cSldViewPr>
      <p:cViewPr>
        <p:scale>
          <a:sx n="100" d="100"/>
          <a:sy n="100" d="100"/>
        </p:scale>
        <p:origin x="0" y="0"/>
      </p:cViewPr>
    </p:cSldViewPr>
  </p:slideViewPr>
</p:viewPr>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
    )
}

/// Theme part: colour scheme from the palette, font scheme from the font
fn theme_xml(palette: &ThemePalette, font: &ThemeFont) -> String {
    let typeface = escape_xml(&font.family);

    format!(
        r#"{}
<a:theme xmlns:a="{}" name="{}">
  <a:themeElements>
    <a:clrScheme name="{}">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="{}"/></a:dk2>
      <a:lt2><a:srgbClr val="{}"/></a:lt2>
      <a:accent1><a:srgbClr val="{}"/></a:accent1>
      <a:accent2><a:srgbClr val="{}"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="{}">
      <a:majorFont>
        <a:latin typeface="{t}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="{t}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="{}">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
        XML_DECLARATION,
        NS_DRAWING,
        escape_xml(&palette.name),
        escape_xml(&palette.name),
        palette.dark.hex(),
        palette.light.hex(),
        palette.primary.hex(),
        palette.accent.hex(),
        escape_xml(&font.name),
        escape_xml(&palette.name),
        t = typeface
    )
}

fn slide_master_xml(layout_rel: &str) -> String {
    format!(
        r#"{}
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:bg>
      <p:bgRef idx="1001">
        <a:schemeClr val="bg1"/>
      </p:bgRef>
    </p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="2147483649" r:id="{}"/>
  </p:sldLayoutIdLst>
</p:sldMaster>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, layout_rel
    )
}

fn slide_layout_xml() -> String {
    format!(
        r#"{}
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1">
  <p:cSld name="Blank">
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
        XML_DECLARATION, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
    )
}
