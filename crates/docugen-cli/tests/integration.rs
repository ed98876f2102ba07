//! Integration tests for docugen CLI
//!
//! These tests drive the command functions end to end:
//! outline JSON -> PPTX/DOCX -> text report

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use docugen_ast::{
    DocumentSection, GeneratedData, GenerationParams, Language, OutputType, SlideContent,
    ThemeCatalog, Tone,
};
use docugen_cli::{
    generate_command, inspect_report, render_command, themes_report, AppConfig, OutputFormat,
    ThemeArgs,
};
use docugen_ooxml::DocumentReader;
use docugen_pptx::DeckReader;
use docugen_synth::{OutlineProvider, ProviderError, SynthesisRequest, Synthesizer};

fn theme_in(dir: &TempDir, palette: Option<&str>, font: Option<&str>) -> ThemeArgs {
    ThemeArgs {
        palette: palette.map(str::to_string),
        font: font.map(str::to_string),
        out_dir: dir.path().to_path_buf(),
    }
}

fn write_outline(dir: &TempDir, outline: &GeneratedData) -> PathBuf {
    let path = dir.path().join("outline.json");
    fs::write(&path, serde_json::to_string_pretty(outline).unwrap()).unwrap();
    path
}

fn deck_outline() -> GeneratedData {
    GeneratedData::slides(
        "Q3 Plan",
        vec![
            SlideContent::new("Revenue", ["Up 12%", "New market"]),
            SlideContent::new("Hiring", ["Two engineers"]),
        ],
    )
}

fn document_outline() -> GeneratedData {
    GeneratedData::document(
        "Water Report",
        vec![
            DocumentSection::new("Introduction", ["Rivers matter."]),
            DocumentSection::new("Findings", ["Usage grew.", "Storage fell."]),
        ],
    )
}

#[test]
fn test_render_deck_from_json() {
    let dir = TempDir::new().unwrap();
    let input = write_outline(&dir, &deck_outline());

    let path = render_command(
        &input,
        &ThemeCatalog::builtin(),
        &theme_in(&dir, Some("ruby"), Some("serif")),
    )
    .unwrap();

    assert_eq!(path, dir.path().join("Q3_Plan_Presentation.pptx"));
    let deck = DeckReader::open(&path).unwrap();
    assert_eq!(deck.title(), Some("Q3 Plan"));
    assert_eq!(deck.slide_count(), 3);
    assert_eq!(deck.slides()[0].background.as_deref(), Some("4C0519"));
    assert!(deck.slides()[1].typefaces.contains(&"Georgia".to_string()));
}

#[test]
fn test_render_document_from_json() {
    let dir = TempDir::new().unwrap();
    let input = write_outline(&dir, &document_outline());

    let path = render_command(&input, &ThemeCatalog::builtin(), &theme_in(&dir, None, None)).unwrap();

    assert_eq!(path, dir.path().join("Water_Report_Document.docx"));
    let document = DocumentReader::open(&path).unwrap();
    assert_eq!(document.title(), Some("Water Report"));
    assert_eq!(
        document.headings().collect::<Vec<_>>(),
        vec!["SECTION 1: INTRODUCTION", "SECTION 2: FINDINGS"]
    );
}

#[test]
fn test_render_creates_output_directory() {
    let dir = TempDir::new().unwrap();
    let input = write_outline(&dir, &deck_outline());
    let mut theme = theme_in(&dir, None, None);
    theme.out_dir = dir.path().join("nested").join("out");

    let path = render_command(&input, &ThemeCatalog::builtin(), &theme).unwrap();
    assert!(path.starts_with(&theme.out_dir));
    assert!(path.exists());
}

#[test]
fn test_render_title_with_path_characters() {
    let dir = TempDir::new().unwrap();
    let mut theme = theme_in(&dir, None, None);
    theme.out_dir = dir.path().join("out");

    for (title, expected) in [
        ("Q3/Q4 Plan", "Q3_Q4_Plan_Presentation.pptx"),
        ("../escaped", ".._escaped_Presentation.pptx"),
    ] {
        let outline = GeneratedData::slides(title, vec![SlideContent::new("Revenue", ["Up"])]);
        let input = write_outline(&dir, &outline);

        let path = render_command(&input, &ThemeCatalog::builtin(), &theme).unwrap();
        assert_eq!(path, theme.out_dir.join(expected));
        assert_eq!(DeckReader::open(&path).unwrap().title(), Some(title));
    }
    assert!(!dir.path().join("escaped_Presentation.pptx").exists());
}

#[test]
fn test_render_unknown_palette() {
    let dir = TempDir::new().unwrap();
    let input = write_outline(&dir, &deck_outline());

    let err = render_command(
        &input,
        &ThemeCatalog::builtin(),
        &theme_in(&dir, Some("teal"), None),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown palette 'teal'"));
}

#[test]
fn test_render_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = render_command(
        &dir.path().join("absent.json"),
        &ThemeCatalog::builtin(),
        &theme_in(&dir, None, None),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_render_rejects_mixed_outline() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("outline.json");
    fs::write(
        &input,
        r#"{"title":"T","type":"document","items":[{"title":"A","points":["x"]}]}"#,
    )
    .unwrap();

    let err = render_command(&input, &ThemeCatalog::builtin(), &theme_in(&dir, None, None))
        .unwrap_err();
    assert!(err.to_string().contains("Invalid outline"));
}

#[test]
fn test_inspect_deck_text() {
    let dir = TempDir::new().unwrap();
    let input = write_outline(&dir, &deck_outline());
    let path = render_command(&input, &ThemeCatalog::builtin(), &theme_in(&dir, None, None)).unwrap();

    let report = inspect_report(&path, OutputFormat::Text).unwrap();
    assert!(report.starts_with("Title: Q3 Plan\n"));
    assert!(report.contains("Slide 1:"));
    assert!(report.contains("Slide 3:"));
    assert!(report.contains("  Up 12%\n"));
}

#[test]
fn test_inspect_document_json() {
    let dir = TempDir::new().unwrap();
    let input = write_outline(&dir, &document_outline());
    let path = render_command(&input, &ThemeCatalog::builtin(), &theme_in(&dir, None, None)).unwrap();

    let report = inspect_report(&path, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(json["type"], "document");
    assert_eq!(json["title"], "Water Report");
    assert_eq!(json["headings"][1], "SECTION 2: FINDINGS");
    assert!(json["paragraphs"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "Storage fell."));
}

#[test]
fn test_themes_report_json() {
    let report = themes_report(&ThemeCatalog::builtin(), OutputFormat::Json).unwrap();
    let catalog: ThemeCatalog = serde_json::from_str(&report).unwrap();
    assert_eq!(catalog, ThemeCatalog::builtin());
}

#[test]
fn test_config_file_loading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docugen.toml");
    fs::write(
        &path,
        "[synthesis]\nmodel = \"gemini-test\"\ntimeout_secs = 5\n",
    )
    .unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(config.synthesis.model, "gemini-test");
    assert_eq!(config.synthesis.timeout_secs, 5);
    assert_eq!(config.themes, ThemeCatalog::builtin());

    assert!(AppConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    assert_eq!(AppConfig::load(None).unwrap().themes, ThemeCatalog::builtin());
}

#[test]
fn test_config_rejects_zero_timeout() {
    assert!(AppConfig::from_toml("[synthesis]\ntimeout_secs = 0\n").is_err());
}

struct FixedProvider(&'static str);

impl OutlineProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn generate(&self, _request: &SynthesisRequest) -> Result<String, ProviderError> {
        Ok(self.0.to_string())
    }
}

struct RejectingProvider;

impl OutlineProvider for RejectingProvider {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn generate(&self, _request: &SynthesisRequest) -> Result<String, ProviderError> {
        Err(ProviderError::ServerError {
            status: 403,
            message: "API key not valid".to_string(),
        })
    }
}

#[test]
fn test_generate_writes_outline_and_export() {
    let dir = TempDir::new().unwrap();
    let synthesizer = Synthesizer::new(FixedProvider(
        r#"{"title":"Water Report","items":[{"heading":"Intro","paragraphs":["A."]}]}"#,
    ));
    let params = GenerationParams::new(
        "Water policy",
        OutputType::Document,
        Tone::Academic,
        1,
        Language::English,
    )
    .unwrap();
    let output = dir.path().join("outline.json");
    let catalog = ThemeCatalog::builtin();
    let theme = theme_in(&dir, Some("emerald"), None);

    let outline =
        generate_command(&synthesizer, &params, Some(&output), Some((&catalog, &theme))).unwrap();
    assert_eq!(outline.output_type(), OutputType::Document);

    let saved: GeneratedData =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved, outline);

    let document = DocumentReader::open(dir.path().join("Water_Report_Document.docx")).unwrap();
    assert_eq!(document.headings().collect::<Vec<_>>(), vec!["SECTION 1: INTRO"]);
}

#[test]
fn test_generate_failure_reports_user_message() {
    let dir = TempDir::new().unwrap();
    let params = GenerationParams::new(
        "Q3 planning",
        OutputType::Slides,
        Tone::Business,
        3,
        Language::English,
    )
    .unwrap();
    let output = dir.path().join("outline.json");

    let err = generate_command(
        &Synthesizer::new(RejectingProvider),
        &params,
        Some(&output),
        None,
    )
    .unwrap_err();

    assert!(err.to_string().contains("Please check your API key"));
    assert!(!output.exists());
}
