//! CLI Application logic
//!
//! Stands in for the interactive front end: collects generation parameters,
//! drives the synthesis session, and saves exported files under their
//! suggested names.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docugen_ast::{
    ExportedFile, GeneratedData, GenerationParams, Language, OutputType, ThemeCatalog, ThemeFont,
    ThemePalette, Tone,
};
use docugen_ooxml::{render_document_with, DocumentReader, DocxWriter, OoxmlArchive};
use docugen_pptx::{render_slides_with, DeckReader, PptxWriter};
use docugen_synth::{
    GeminiProvider, OutlineProvider, Session, SynthConfig, Synthesizer, FAILURE_MESSAGE,
};

/// Output format for listings and reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docugen")]
#[command(author, version, about = "Outlines to decks and documents", long_about = None)]
struct Cli {
    /// Configuration file (theme catalog and [synthesis] settings)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize an outline from a topic
    Generate {
        /// Topic or instructions
        prompt: String,

        /// Output type (slides or document)
        #[arg(short = 't', long = "type", default_value = "slides")]
        output_type: OutputType,

        /// Tone of the text
        #[arg(long, default_value = "professional")]
        tone: Tone,

        /// Target number of slides or sections (1-15)
        #[arg(short = 'n', long, default_value_t = 5)]
        count: u32,

        /// Language of the text
        #[arg(short, long, default_value = "english")]
        language: Language,

        /// Write the outline JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the outline
        #[arg(long)]
        render: bool,

        #[command(flatten)]
        theme: ThemeArgs,

        /// API key (overrides config and environment)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Export an outline JSON file to .pptx or .docx
    Render {
        /// Outline JSON file
        input: PathBuf,

        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// List the available palettes and fonts
    Themes {
        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the text content of an exported file
    Inspect {
        /// A .pptx or .docx file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Theme selection and destination of an export
#[derive(Debug, Clone, clap::Args)]
pub struct ThemeArgs {
    /// Palette id (defaults to the first palette of the catalog)
    #[arg(long)]
    pub palette: Option<String>,

    /// Font id (defaults to the first font of the catalog)
    #[arg(long)]
    pub font: Option<String>,

    /// Directory the file is saved in
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Everything read from the configuration file
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub themes: ThemeCatalog,
    pub synthesis: SynthConfig,
}

impl AppConfig {
    /// Parse a configuration file's contents
    ///
    /// The built-in catalog is kept unless the file defines palettes or fonts.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content).context("Invalid TOML")?;

        let themes = if table.contains_key("palettes") || table.contains_key("fonts") {
            ThemeCatalog::from_toml(content).context("Invalid theme catalog")?
        } else {
            ThemeCatalog::builtin()
        };
        let synthesis = SynthConfig::from_toml(content).context("Invalid [synthesis] table")?;

        Ok(Self { themes, synthesis })
    }

    /// Load the configuration file, or the defaults when none is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A second initialization (tests, embedding) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            prompt,
            output_type,
            tone,
            count,
            language,
            output,
            render,
            theme,
            api_key,
        } => {
            let params = GenerationParams::new(prompt, output_type, tone, count, language)?;

            let mut synthesis = config.synthesis.clone();
            if let Some(key) = api_key {
                synthesis.api_key = Some(key);
            }
            let provider = GeminiProvider::from_config(&synthesis.with_env_api_key())
                .context("Cannot reach the outline provider")?;

            let render_to = render.then_some(&theme);
            generate_command(
                &Synthesizer::new(provider),
                &params,
                output.as_deref(),
                render_to.map(|theme| (&config.themes, theme)),
            )?;
        }
        Commands::Render { input, theme } => {
            render_command(&input, &config.themes, &theme)?;
        }
        Commands::Themes { format } => {
            print!("{}", themes_report(&config.themes, format)?);
        }
        Commands::Inspect { input, format } => {
            print!("{}", inspect_report(&input, format)?);
        }
    }

    Ok(())
}

/// Execute the generate command
///
/// Writes the outline JSON to `output` (stdout when absent) and, when a
/// theme is given, exports the outline as well.
pub fn generate_command<P: OutlineProvider>(
    synthesizer: &Synthesizer<P>,
    params: &GenerationParams,
    output: Option<&Path>,
    render: Option<(&ThemeCatalog, &ThemeArgs)>,
) -> Result<GeneratedData> {
    let mut session = Session::new(params.output_type);
    let outline = session
        .generate(synthesizer, params)
        .context(FAILURE_MESSAGE)?
        .clone();

    let json = serde_json::to_string_pretty(&outline).context("Failed to serialize outline")?;
    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Failed to write outline: {}", path.display()))?;
            eprintln!("Outline: {}", path.display());
        }
        None => println!("{}", json),
    }

    if let Some((catalog, theme)) = render {
        let path = export_outline(
            &outline,
            catalog,
            theme,
            Some(params.tone),
            Some(params.language),
        )?;
        eprintln!("Saved: {}", path.display());
    }

    Ok(outline)
}

/// Execute the render command
pub fn render_command(input: &Path, catalog: &ThemeCatalog, theme: &ThemeArgs) -> Result<PathBuf> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read outline: {}", input.display()))?;
    let outline: GeneratedData = serde_json::from_str(&content)
        .with_context(|| format!("Invalid outline: {}", input.display()))?;

    let path = export_outline(&outline, catalog, theme, None, None)?;
    println!("Saved: {}", path.display());
    Ok(path)
}

/// Resolve the selected palette and font
pub fn select_theme<'a>(
    catalog: &'a ThemeCatalog,
    theme: &ThemeArgs,
) -> Result<(&'a ThemePalette, &'a ThemeFont)> {
    let palette = match theme.palette.as_deref() {
        Some(id) => catalog.palette(id).ok_or_else(|| {
            anyhow!(
                "Unknown palette '{}' (available: {})",
                id,
                catalog.palettes().iter().map(|p| p.id.as_str()).collect::<Vec<_>>().join(", ")
            )
        })?,
        None => catalog.default_palette(),
    };
    let font = match theme.font.as_deref() {
        Some(id) => catalog.font(id).ok_or_else(|| {
            anyhow!(
                "Unknown font '{}' (available: {})",
                id,
                catalog.fonts().iter().map(|f| f.id.as_str()).collect::<Vec<_>>().join(", ")
            )
        })?,
        None => catalog.default_font(),
    };
    Ok((palette, font))
}

/// Render an outline with the selected theme and save it in the output directory
pub fn export_outline(
    outline: &GeneratedData,
    catalog: &ThemeCatalog,
    theme: &ThemeArgs,
    tone: Option<Tone>,
    language: Option<Language>,
) -> Result<PathBuf> {
    let (palette, font) = select_theme(catalog, theme)?;
    let file = render_outline(outline, palette, font, tone, language)?;

    fs::create_dir_all(&theme.out_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            theme.out_dir.display()
        )
    })?;
    let path = file
        .save_in(&theme.out_dir)
        .with_context(|| format!("Failed to save {}", file.file_name))?;

    info!(path = %path.display(), bytes = file.bytes.len(), "Export saved");
    Ok(path)
}

/// Render an outline with the renderer matching its type
pub fn render_outline(
    outline: &GeneratedData,
    palette: &ThemePalette,
    font: &ThemeFont,
    tone: Option<Tone>,
    language: Option<Language>,
) -> Result<ExportedFile> {
    let file = match outline.output_type() {
        OutputType::Slides => {
            let mut writer = PptxWriter::new();
            if let Some(language) = language {
                writer = writer.with_language(language);
            }
            render_slides_with(&writer, outline, palette, font)
                .context("Failed to render presentation")?
        }
        OutputType::Document => {
            let mut writer = DocxWriter::new();
            if let Some(tone) = tone {
                writer = writer.with_tone(tone);
            }
            if let Some(language) = language {
                writer = writer.with_language(language);
            }
            render_document_with(writer, outline, palette, font, Local::now().date_naive())
                .context("Failed to render document")?
        }
    };
    Ok(file)
}

/// Listing of the theme catalog
pub fn themes_report(catalog: &ThemeCatalog, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(catalog)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = String::from("Palettes:\n");
            for (i, p) in catalog.palettes().iter().enumerate() {
                out.push_str(&format!(
                    "  {:<10} {:<20} primary #{} dark #{} light #{} accent #{}{}\n",
                    p.id,
                    p.name,
                    p.primary,
                    p.dark,
                    p.light,
                    p.accent,
                    if i == 0 { "  (default)" } else { "" }
                ));
            }
            out.push_str("Fonts:\n");
            for (i, f) in catalog.fonts().iter().enumerate() {
                out.push_str(&format!(
                    "  {:<10} {:<20} {}{}\n",
                    f.id,
                    f.name,
                    f.family,
                    if i == 0 { "  (default)" } else { "" }
                ));
            }
            Ok(out)
        }
    }
}

/// Text content of an exported package
pub fn inspect_report(input: &Path, format: OutputFormat) -> Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let archive = OoxmlArchive::open(input)
        .with_context(|| format!("Failed to open package: {}", input.display()))?;

    if archive.contains(docugen_pptx::writer::PRESENTATION_PATH) {
        let deck = DeckReader::from_archive(&archive)
            .with_context(|| format!("Failed to read deck: {}", input.display()))?;
        match format {
            OutputFormat::Json => {
                let slides: Vec<_> = deck.slides().iter().map(|s| &s.paragraphs).collect();
                let json = serde_json::json!({
                    "type": OutputType::Slides,
                    "title": deck.title(),
                    "slides": slides,
                });
                Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
            }
            OutputFormat::Text => {
                let mut out = format!("Title: {}\n", deck.title().unwrap_or(""));
                for (i, slide) in deck.slides().iter().enumerate() {
                    out.push_str(&format!("Slide {}:\n", i + 1));
                    for text in &slide.paragraphs {
                        out.push_str(&format!("  {}\n", text));
                    }
                }
                Ok(out)
            }
        }
    } else {
        let document = DocumentReader::from_archive(&archive)
            .with_context(|| format!("Failed to read document: {}", input.display()))?;
        match format {
            OutputFormat::Json => {
                let paragraphs: Vec<_> = document
                    .text_paragraphs()
                    .map(|p| p.text.as_str())
                    .collect();
                let json = serde_json::json!({
                    "type": OutputType::Document,
                    "title": document.title(),
                    "headings": document.headings().collect::<Vec<_>>(),
                    "paragraphs": paragraphs,
                });
                Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
            }
            OutputFormat::Text => {
                let mut out = format!("Title: {}\n", document.title().unwrap_or(""));
                for paragraph in document.paragraphs() {
                    if paragraph.page_break {
                        out.push_str("---- page break ----\n");
                    }
                    if paragraph.text.is_empty() {
                        continue;
                    }
                    if paragraph.is_heading() {
                        out.push_str(&format!("# {}\n", paragraph.text));
                    } else {
                        out.push_str(&format!("  {}\n", paragraph.text));
                    }
                }
                Ok(out)
            }
        }
    }
}
