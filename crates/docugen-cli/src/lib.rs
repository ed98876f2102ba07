//! docugen CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docugen, including:
//! - Generate: Synthesize an outline from a topic (and optionally export it)
//! - Render: Export an outline JSON file to PPTX or DOCX
//! - Themes: List the palettes and fonts
//! - Inspect: Print the text of an exported file
//!
//! # Library Usage
//!
//! ```ignore
//! use docugen_cli::{run_cli, render_command, ThemeArgs};
//!
//! // Run the full CLI
//! run_cli()?;
//!
//! // Or use individual commands programmatically
//! render_command(&input, &catalog, &theme)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Synthesize a deck outline and export it
//! docugen generate "Q3 planning" --type slides -n 6 --render --palette ruby
//!
//! # Export an existing outline as a document
//! docugen render outline.json --font serif --out-dir out/
//!
//! # Read an export back
//! docugen inspect Q3_Plan_Presentation.pptx --format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    export_outline, generate_command, inspect_report, render_command, render_outline, run_cli,
    select_theme, themes_report, AppConfig, OutputFormat, ThemeArgs,
};
