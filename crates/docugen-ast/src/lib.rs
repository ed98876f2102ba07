//! docugen-ast - Outline model and theme catalog
//!
//! This crate provides the types shared by every docugen component:
//! - Generation parameters collected by the user interface
//! - The outline model produced by synthesis and consumed by the renderers
//! - The theme catalog (palettes and fonts)
//! - Export artifacts and their file naming

pub mod export;
pub mod outline;
pub mod params;
pub mod theme;

pub use export::{suggested_file_name, ExportedFile};
pub use outline::{DocumentSection, GeneratedData, OutlineError, OutlineItems, SlideContent};
pub use params::{
    GenerationParams, Language, OutputType, ParseEnumError, Tone, ValidationError, MAX_COUNT,
    MIN_COUNT,
};
pub use theme::{neutral, RgbColor, ThemeCatalog, ThemeError, ThemeFont, ThemePalette};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product name printed in exported branding captions and metadata
pub const PRODUCT_NAME: &str = "DocuGenius AI";
