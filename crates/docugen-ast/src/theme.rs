//! Theme catalog: color palettes and font families
//!
//! A theme is chosen independently of content. Renderers receive the selected
//! [`ThemePalette`] and [`ThemeFont`] by reference and never consult any
//! global selection.
//!
//! The built-in catalog can be replaced by a TOML file:
//!
//! ```toml
//! [[palettes]]
//! id = "slate"
//! name = "Quiet Slate"
//! primary = "475569"
//! dark = "0F172A"
//! light = "F8FAFC"
//! accent = "94A3B8"
//! bg_gradient = "from-slate-800 via-slate-600 to-slate-900"
//!
//! [[fonts]]
//! id = "sans"
//! name = "Modern Sans"
//! family = "Arial"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or loading a theme catalog
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A color is not six hexadecimal digits
    #[error("Invalid color '{0}': expected six hex digits such as 4F46E5")]
    InvalidColor(String),

    /// A palette or font has an empty id
    #[error("Theme entry '{name}' has an empty id")]
    EmptyId { name: String },

    /// Two entries of the same kind share an id
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    /// A font entry names no family
    #[error("Font '{id}' has an empty family")]
    EmptyFamily { id: String },

    /// The catalog has no palette or no font
    #[error("Theme catalog must define at least one {0}")]
    Empty(&'static str),

    /// I/O error while reading a catalog file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// An sRGB color written as six upper-case hex digits (no `#`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor(String);

impl RgbColor {
    /// Parse a color, accepting an optional leading `#`
    pub fn parse(value: &str) -> Result<Self, ThemeError> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(hex.to_ascii_uppercase()))
        } else {
            Err(ThemeError::InvalidColor(value.to_string()))
        }
    }

    /// The hex digits, as written into OOXML `val` attributes
    pub fn hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RgbColor {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.0
    }
}

/// A named color set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    /// Unique key
    pub id: String,
    /// Display name
    pub name: String,
    /// Brand color (bars, rules, headings)
    pub primary: RgbColor,
    /// Deep background and dark text
    pub dark: RgbColor,
    /// Light text on dark backgrounds
    pub light: RgbColor,
    /// Highlight color (subtitle, accent bar)
    pub accent: RgbColor,
    /// Decorative gradient used only by on-screen previews
    #[serde(default)]
    pub bg_gradient: String,
}

/// A named font family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeFont {
    /// Unique key
    pub id: String,
    /// Display name
    pub name: String,
    /// Font family written into exported text runs
    pub family: String,
}

/// Ordered catalog of palettes and fonts
///
/// Every catalog holds at least one palette and one font with unique ids:
/// the only ways to obtain one are [`ThemeCatalog::builtin`],
/// [`ThemeCatalog::new`] and deserialization, and the last two validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogEntries", into = "CatalogEntries")]
pub struct ThemeCatalog {
    palettes: Vec<ThemePalette>,
    fonts: Vec<ThemeFont>,
}

/// Serialized shape of a catalog (`[[palettes]]` and `[[fonts]]` tables)
#[derive(Clone, Serialize, Deserialize)]
struct CatalogEntries {
    palettes: Vec<ThemePalette>,
    fonts: Vec<ThemeFont>,
}

impl TryFrom<CatalogEntries> for ThemeCatalog {
    type Error = ThemeError;

    fn try_from(entries: CatalogEntries) -> Result<Self, Self::Error> {
        Self::new(entries.palettes, entries.fonts)
    }
}

impl From<ThemeCatalog> for CatalogEntries {
    fn from(catalog: ThemeCatalog) -> Self {
        Self {
            palettes: catalog.palettes,
            fonts: catalog.fonts,
        }
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn palette(
    id: &str,
    name: &str,
    colors: [&str; 4],
    bg_gradient: &str,
) -> ThemePalette {
    let [primary, dark, light, accent] = colors.map(|hex| RgbColor(hex.to_string()));
    ThemePalette {
        id: id.to_string(),
        name: name.to_string(),
        primary,
        dark,
        light,
        accent,
        bg_gradient: bg_gradient.to_string(),
    }
}

fn font(id: &str, name: &str, family: &str) -> ThemeFont {
    ThemeFont {
        id: id.to_string(),
        name: name.to_string(),
        family: family.to_string(),
    }
}

impl ThemeCatalog {
    /// Build a catalog, checking ids, families and non-emptiness
    ///
    /// The first palette and the first font are the defaults.
    pub fn new(palettes: Vec<ThemePalette>, fonts: Vec<ThemeFont>) -> Result<Self, ThemeError> {
        validate_entries(&palettes, &fonts)?;
        Ok(Self { palettes, fonts })
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self {
            palettes: vec![
                palette(
                    "indigo",
                    "Modern Indigo",
                    ["4F46E5", "1E1B4B", "F8FAFC", "818CF8"],
                    "from-indigo-800 via-indigo-600 to-purple-800",
                ),
                palette(
                    "emerald",
                    "Professional Emerald",
                    ["10B981", "064E3B", "F0FDF4", "34D399"],
                    "from-emerald-800 via-emerald-600 to-teal-800",
                ),
                palette(
                    "ruby",
                    "Corporate Ruby",
                    ["E11D48", "4C0519", "FFF1F2", "FB7185"],
                    "from-rose-800 via-rose-600 to-pink-800",
                ),
                palette(
                    "amber",
                    "Sunset Business",
                    ["F59E0B", "451A03", "FFFBEB", "FBBF24"],
                    "from-amber-800 via-amber-600 to-orange-800",
                ),
            ],
            fonts: vec![
                font("sans", "Modern Sans", "Arial"),
                font("serif", "Classic Serif", "Georgia"),
                font("mono", "Technical Mono", "Courier New"),
            ],
        }
    }

    /// Parse and validate a catalog from TOML
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Palettes in display order
    pub fn palettes(&self) -> &[ThemePalette] {
        &self.palettes
    }

    /// Fonts in display order
    pub fn fonts(&self) -> &[ThemeFont] {
        &self.fonts
    }

    /// Find a palette by id
    pub fn palette(&self, id: &str) -> Option<&ThemePalette> {
        self.palettes.iter().find(|p| p.id == id)
    }

    /// Find a font by id
    pub fn font(&self, id: &str) -> Option<&ThemeFont> {
        self.fonts.iter().find(|f| f.id == id)
    }

    /// The palette selected when a session starts
    pub fn default_palette(&self) -> &ThemePalette {
        // Non-empty by construction
        &self.palettes[0]
    }

    /// The font selected when a session starts
    pub fn default_font(&self) -> &ThemeFont {
        // Non-empty by construction
        &self.fonts[0]
    }
}

fn validate_entries(palettes: &[ThemePalette], fonts: &[ThemeFont]) -> Result<(), ThemeError> {
    if palettes.is_empty() {
        return Err(ThemeError::Empty("palette"));
    }
    if fonts.is_empty() {
        return Err(ThemeError::Empty("font"));
    }

    let mut seen = HashSet::new();
    for p in palettes {
        check_id(&p.id, &p.name)?;
        if !seen.insert(p.id.as_str()) {
            return Err(ThemeError::DuplicateId {
                kind: "palette",
                id: p.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for f in fonts {
        check_id(&f.id, &f.name)?;
        if f.family.trim().is_empty() {
            return Err(ThemeError::EmptyFamily { id: f.id.clone() });
        }
        if !seen.insert(f.id.as_str()) {
            return Err(ThemeError::DuplicateId {
                kind: "font",
                id: f.id.clone(),
            });
        }
    }

    Ok(())
}

fn check_id(id: &str, name: &str) -> Result<(), ThemeError> {
    if id.trim().is_empty() {
        return Err(ThemeError::EmptyId {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Fixed colors shared by every theme (white canvas, slate text)
pub mod neutral {
    use super::RgbColor;

    /// Content slide background
    pub fn white() -> RgbColor {
        RgbColor("FFFFFF".to_string())
    }

    /// Body text on light backgrounds
    pub fn body_text() -> RgbColor {
        RgbColor("334155".to_string())
    }

    /// Branding captions and dates
    pub fn caption() -> RgbColor {
        RgbColor("64748B".to_string())
    }

    /// Footer lines
    pub fn muted() -> RgbColor {
        RgbColor("94A3B8".to_string())
    }

    /// Slide index watermark
    pub fn watermark() -> RgbColor {
        RgbColor("F1F5F9".to_string())
    }
}
