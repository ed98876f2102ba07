//! Exported file artifacts and naming

use std::path::{Path, PathBuf};

use crate::params::OutputType;

/// A finished export: the package bytes and the name to save them under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Suggested file name (`Title_Words_Presentation.pptx`)
    pub file_name: String,
    /// MIME type of the package
    pub content_type: &'static str,
    /// Complete package bytes
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Wrap package bytes rendered from an outline titled `title`
    pub fn new(title: &str, output_type: OutputType, bytes: Vec<u8>) -> Self {
        Self {
            file_name: suggested_file_name(title, output_type),
            content_type: output_type.content_type(),
            bytes,
        }
    }

    /// Write the package into `dir` under its suggested name
    ///
    /// The name must be a single path component, so the file always lands
    /// directly inside `dir`.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let name = match Path::new(&self.file_name).file_name() {
            Some(name) if name == self.file_name.as_str() => name,
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("'{}' is not a plain file name", self.file_name),
                ))
            }
        };
        let path = dir.as_ref().join(name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Derive the download name of an export from the outline title
///
/// Every run of whitespace becomes a single `_`, then the type suffix and
/// extension are appended. Path separators and other characters that are
/// not allowed in file names also become `_`.
pub fn suggested_file_name(title: &str, output_type: OutputType) -> String {
    let stem: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();
    let stem = if stem.is_empty() { "Untitled" } else { &stem };
    format!(
        "{}_{}.{}",
        stem,
        output_type.file_suffix(),
        output_type.extension()
    )
}

fn is_reserved(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}
