//! Archive handling for OOXML packages
//!
//! DOCX and PPTX files are ZIP archives containing XML parts. The archive is
//! held fully in memory so a package is either completely assembled or not
//! written at all.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{OoxmlError, Result};

/// An unpacked OOXML package
#[derive(Debug, Default)]
pub struct OoxmlArchive {
    /// All parts in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a package from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Unpack a package held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(std::io::Cursor::new(bytes))
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        Ok(Self { files })
    }

    /// Get a part's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get a part's contents, failing when it is absent
    pub fn require(&self, path: &str) -> Result<&[u8]> {
        self.get(path)
            .ok_or_else(|| OoxmlError::MissingFile(path.to_string()))
    }

    /// Get a part's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Check if a part exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// List all part paths in the archive
    pub fn file_list(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the archive has no parts
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Set or update a part's contents
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into().into_bytes());
    }

    /// Write the archive to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Serialize the archive into a byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write the archive to any writer
    ///
    /// `[Content_Types].xml` is written first, the other parts follow in
    /// sorted order so output is deterministic.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        let mut paths: Vec<_> = self.files.keys().collect();
        paths.sort_by(|a, b| {
            let a_key = (a.as_str() != CONTENT_TYPES_PATH, a.as_str());
            let b_key = (b.as_str() != CONTENT_TYPES_PATH, b.as_str());
            a_key.cmp(&b_key)
        });

        for path in paths {
            let contents = &self.files[path];
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Path of the package content types part
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";
