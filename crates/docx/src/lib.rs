use std::path::Path;

use thiserror::Error;

use formfill_core::Document;

pub mod layout;
pub mod package;
pub mod render;

use layout::BodyLayout;
use package::PackageEntry;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Package part not found: {0}")]
    MissingPart(String),
    #[error("Malformed document body: {0}")]
    Malformed(String),
    #[error("Document structure does not match the package it was read from")]
    StructureMismatch,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// An opened `.docx` package.
///
/// Constructed via [`DocxPackage::from_bytes`]. Holds the original zip
/// entries, the byte layout of the main document part and the text snapshot
/// taken at load time, so that [`DocxPackage::to_bytes`] can rewrite only the
/// regions whose text changed.
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
    main_part: String,
    layout: BodyLayout,
    snapshot: Document,
}

impl DocxPackage {
    /// Open a package from its bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let entries = package::read_entries(bytes)?;
        let main_part = package::main_part_name(&entries)?;

        let xml = entries
            .iter()
            .find(|e| e.name == main_part)
            .ok_or_else(|| DocxError::MissingPart(main_part.clone()))?;
        let (snapshot, layout) = layout::parse_body(&xml.data)?;

        Ok(DocxPackage {
            entries,
            main_part,
            layout,
            snapshot,
        })
    }

    /// Text model of the document as loaded.
    pub fn document(&self) -> Document {
        self.snapshot.clone()
    }

    /// Name of the main document part inside the zip.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Serialize the package with the texts of `document`.
    ///
    /// `document` must have the same shape as [`DocxPackage::document`].
    pub fn to_bytes(&self, document: &Document) -> Result<Vec<u8>, DocxError> {
        let original = self
            .entries
            .iter()
            .find(|e| e.name == self.main_part)
            .ok_or_else(|| DocxError::MissingPart(self.main_part.clone()))?;

        let replacements = render::changed_regions(&original.data, &self.layout, &self.snapshot, document)?;
        log::debug!("rewriting {} region(s) in {}", replacements.len(), self.main_part);
        let xml = render::splice(&original.data, replacements)?;

        package::write_entries(self.entries.iter().map(|e| {
            let data = if e.name == self.main_part {
                xml.as_slice()
            } else {
                e.data.as_slice()
            };
            (e.name.as_str(), data, e.is_dir)
        }))
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions
// ---------------------------------------------------------------------------

/// Open a `.docx` file.
pub fn read(path: &Path) -> Result<DocxPackage, DocxError> {
    let bytes = std::fs::read(path)?;
    DocxPackage::from_bytes(&bytes)
}

/// Save `document` into a new `.docx` file based on `package`.
pub fn write(path: &Path, package: &DocxPackage, document: &Document) -> Result<(), DocxError> {
    let bytes = package.to_bytes(document)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
