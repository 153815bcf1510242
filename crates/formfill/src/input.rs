use std::path::Path;

use docx::DocxPackage;
use formfill_core::{parse_fields, Anchor, Document};

use crate::prelude::*;

/// Where a loaded document came from, and so how it can be written back.
pub enum Source {
    Package(Box<DocxPackage>),
    Json,
}

pub struct LoadedDocument {
    pub document: Document,
    source: Source,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Read and parse a field list. Any failure here happens before a document is opened.
pub fn load_fields(path: &Path) -> Result<Vec<Anchor>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("Failed to read fields file {}", path.display()))?;
    let anchors = parse_fields(&raw).wrap_err_with(|| f!("Failed to load fields from {}", path.display()))?;
    log::debug!("loaded {} field(s) from {}", anchors.len(), path.display());
    Ok(anchors)
}

/// Open a `.docx` form or a `.json` document model.
pub fn load_document(path: &Path) -> Result<LoadedDocument> {
    match extension(path).as_str() {
        "docx" => {
            let package = docx::read(path).wrap_err_with(|| f!("Failed to open {}", path.display()))?;
            Ok(LoadedDocument {
                document: package.document(),
                source: Source::Package(Box::new(package)),
            })
        }
        "json" => {
            let raw = std::fs::read_to_string(path)
                .wrap_err_with(|| f!("Failed to read {}", path.display()))?;
            let document: Document = serde_json::from_str(&raw)
                .wrap_err_with(|| f!("Failed to parse document model {}", path.display()))?;
            Ok(LoadedDocument {
                document,
                source: Source::Json,
            })
        }
        _ => Err(Error::UnsupportedDocument(path.display().to_string()).into()),
    }
}

impl LoadedDocument {
    /// Write `document` to `path`. The format follows the extension of `path`.
    pub fn save(&self, document: &Document, path: &Path) -> Result<()> {
        match (extension(path).as_str(), &self.source) {
            ("json", _) => {
                let json = serde_json::to_string_pretty(document)?;
                std::fs::write(path, json).wrap_err_with(|| f!("Failed to write {}", path.display()))?;
            }
            ("docx", Source::Package(package)) => {
                docx::write(path, package, document).wrap_err_with(|| f!("Failed to save {}", path.display()))?;
            }
            ("docx", Source::Json) => return Err(Error::NoPackage(path.display().to_string()).into()),
            _ => return Err(Error::UnsupportedDocument(path.display().to_string()).into()),
        }
        log::info!("saved {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_fields_flat_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "fields.json", r#"{"Full Name": "Ana", "Age": 30}"#);
        let anchors = load_fields(&path).unwrap();
        assert_eq!(anchors, vec![Anchor::new("Full Name", "Ana"), Anchor::new("Age", "30")]);
    }

    #[test]
    fn test_load_fields_rejects_scalar() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "fields.json", "42");
        assert!(load_fields(&path).is_err());
    }

    #[test]
    fn test_load_fields_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_fields(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_json_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "form.json",
            r#"{"paragraphs": [{"text": "Full Name: ____"}], "tables": []}"#,
        );
        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded.document.paragraphs[0].text, "Full Name: ____");

        let mut document = loaded.document.clone();
        document.paragraphs[0].text = "Full Name: Ana".to_string();
        let output = dir.path().join("out.JSON");
        loaded.save(&document, &output).unwrap();

        let reloaded = load_document(&output).unwrap();
        assert_eq!(reloaded.document, document);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "form.odt", "");
        let err = load_document(&path).err().unwrap();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnsupportedDocument(_))));
    }

    #[test]
    fn test_docx_output_needs_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "form.json", r#"{"paragraphs": []}"#);
        let loaded = load_document(&path).unwrap();
        let err = loaded
            .save(&loaded.document, &dir.path().join("result.docx"))
            .err()
            .unwrap();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoPackage(_))));
    }
}
