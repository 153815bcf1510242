#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unsupported document type: {0} (expected .docx or .json)")]
    UnsupportedDocument(String),

    #[error("Cannot write {0}: a .docx output needs a .docx input")]
    NoPackage(String),

    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}
