//! Document extraction
//!
//! Turns an uploaded document into an HTML fragment that the structural
//! parser can walk. Word packages are converted to semantic HTML, plain text
//! goes through the line-based converter, and HTML is passed through.

mod docx;
mod error;
mod plain_text;

pub use docx::docx_to_html;
pub use error::ExtractError;
pub use plain_text::text_to_html;

use std::fs;
use std::path::{Path, PathBuf};

/// Kind of uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Word document (.docx)
    Docx,
    /// Plain text, one block per line (.txt, .md)
    #[value(name = "text")]
    PlainText,
    /// Already-extracted HTML (.html, .htm)
    Html,
}

impl SourceKind {
    /// Determine the document kind from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "docx" => Some(SourceKind::Docx),
            "txt" | "md" | "text" => Some(SourceKind::PlainText),
            "html" | "htm" => Some(SourceKind::Html),
            _ => None,
        }
    }
}

/// Result of extracting a document
#[derive(Debug, Clone)]
pub struct Extracted {
    /// HTML fragment of the document content
    pub html: String,
    /// How the document was read
    pub kind: SourceKind,
}

/// Extract HTML from document bytes
///
/// # Parameters
/// * `bytes` - Raw document content
/// * `kind` - How to interpret the content
///
/// # Returns
/// * `Ok(String)` - HTML fragment
/// * `Err(ExtractError)` - The document could not be read
pub fn extract(bytes: &[u8], kind: SourceKind) -> Result<String, ExtractError> {
    match kind {
        SourceKind::Docx => docx_to_html(bytes),
        SourceKind::PlainText => Ok(text_to_html(&String::from_utf8(bytes.to_vec())?)),
        SourceKind::Html => Ok(String::from_utf8(bytes.to_vec())?),
    }
}

/// Read and extract a document file
///
/// # Parameters
/// * `path` - Path to the uploaded document
/// * `forced` - Document kind overriding the file extension
///
/// # Returns
/// * `Ok(Extracted)` - HTML fragment and the kind it was read as
/// * `Err(ExtractError)` - The file could not be read or has an unsupported extension
pub fn extract_file(path: &Path, forced: Option<SourceKind>) -> Result<Extracted, ExtractError> {
    let kind = forced
        .or_else(|| SourceKind::from_path(path))
        .ok_or_else(|| ExtractError::UnsupportedInput(path.to_path_buf()))?;

    let bytes = fs::read(path).map_err(|e| ExtractError::IoError(PathBuf::from(path), e))?;
    log::info!("Extracting {} as {:?} ({} bytes)", path.display(), kind, bytes.len());

    let html = extract(&bytes, kind)?;
    log::debug!("Extracted {} bytes of HTML", html.len());

    Ok(Extracted { html, kind })
}
