//! Writing generated HTML

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name used when there is no source document name
pub const DEFAULT_OUTPUT_NAME: &str = "converted-content.html";

/// Output file name for a source document
///
/// The source's extension is replaced with `.html`, keeping its directory.
///
/// # Parameters
/// * `source` - Path of the uploaded document, if known
///
/// # Returns
/// * `PathBuf` - e.g. `review.docx` -> `review.html`, `None` -> `converted-content.html`
pub fn output_file_name(source: Option<&Path>) -> PathBuf {
    match source {
        Some(path) if path.file_stem().is_some() => path.with_extension("html"),
        _ => PathBuf::from(DEFAULT_OUTPUT_NAME),
    }
}

/// Write an HTML document, creating parent directories as needed
pub fn write_html(path: &Path, html: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, html)?;
    log::info!("Wrote {} bytes to {}", html.len(), path.display());
    Ok(())
}
