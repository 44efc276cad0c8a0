//! Error types for document extraction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning an uploaded document into HTML
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("Unsupported input file: {path} (expected .docx, .txt, .md, .html or .htm)", path = .0.display())]
    UnsupportedInput(PathBuf),

    #[error("Not a valid .docx package: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Document package is missing required part '{0}'")]
    MissingPart(&'static str),

    #[error("Failed to read document part '{part}': {source}")]
    PartReadError {
        part: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document XML: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Malformed document XML attribute: {0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("Document text is not valid UTF-8: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),
}
