//! Three-stage conversion pipeline
//!
//! This module orchestrates the stages the command line runs:
//! 1. **Extraction**: Read the uploaded document into HTML
//! 2. **Structuring**: Assemble a page skeleton, or build editable sections
//!    (heuristic parse or assisted analysis) and apply edits
//! 3. **Export**: Write the resulting HTML to a file or stdout

use crate::assembler::{self, AssemblyError, AssemblyOptions, Layout};
use crate::classifier::assisted::{self, ClassifierError, TextGenerator};
use crate::editor::{EditOp, EditorError, SectionEditor};
use crate::export;
use crate::extractor::{self, ExtractError, Extracted, SourceKind};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where generated HTML goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl Destination {
    /// Resolve the destination for a source document
    ///
    /// An explicit output path wins; otherwise the source name with an
    /// `.html` extension is used. Refuses to overwrite the source itself.
    pub fn resolve(
        source: &Path,
        output: Option<PathBuf>,
        to_stdout: bool,
    ) -> Result<Self, PipelineError> {
        if to_stdout {
            return Ok(Destination::Stdout);
        }
        let path = output.unwrap_or_else(|| export::output_file_name(Some(source)));
        if path == source {
            return Err(PipelineError::WouldOverwriteInput(path));
        }
        Ok(Destination::File(path))
    }
}

/// Stage 1: Extract a document into HTML
///
/// # Parameters
/// * `input` - Path to the uploaded document
/// * `forced` - Document kind overriding the file extension
///
/// # Returns
/// * `Ok(Extracted)` - HTML and the kind the document was read as
/// * `Err(PipelineError)` - The document could not be read
pub fn extract(input: &Path, forced: Option<SourceKind>) -> Result<Extracted, PipelineError> {
    Ok(extractor::extract_file(input, forced)?)
}

/// Stage 2: Assemble extracted HTML into a page skeleton
pub fn assemble(
    extracted: &Extracted,
    layout: Layout,
    options: &AssemblyOptions,
) -> Result<String, PipelineError> {
    Ok(assembler::assemble(&extracted.html, layout, options)?)
}

/// Stage 2: Build editable sections from extracted HTML
///
/// With a generator the assisted analysis replaces the parsed sections; a
/// failed analysis is an error and the parsed sections are not used instead.
///
/// # Parameters
/// * `html` - Extracted HTML
/// * `generator` - Text-generation service for assisted analysis, if requested
/// * `stylesheet` - Stylesheet linked from the rendered page
pub fn prepare_editor(
    html: &str,
    generator: Option<&dyn TextGenerator>,
    stylesheet: &str,
) -> Result<SectionEditor, PipelineError> {
    let mut editor = SectionEditor::from_html(html).with_stylesheet(stylesheet);

    if let Some(generator) = generator {
        let suggestions =
            assisted::analyze(generator, html, &assisted::registry_style_nodes())?;
        editor.replace_with_analysis(suggestions);
    }

    Ok(editor)
}

/// Apply edit operations in order, stopping at the first failure
pub fn apply_edits(editor: &mut SectionEditor, ops: &[EditOp]) -> Result<(), PipelineError> {
    for op in ops {
        editor.apply(op)?;
    }
    Ok(())
}

/// Stage 3: Export HTML
pub fn export(html: &str, destination: &Destination) -> Result<(), PipelineError> {
    match destination {
        Destination::File(path) => export::write_html(path, html)
            .map_err(|e| PipelineError::ExportError(path.clone(), e)),
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(html.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .map_err(|e| PipelineError::ExportError(PathBuf::from("<stdout>"), e))
        }
    }
}

/// Extract and assemble a document in one call
pub fn convert(
    input: &Path,
    forced: Option<SourceKind>,
    layout: Layout,
    options: &AssemblyOptions,
) -> Result<String, PipelineError> {
    let extracted = extract(input, forced)?;
    assemble(&extracted, layout, options)
}

/// Errors that can occur while running the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Refusing to overwrite the input document {path}; pass --output", path = .0.display())]
    WouldOverwriteInput(PathBuf),

    #[error("Failed to write {path}: {source}", path = .0.display(), source = .1)]
    ExportError(PathBuf, #[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_destination_defaults_to_source_name() {
        let destination = Destination::resolve(Path::new("in/review.docx"), None, false).unwrap();
        assert_eq!(destination, Destination::File(PathBuf::from("in/review.html")));

        let destination =
            Destination::resolve(Path::new("review.docx"), Some("out.html".into()), false)
                .unwrap();
        assert_eq!(destination, Destination::File(PathBuf::from("out.html")));

        let destination = Destination::resolve(Path::new("review.docx"), None, true).unwrap();
        assert_eq!(destination, Destination::Stdout);
    }

    #[test]
    fn test_destination_refuses_to_overwrite_html_input() {
        let err = Destination::resolve(Path::new("page.html"), None, false).unwrap_err();
        assert!(matches!(err, PipelineError::WouldOverwriteInput(_)));
    }

    #[test]
    fn test_convert_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("review.txt");
        fs::write(
            &input,
            "LUCKY CASINO\nFirst intro sentence.\nSecond intro sentence.\nWelcome Bonus\nA generous match on your first deposit.\n",
        )
        .unwrap();

        let html = convert(&input, None, Layout::SingleSubject, &AssemblyOptions::default())
            .unwrap();
        assert!(html.contains("<h1>LUCKY CASINO</h1>"));
        assert!(html.contains("<h4>Welcome Bonus</h4>\n<p>A generous match on your first deposit.</p>"));
    }

    #[test]
    fn test_failed_analysis_is_an_error() {
        struct Offline;
        impl TextGenerator for Offline {
            fn generate(&self, _prompt: &str) -> Result<String, ClassifierError> {
                Err(ClassifierError::MissingCredential("ANTHROPIC_API_KEY".to_string()))
            }
        }

        let err = prepare_editor("<p>x</p>", Some(&Offline), "/s.css").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Classifier(ClassifierError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_apply_edits_stops_at_unknown_section() {
        let mut editor = prepare_editor("<p>a</p><p>b</p>", None, "/s.css").unwrap();
        let ops: Vec<EditOp> = vec!["down:section-0".parse().unwrap(), "delete:section-9".parse().unwrap()];

        let err = apply_edits(&mut editor, &ops).unwrap_err();
        assert!(matches!(err, PipelineError::Editor(EditorError::UnknownSection(_))));
        // The first edit was applied
        assert_eq!(editor.sections()[0].id, "section-1");
    }
}
