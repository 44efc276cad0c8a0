use chrono::NaiveDate;
use reviewdoc::assembler::{AssemblyOptions, Layout};
use reviewdoc::config::ToolConfig;
use reviewdoc::editor::{EditOp, SectionEditor};
use reviewdoc::extractor::SourceKind;
use reviewdoc::pipeline::{self, Destination};
use std::fs;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

fn heading(style: &str, text: &str) -> String {
    format!(r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
}

fn bullet(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

/// Write a minimal .docx package holding `body` as its document body
fn write_docx(path: &Path, body: &str) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {W_NS}><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    zip.write_all(xml.as_bytes()).unwrap();

    zip.finish().unwrap();
}

fn review_body() -> String {
    [
        heading("Heading1", "Lucky Casino Review"),
        paragraph("Lucky Casino opened in 2021."),
        paragraph("It holds a Malta licence."),
        heading("Heading2", "Pros and Cons"),
        bullet("Fast payouts"),
        bullet("Large game library"),
        heading("Heading2", "Welcome Bonus"),
        paragraph("Get 100% up to 500 on your first deposit."),
    ]
    .concat()
}

fn fixed_options() -> AssemblyOptions {
    AssemblyOptions {
        last_updated: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        ..AssemblyOptions::default()
    }
}

#[test]
fn test_docx_extracts_to_html() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("review.docx");
    write_docx(&input, &review_body());

    let extracted = pipeline::extract(&input, None).unwrap();
    assert_eq!(extracted.kind, SourceKind::Docx);
    assert!(extracted
        .html
        .starts_with("<h1>Lucky Casino Review</h1><p>Lucky Casino opened in 2021.</p>"));
    assert!(extracted
        .html
        .contains("<ul><li>Fast payouts</li><li>Large game library</li></ul>"));
}

#[test]
fn test_docx_to_comparison_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("review.docx");
    write_docx(&input, &review_body());

    let html = pipeline::convert(&input, None, Layout::Comparison, &fixed_options()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>Lucky Casino Review</h1>"));
    assert!(html.contains(
        "<p class=\"intro\">Lucky Casino opened in 2021.</p>\n        <p class=\"intro\">It holds a Malta licence.</p>"
    ));
    assert!(html.contains("<time datetime=\"2024-03\">March 2024</time>"));
    assert!(html.contains("[elementor-template id=\"1128\"]"));
    assert!(html.contains(
        "<h2>Pros and Cons</h2>\n<ul>\n  <li>Fast payouts</li>\n  <li>Large game library</li>\n</ul>\n<h2>Welcome Bonus</h2>\n<p>Get 100% up to 500 on your first deposit.</p>"
    ));
    assert!(html.ends_with("</html>"));
}

#[test]
fn test_docx_to_single_subject_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("review.docx");
    write_docx(&input, &review_body());

    let html = pipeline::convert(&input, None, Layout::SingleSubject, &fixed_options()).unwrap();

    assert!(html.contains("<h1>Lucky Casino Review</h1>"));
    assert!(html.contains("<h3>Welcome Bonus</h3>\n<p>Get 100% up to 500 on your first deposit.</p>"));
    // The pros/cons pane keeps its placeholder by default
    assert!(!html.contains("<li>Fast payouts</li>"));
}

#[test]
fn test_edit_and_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("review.docx");
    write_docx(&input, &review_body());

    let extracted = pipeline::extract(&input, None).unwrap();
    let mut editor =
        pipeline::prepare_editor(&extracted.html, None, "/css/site.css").unwrap();
    assert_eq!(editor.sections().len(), 7);

    let ops: Vec<EditOp> = ["style:section-0=hero", "delete:section-2", "move:section-6=0"]
        .iter()
        .map(|op| op.parse().unwrap())
        .collect();
    pipeline::apply_edits(&mut editor, &ops).unwrap();

    let ids: Vec<&str> = editor.sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        ["section-6", "section-0", "section-1", "section-3", "section-4", "section-5"]
    );

    let destination = Destination::resolve(&input, None, false).unwrap();
    assert_eq!(destination, Destination::File(dir.path().join("review.html")));
    pipeline::export(&editor.render(), &destination).unwrap();

    let written = fs::read_to_string(dir.path().join("review.html")).unwrap();
    assert!(written.contains("<link rel=\"stylesheet\" href=\"/css/site.css\">"));
    assert!(written.contains("<p>Get 100% up to 500 on your first deposit.</p>"));
    assert!(written.contains("Lucky Casino Review"));
    assert!(written.contains("hero-section"));
    assert!(!written.contains("It holds a Malta licence."));
}

#[test]
fn test_plain_text_forced_kind() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.data");
    fs::write(&input, "OVERVIEW\nQuick Facts\n- Licensed\n- Mobile friendly\n").unwrap();

    let extracted = pipeline::extract(&input, Some(SourceKind::PlainText)).unwrap();
    assert_eq!(
        extracted.html,
        "<h2>OVERVIEW</h2>\n<h3>Quick Facts</h3>\n<ul><li>Licensed</li><li>Mobile friendly</li></ul>"
    );
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.data");
    fs::write(&input, "hello").unwrap();

    assert!(pipeline::extract(&input, None).is_err());
}

#[test]
fn test_config_round_trip_feeds_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ToolConfig::default();
    config.stylesheet = "/css/reviews.css".to_string();
    config.embed_template_id = "42".to_string();
    config.save(dir.path().join("reviewdoc.toml")).unwrap();

    let config = ToolConfig::discover(None, dir.path()).unwrap();
    let html = reviewdoc::assembler::assemble(
        "<h1>Title</h1><p>Intro</p>",
        Layout::Comparison,
        &config.assembly_options(),
    )
    .unwrap();
    assert!(html.contains("href=\"/css/reviews.css\""));
    assert!(html.contains("[elementor-template id=\"42\"]"));
}

#[test]
fn test_editor_from_extracted_html_renders_every_section() {
    let editor = SectionEditor::from_html("<h2>A</h2><p>b</p><ul><li>c</li></ul>");
    let page = editor.render();
    assert!(page.contains("<h2>A</h2>"));
    assert!(page.contains("<ul><li>c</li></ul>"));
}
