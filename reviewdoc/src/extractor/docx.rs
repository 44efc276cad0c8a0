//! WordprocessingML (.docx) to HTML conversion
//!
//! Reads `word/document.xml` out of the package and maps it onto plain
//! semantic HTML: heading styles become `<h1>`-`<h6>`, numbered paragraphs
//! become nested `<ul>`/`<ol>` lists, tables keep their row/cell structure,
//! and bold/italic runs and external hyperlinks are preserved. Empty
//! paragraphs are dropped.

use super::error::ExtractError;
use crate::dom::{escape_attr, escape_text};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::read::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
const NUMBERING_PART: &str = "word/numbering.xml";

type XmlReader<'a> = Reader<&'a [u8]>;

/// A body-level block of the document
#[derive(Debug)]
enum Block {
    Paragraph(Paragraph),
    /// Rows of cells, each cell holding its own blocks
    Table(Vec<Vec<Vec<Block>>>),
}

#[derive(Debug, Default)]
struct Paragraph {
    style: Option<String>,
    list: Option<ListRef>,
    inlines: Vec<Inline>,
}

impl Paragraph {
    fn is_empty(&self) -> bool {
        self.inlines.iter().all(|inline| match inline {
            Inline::Text(run) => run.text.trim().is_empty(),
            Inline::Break => false,
        })
    }

    /// Append an inline, merging it into the previous run when formatting matches
    fn push(&mut self, inline: Inline) {
        if let (Some(Inline::Text(last)), Inline::Text(next)) = (self.inlines.last_mut(), &inline)
        {
            if last.same_format(next) {
                last.text.push_str(&next.text);
                return;
            }
        }
        self.inlines.push(inline);
    }
}

/// Numbering reference of a list paragraph
#[derive(Debug, Clone)]
struct ListRef {
    num_id: String,
    level: u8,
}

#[derive(Debug)]
enum Inline {
    Text(TextRun),
    Break,
}

#[derive(Debug, Clone, Default)]
struct TextRun {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
    /// Relationship id of the enclosing hyperlink
    link: Option<String>,
}

impl TextRun {
    fn same_format(&self, other: &TextRun) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.link == other.link
    }
}

/// Convert a .docx package to an HTML fragment
///
/// # Parameters
/// * `bytes` - Raw bytes of the uploaded .docx file
///
/// # Returns
/// * `Ok(String)` - HTML fragment for the document body
/// * `Err(ExtractError)` - The package or its XML could not be read
pub fn docx_to_html(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let document_xml =
        read_part(&mut archive, DOCUMENT_PART)?.ok_or(ExtractError::MissingPart(DOCUMENT_PART))?;

    let links = match read_part(&mut archive, RELATIONSHIPS_PART)? {
        Some(xml) => parse_relationships(&xml)?,
        None => HashMap::new(),
    };

    let numbering = match read_part(&mut archive, NUMBERING_PART)? {
        Some(xml) => Numbering::parse(&xml)?,
        None => Numbering::default(),
    };

    let blocks = parse_document(&document_xml)?;
    log::debug!(
        "Read {} body blocks, {} hyperlink targets, {} numbering instances",
        blocks.len(),
        links.len(),
        numbering.instances.len()
    );

    let renderer = Renderer {
        links: &links,
        numbering: &numbering,
    };
    Ok(renderer.blocks(&blocks))
}

/// Read a part of the package as text, `None` when the part does not exist
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &'static str,
) -> Result<Option<String>, ExtractError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|source| ExtractError::PartReadError { part: name, source })?;
    Ok(Some(xml))
}

/// Read an attribute value, unescaped
fn attribute(element: &BytesStart, name: &str) -> Result<Option<String>, ExtractError> {
    let Some(attr) = element.try_get_attribute(name)? else {
        return Ok(None);
    };
    let value = attr.unescape_value()?;
    Ok(Some(value.into_owned()))
}

/// Whether a toggle property such as `<w:b/>` or `<w:b w:val="0"/>` is on
fn toggle_on(element: &BytesStart) -> Result<bool, ExtractError> {
    Ok(match attribute(element, "w:val")? {
        None => true,
        Some(value) => !matches!(value.as_str(), "0" | "false" | "off" | "none"),
    })
}

fn skip(reader: &mut XmlReader, element: &BytesStart) -> Result<(), ExtractError> {
    reader.read_to_end(element.name())?;
    Ok(())
}

fn parse_document(xml: &str) -> Result<Vec<Block>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:body" => {
                return read_blocks(&mut reader, b"w:body");
            }
            Event::Eof => return Ok(Vec::new()),
            _ => {}
        }
    }
}

/// Read paragraphs and tables until the closing tag `end`
///
/// Unknown wrappers (content controls, smart tags) are descended into.
fn read_blocks(reader: &mut XmlReader, end: &[u8]) -> Result<Vec<Block>, ExtractError> {
    let mut blocks = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => blocks.push(Block::Paragraph(read_paragraph(reader)?)),
                b"w:tbl" => blocks.push(Block::Table(read_table(reader)?)),
                b"w:sectPr" | b"w:tcPr" => skip(reader, &e)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == end => return Ok(blocks),
            Event::Eof => return Ok(blocks),
            _ => {}
        }
    }
}

fn read_paragraph(reader: &mut XmlReader) -> Result<Paragraph, ExtractError> {
    let mut paragraph = Paragraph::default();
    let mut link: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:pPr" => read_paragraph_properties(reader, &mut paragraph)?,
                b"w:r" => {
                    for inline in read_run(reader, link.as_deref())? {
                        paragraph.push(inline);
                    }
                }
                b"w:hyperlink" => link = attribute(&e, "r:id")?,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:hyperlink" => link = None,
                b"w:p" => return Ok(paragraph),
                _ => {}
            },
            Event::Eof => return Ok(paragraph),
            _ => {}
        }
    }
}

fn read_paragraph_properties(
    reader: &mut XmlReader,
    paragraph: &mut Paragraph,
) -> Result<(), ExtractError> {
    let mut num_id: Option<String> = None;
    let mut level: u8 = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:pStyle" => paragraph.style = attribute(&e, "w:val")?,
                b"w:numId" => num_id = attribute(&e, "w:val")?,
                b"w:ilvl" => {
                    level = attribute(&e, "w:val")?
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0)
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:pPr" => break,
            Event::Eof => break,
            _ => {}
        }
    }

    // numId 0 removes numbering inherited from the style
    paragraph.list = num_id
        .filter(|id| id != "0")
        .map(|num_id| ListRef { num_id, level });
    Ok(())
}

fn read_run(reader: &mut XmlReader, link: Option<&str>) -> Result<Vec<Inline>, ExtractError> {
    let mut format = TextRun {
        link: link.map(str::to_string),
        ..TextRun::default()
    };
    let mut inlines = Vec::new();
    let mut in_text = false;

    let text = |format: &TextRun, text: String| {
        Inline::Text(TextRun {
            text,
            ..format.clone()
        })
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:b" => format.bold = toggle_on(&e)?,
                b"w:i" => format.italic = toggle_on(&e)?,
                b"w:u" => format.underline = toggle_on(&e)?,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:b" => format.bold = toggle_on(&e)?,
                b"w:i" => format.italic = toggle_on(&e)?,
                b"w:u" => format.underline = toggle_on(&e)?,
                b"w:tab" => inlines.push(text(&format, "\t".to_string())),
                b"w:br" | b"w:cr" => inlines.push(Inline::Break),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let value = t.unescape()?;
                inlines.push(text(&format, value.into_owned()));
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => return Ok(inlines),
                _ => {}
            },
            Event::Eof => return Ok(inlines),
            _ => {}
        }
    }
}

fn read_table(reader: &mut XmlReader) -> Result<Vec<Vec<Vec<Block>>>, ExtractError> {
    let mut rows = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tr" => rows.push(read_row(reader)?),
                b"w:tblPr" | b"w:tblGrid" => skip(reader, &e)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:tbl" => return Ok(rows),
            Event::Eof => return Ok(rows),
            _ => {}
        }
    }
}

fn read_row(reader: &mut XmlReader) -> Result<Vec<Vec<Block>>, ExtractError> {
    let mut cells = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tc" => cells.push(read_blocks(reader, b"w:tc")?),
                b"w:trPr" | b"w:tblPrEx" => skip(reader, &e)?,
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:tr" => return Ok(cells),
            Event::Eof => return Ok(cells),
            _ => {}
        }
    }
}

/// External hyperlink targets keyed by relationship id
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut links = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let external = attribute(&e, "TargetMode")?.is_some_and(|mode| mode == "External");
                if let (true, Some(id), Some(target)) =
                    (external, attribute(&e, "Id")?, attribute(&e, "Target")?)
                {
                    links.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(links)
}

/// List formats from `word/numbering.xml`
#[derive(Debug, Default)]
struct Numbering {
    /// (abstractNumId, level) -> numFmt
    formats: HashMap<(String, u8), String>,
    /// numId -> abstractNumId
    instances: HashMap<String, String>,
}

impl Numbering {
    fn parse(xml: &str) -> Result<Self, ExtractError> {
        let mut reader = Reader::from_str(xml);
        let mut numbering = Self::default();
        let mut abstract_id: Option<String> = None;
        let mut level: Option<u8> = None;
        let mut num_id: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"w:abstractNum" => abstract_id = attribute(&e, "w:abstractNumId")?,
                    b"w:lvl" => {
                        level = attribute(&e, "w:ilvl")?.and_then(|v| v.parse().ok());
                    }
                    b"w:numFmt" => {
                        if let (Some(id), Some(lvl), Some(format)) =
                            (abstract_id.clone(), level, attribute(&e, "w:val")?)
                        {
                            numbering.formats.insert((id, lvl), format);
                        }
                    }
                    b"w:num" => num_id = attribute(&e, "w:numId")?,
                    b"w:abstractNumId" => {
                        if let (Some(num), Some(id)) = (num_id.clone(), attribute(&e, "w:val")?) {
                            numbering.instances.insert(num, id);
                        }
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"w:abstractNum" => abstract_id = None,
                    b"w:lvl" => level = None,
                    b"w:num" => num_id = None,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(numbering)
    }

    /// Unknown numbering renders as a bulleted list
    fn is_ordered(&self, list: &ListRef) -> bool {
        self.instances
            .get(&list.num_id)
            .and_then(|abstract_id| self.formats.get(&(abstract_id.clone(), list.level)))
            .is_some_and(|format| format != "bullet" && format != "none")
    }
}

/// Heading level for a paragraph style id ("Heading2" -> 2, "Title" -> 1)
fn heading_level(style: &str) -> Option<u8> {
    let normalized: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    if normalized == "title" {
        return Some(1);
    }
    normalized
        .strip_prefix("heading")
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=6).contains(n))
}

struct ListItem {
    level: u8,
    ordered: bool,
    html: String,
}

struct Renderer<'a> {
    links: &'a HashMap<String, String>,
    numbering: &'a Numbering,
}

impl Renderer<'_> {
    fn blocks(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        let mut pending: Vec<ListItem> = Vec::new();

        for block in blocks {
            match block {
                Block::Paragraph(paragraph) if paragraph.list.is_some() => {
                    if paragraph.is_empty() {
                        continue;
                    }
                    if let Some(list) = &paragraph.list {
                        pending.push(ListItem {
                            level: list.level,
                            ordered: self.numbering.is_ordered(list),
                            html: self.inlines(&paragraph.inlines),
                        });
                    }
                }
                Block::Paragraph(paragraph) => {
                    flush_list(&mut pending, &mut out);
                    self.paragraph(paragraph, &mut out);
                }
                Block::Table(rows) => {
                    flush_list(&mut pending, &mut out);
                    self.table(rows, &mut out);
                }
            }
        }
        flush_list(&mut pending, &mut out);

        out
    }

    fn paragraph(&self, paragraph: &Paragraph, out: &mut String) {
        if paragraph.is_empty() {
            return;
        }
        let content = self.inlines(&paragraph.inlines);
        match paragraph.style.as_deref().and_then(heading_level) {
            Some(level) => out.push_str(&format!("<h{level}>{content}</h{level}>")),
            None => out.push_str(&format!("<p>{content}</p>")),
        }
    }

    fn table(&self, rows: &[Vec<Vec<Block>>], out: &mut String) {
        out.push_str("<table>");
        for row in rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str("<td>");
                out.push_str(&self.blocks(cell));
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
    }

    fn inlines(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Break => out.push_str("<br>"),
                Inline::Text(run) => {
                    let mut html = escape_text(&run.text);
                    if run.bold {
                        html = format!("<strong>{}</strong>", html);
                    }
                    if run.italic {
                        html = format!("<em>{}</em>", html);
                    }
                    if run.underline {
                        html = format!("<u>{}</u>", html);
                    }
                    if let Some(target) = run.link.as_ref().and_then(|id| self.links.get(id)) {
                        html = format!("<a href=\"{}\">{}</a>", escape_attr(target), html);
                    }
                    out.push_str(&html);
                }
            }
        }
        out
    }
}

fn flush_list(pending: &mut Vec<ListItem>, out: &mut String) {
    if !pending.is_empty() {
        render_list(pending, out);
        pending.clear();
    }
}

/// Render a run of list items, nesting deeper levels inside the previous item
fn render_list(items: &[ListItem], out: &mut String) {
    let tag = if items[0].ordered { "ol" } else { "ul" };
    out.push_str(&format!("<{}>", tag));

    let mut index = 0;
    while index < items.len() {
        let item = &items[index];
        let nested_end = items[index + 1..]
            .iter()
            .position(|next| next.level <= item.level)
            .map_or(items.len(), |offset| index + 1 + offset);

        out.push_str("<li>");
        out.push_str(&item.html);
        if nested_end > index + 1 {
            render_list(&items[index + 1..nested_end], out);
        }
        out.push_str("</li>");

        index = nested_end;
    }

    out.push_str(&format!("</{}>", tag));
}
