//! Line-based plain-text to HTML conversion
//!
//! Used for `.txt`/`.md` uploads. Each non-empty line becomes one block:
//!
//! - an all-caps line is a `<h2>`
//! - a short line without terminal punctuation is a `<h3>`
//! - a line starting with `- `, `* ` or `• ` is a list item; consecutive
//!   items are grouped into one `<ul>`
//! - anything else is a `<p>`

use crate::dom::escape_text;

const BULLET_MARKERS: &[&str] = &["- ", "* ", "• "];
const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', ':', ';', ','];
const MAX_SUBHEADING_CHARS: usize = 60;
const MAX_SUBHEADING_WORDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Heading(&'a str),
    Subheading(&'a str),
    Bullet(&'a str),
    Paragraph(&'a str),
}

fn classify_line(line: &str) -> Line<'_> {
    if let Some(item) = BULLET_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
    {
        return Line::Bullet(item.trim_start());
    }

    let has_letters = line.chars().any(char::is_alphabetic);
    if has_letters && !line.chars().any(char::is_lowercase) {
        return Line::Heading(line);
    }

    let short = line.chars().count() <= MAX_SUBHEADING_CHARS
        && line.split_whitespace().count() <= MAX_SUBHEADING_WORDS;
    if short && !line.ends_with(TERMINAL_PUNCTUATION) {
        return Line::Subheading(line);
    }

    Line::Paragraph(line)
}

/// Convert plain text to an HTML fragment
///
/// # Parameters
/// * `text` - Document text, one block per line
///
/// # Returns
/// * `String` - HTML fragment with all text escaped
pub fn text_to_html(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut blocks: Vec<String> = Vec::new();
    let mut items: Vec<String> = Vec::new();

    let flush = |items: &mut Vec<String>, blocks: &mut Vec<String>| {
        if !items.is_empty() {
            blocks.push(format!("<ul>{}</ul>", items.concat()));
            items.clear();
        }
    };

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classify_line(line) {
            Line::Bullet(item) => items.push(format!("<li>{}</li>", escape_text(item))),
            other => {
                flush(&mut items, &mut blocks);
                blocks.push(match other {
                    Line::Heading(t) => format!("<h2>{}</h2>", escape_text(t)),
                    Line::Subheading(t) => format!("<h3>{}</h3>", escape_text(t)),
                    Line::Paragraph(t) | Line::Bullet(t) => format!("<p>{}</p>", escape_text(t)),
                });
            }
        }
    }
    flush(&mut items, &mut blocks);

    blocks.join("\n")
}
