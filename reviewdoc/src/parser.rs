//! Structural parser
//!
//! Flattens an extracted HTML tree into an ordered list of sections. The
//! walk starts at the children of `<body>` and descends into containers
//! until it reaches a heading, a non-empty paragraph, a list or a table;
//! each of those becomes one section and is not descended into further.

use crate::dom::{self, element_children, outer_html, tag_name, text_content};
use crate::section::{Section, SectionKind};
use markup5ever_rcdom::Handle;

/// Parse an HTML fragment into sections in document order
///
/// # Parameters
/// * `html` - Extracted HTML (fragment or full document)
///
/// # Returns
/// * `Vec<Section>` - Sections with `order` counting up from zero and default styles
pub fn parse_sections(html: &str) -> Vec<Section> {
    let document = dom::parse_html(html);
    let Some(body) = dom::body(&document) else {
        return Vec::new();
    };

    let sections: Vec<Section> = content_elements(&body)
        .into_iter()
        .enumerate()
        .map(|(index, (kind, element))| {
            let section = Section::new(
                kind,
                text_content(&element),
                outer_html(&element),
                index as i64,
            );
            match tag_name(&element).as_deref().and_then(heading_level) {
                Some(level) => section.with_level(level),
                None => section,
            }
        })
        .collect();

    log::debug!("Parsed {} sections", sections.len());
    sections
}

/// Content elements below `root` in document order
///
/// Headings, non-empty paragraphs, lists and tables are returned as-is;
/// every other element is descended into.
pub fn content_elements(root: &Handle) -> Vec<(SectionKind, Handle)> {
    let mut found = Vec::new();
    let mut pending: Vec<Handle> = element_children(root).into_iter().rev().collect();

    while let Some(element) = pending.pop() {
        match content_kind(&element) {
            Some(kind) => found.push((kind, element)),
            None => pending.extend(element_children(&element).into_iter().rev()),
        }
    }

    found
}

/// Heading level of an `h1`-`h6` tag name
pub fn heading_level(tag: &str) -> Option<u8> {
    let level = tag.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn content_kind(element: &Handle) -> Option<SectionKind> {
    let tag = tag_name(element)?;
    match tag.as_str() {
        _ if heading_level(&tag).is_some() => Some(SectionKind::Heading),
        "p" if !text_content(element).trim().is_empty() => Some(SectionKind::Paragraph),
        "ul" | "ol" => Some(SectionKind::List),
        "table" => Some(SectionKind::Table),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("hr"), None);
        assert_eq!(heading_level("p"), None);
    }

    #[test]
    fn test_flat_document() {
        let sections = parse_sections(
            "<h1>Casino Review</h1><p>Intro</p><ul><li>A</li></ul><table><tr><td>x</td></tr></table>",
        );
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Heading,
                SectionKind::Paragraph,
                SectionKind::List,
                SectionKind::Table
            ]
        );
        assert_eq!(sections[0].heading_level, Some(1));
        assert_eq!(sections[0].text, "Casino Review");
        assert_eq!(sections[2].style_id, "featureList");
        assert_eq!(sections[3].style_id, "comparisonTable");
        assert_eq!(
            sections.iter().map(|s| s.order).collect_vec(),
            vec![0, 1, 2, 3]
        );
        assert_eq!(sections[3].id, "section-3");
    }

    #[test]
    fn test_whitespace_paragraphs_dropped() {
        let sections = parse_sections("<p>   </p><p>\n</p><p>Real</p>");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].text, "Real");
        assert_eq!(sections[0].order, 0);
    }

    #[test]
    fn test_descends_into_containers() {
        let sections = parse_sections(
            "<div><section><h2>Bonuses</h2><div><p>Welcome offer</p></div></section></div>",
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].markup, "<h2>Bonuses</h2>");
        assert_eq!(sections[1].markup, "<p>Welcome offer</p>");
    }

    #[test]
    fn test_list_is_not_split() {
        let sections = parse_sections("<ul><li><p>One</p></li><li>Two</li></ul>");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::List);
        assert_eq!(sections[0].text, "OneTwo");
    }

    fn assert_round_trip(html: &str) {
        let first = parse_sections(html);
        let joined = first.iter().map(|s| s.markup.as_str()).join("");
        let second = parse_sections(&joined);
        assert_eq!(first, second, "markup changed on re-parse: {}", joined);
    }

    #[test]
    fn test_markup_round_trip() {
        assert_round_trip(
            "<h2 class=\"x\">Fish &amp; Chips</h2><p>a<br>b</p><table><tr><td>1</td></tr></table>",
        );
    }

    #[test]
    fn test_markup_round_trip_leading_newlines() {
        assert_round_trip("<p>a<textarea>\n\nb</textarea></p>");
        assert_round_trip("<ul><li><pre>\n\ncode</pre></li></ul>");
        assert_round_trip("<ol><li><listing>\n\nx</listing></li></ol>");
    }

    #[test]
    fn test_markup_round_trip_raw_text() {
        assert_round_trip("<p>x<noscript>&lt;b&gt;</noscript></p>");
        assert_round_trip("<ul><li><xmp><b>1 & 2</b></xmp></li></ul>");
        assert_round_trip("<p>f<iframe>&lt;i&gt;</iframe><noembed>&amp;</noembed></p>");
    }

    #[test]
    fn test_deeply_nested_content() {
        let depth = 20_000;
        let html = format!("{}<h2>Deep</h2>{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let sections = parse_sections(&html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].markup, "<h2>Deep</h2>");
    }
}
