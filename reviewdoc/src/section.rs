//! Section model for extracted document content
//!
//! A section is one orderable unit of extracted content (a heading, a
//! paragraph, a list, a table, or a model-suggested group) together with the
//! style template assigned to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Heading,
    Paragraph,
    List,
    Table,
    Group,
}

impl SectionKind {
    /// Style template assigned to freshly parsed sections of this kind
    pub fn default_style(self) -> &'static str {
        match self {
            SectionKind::Heading => "heading",
            SectionKind::Paragraph | SectionKind::Group => "body",
            SectionKind::List => "featureList",
            SectionKind::Table => "comparisonTable",
        }
    }

    /// Upper-case label used in section listings
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Heading => "HEADING",
            SectionKind::Paragraph => "PARAGRAPH",
            SectionKind::List => "LIST",
            SectionKind::Table => "TABLE",
            SectionKind::Group => "GROUP",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Heading => "heading",
            SectionKind::Paragraph => "paragraph",
            SectionKind::List => "list",
            SectionKind::Table => "table",
            SectionKind::Group => "group",
        };
        write!(f, "{}", name)
    }
}

/// One classified, orderable unit of extracted content
///
/// Serialized field names follow the JSON shape the analysis endpoint and
/// the section listing use (`type`, `content`, `htmlContent`, `styleNode`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable identifier (e.g., "section-3")
    pub id: String,
    /// Kind of content
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Plain text content of the section
    #[serde(rename = "content")]
    pub text: String,
    /// Serialized HTML of the section
    #[serde(rename = "htmlContent")]
    pub markup: String,
    /// Identifier of the assigned style template
    #[serde(rename = "styleNode")]
    pub style_id: String,
    /// Render position; unique within a section list, gaps allowed
    pub order: i64,
    /// Heading level (1-6), only set for headings
    #[serde(rename = "level", default, skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,
}

impl Section {
    /// Create a section with the default style for its kind
    ///
    /// # Parameters
    /// * `kind` - Kind of content
    /// * `text` - Plain text content
    /// * `markup` - Serialized HTML
    /// * `order` - Render position; also used to derive the id
    ///
    /// # Returns
    /// * `Section` - A section with id `section-<order>`
    pub fn new(kind: SectionKind, text: String, markup: String, order: i64) -> Self {
        Self {
            id: section_id(order),
            kind,
            text,
            markup,
            style_id: kind.default_style().to_string(),
            order,
            heading_level: None,
        }
    }

    /// Set the heading level
    pub fn with_level(mut self, level: u8) -> Self {
        self.heading_level = Some(level);
        self
    }

    /// Short preview of the text content (first 50 characters, "..." when cut)
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 50;

        let mut preview: String = self.text.chars().take(PREVIEW_CHARS).collect();
        if self.text.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

/// Build the identifier for a section created at `index`
pub fn section_id(index: i64) -> String {
    format!("section-{}", index)
}
