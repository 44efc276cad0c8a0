//! Section editor state
//!
//! Holds the parsed sections of one document together with their style
//! assignments, and renders them into a preview page on demand.
//!
//! The section list is kept sorted by `order`. Reordering moves a section to
//! a new index and hands the existing `order` values back out in the new
//! sequence, so the values stay a strict ranking and an adjacent move is a
//! swap of two values.

use crate::classifier::assisted::{into_sections, SuggestedSection};
use crate::dom::escape_attr;
use crate::parser::parse_sections;
use crate::section::Section;
use crate::styles;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stylesheet linked from the rendered page unless configured otherwise
pub const DEFAULT_EDITOR_STYLESHEET: &str = "/css/styling-test-page-fixed.css";

/// Errors from editor operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditorError {
    #[error("No section with id '{0}'")]
    UnknownSection(String),

    #[error("Cannot move to index {index}: there are {len} sections")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid edit operation '{0}' (expected style:ID=STYLE, up:ID, down:ID, move:ID=INDEX, delete:ID or select:ID)")]
    InvalidOperation(String),
}

/// In-memory editing state for one document
#[derive(Debug, Clone)]
pub struct SectionEditor {
    sections: Vec<Section>,
    selected: Option<String>,
    stylesheet: String,
}

impl SectionEditor {
    /// Create an editor over existing sections, selecting the first one
    pub fn from_sections(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|section| section.order);
        let selected = sections.first().map(|section| section.id.clone());
        Self {
            sections,
            selected,
            stylesheet: DEFAULT_EDITOR_STYLESHEET.to_string(),
        }
    }

    /// Parse extracted HTML into sections and create an editor over them
    pub fn from_html(html: &str) -> Self {
        Self::from_sections(parse_sections(html))
    }

    /// Link a different stylesheet from the rendered page
    pub fn with_stylesheet(mut self, stylesheet: impl Into<String>) -> Self {
        self.stylesheet = stylesheet.into();
        self
    }

    /// Replace every section with the suggestions of an assisted analysis
    pub fn replace_with_analysis(&mut self, suggestions: Vec<SuggestedSection>) {
        let sections = into_sections(suggestions);
        log::info!(
            "Replacing {} sections with {} suggested sections",
            self.sections.len(),
            sections.len()
        );
        *self = Self {
            stylesheet: std::mem::take(&mut self.stylesheet),
            ..Self::from_sections(sections)
        };
    }

    /// Sections in render order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Find a section by id
    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    fn position(&self, id: &str) -> Result<usize, EditorError> {
        self.sections
            .iter()
            .position(|section| section.id == id)
            .ok_or_else(|| EditorError::UnknownSection(id.to_string()))
    }

    /// Mark a section as selected
    pub fn select(&mut self, id: &str) -> Result<(), EditorError> {
        self.position(id)?;
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// The selected section, if any
    pub fn selected(&self) -> Option<&Section> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Assign a style to a section
    ///
    /// Any style id is accepted; an unknown one renders the section's raw markup.
    pub fn set_style(&mut self, id: &str, style_id: &str) -> Result<(), EditorError> {
        let index = self.position(id)?;
        if styles::lookup(style_id).is_none() {
            log::warn!("Style '{}' is not registered; '{}' will render unstyled", style_id, id);
        }
        self.sections[index].style_id = style_id.to_string();
        Ok(())
    }

    /// Move a section one place towards the start
    ///
    /// # Returns
    /// * `Ok(true)` - The section moved
    /// * `Ok(false)` - The section was already first
    pub fn move_up(&mut self, id: &str) -> Result<bool, EditorError> {
        match self.position(id)? {
            0 => Ok(false),
            index => self.move_to(id, index - 1),
        }
    }

    /// Move a section one place towards the end
    ///
    /// # Returns
    /// * `Ok(true)` - The section moved
    /// * `Ok(false)` - The section was already last
    pub fn move_down(&mut self, id: &str) -> Result<bool, EditorError> {
        let index = self.position(id)?;
        if index + 1 >= self.sections.len() {
            return Ok(false);
        }
        self.move_to(id, index + 1)
    }

    /// Move a section to `index` in render order
    ///
    /// # Parameters
    /// * `id` - Section to move
    /// * `index` - Target position, zero-based
    ///
    /// # Returns
    /// * `Ok(bool)` - Whether the sequence changed
    /// * `Err(EditorError)` - Unknown section or index past the end
    pub fn move_to(&mut self, id: &str, index: usize) -> Result<bool, EditorError> {
        let from = self.position(id)?;
        if index >= self.sections.len() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        if from == index {
            return Ok(false);
        }

        let orders: Vec<i64> = self.sections.iter().map(|section| section.order).collect();
        let section = self.sections.remove(from);
        self.sections.insert(index, section);
        for (section, order) in self.sections.iter_mut().zip(orders) {
            section.order = order;
        }

        log::debug!("Moved {} from {} to {}", id, from, index);
        Ok(true)
    }

    /// Remove a section; the remaining `order` values keep their gaps
    pub fn delete(&mut self, id: &str) -> Result<Section, EditorError> {
        let index = self.position(id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(self.sections.remove(index))
    }

    /// Render the final page
    ///
    /// Sections are sorted by `order`, wrapped in their style and joined by
    /// newlines. Calling this twice without edits in between yields the same
    /// string.
    pub fn render(&self) -> String {
        let body = self
            .sections
            .iter()
            .sorted_by_key(|section| section.order)
            .map(|section| match styles::lookup(&section.style_id) {
                Some(template) => template.apply(&section.markup),
                None => section.markup.clone(),
            })
            .join("\n");

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="{}">
  <title>Preview</title>
</head>
<body>
  {}
</body>
</html>"#,
            escape_attr(&self.stylesheet),
            body
        )
    }

    /// One-line summaries of every section, in render order
    pub fn summaries(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|section| {
                let style = styles::lookup(&section.style_id);
                SectionSummary {
                    id: section.id.clone(),
                    kind: section.kind.label(),
                    icon: style.map_or("📄", |s| s.icon),
                    preview: section.preview(),
                    style: style.map_or("None", |s| s.name),
                    selected: self.selected.as_deref() == Some(section.id.as_str()),
                }
            })
            .collect()
    }

    /// Apply one edit operation
    pub fn apply(&mut self, op: &EditOp) -> Result<(), EditorError> {
        log::debug!("Applying {}", op);
        match op {
            EditOp::SetStyle { id, style } => self.set_style(id, style),
            EditOp::MoveUp(id) => self.move_up(id).map(|_| ()),
            EditOp::MoveDown(id) => self.move_down(id).map(|_| ()),
            EditOp::MoveTo { id, index } => self.move_to(id, *index).map(|_| ()),
            EditOp::Delete(id) => self.delete(id).map(|_| ()),
            EditOp::Select(id) => self.select(id),
        }
    }
}

/// Listing entry for a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon: &'static str,
    pub preview: String,
    pub style: &'static str,
    pub selected: bool,
}

impl fmt::Display for SectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.selected { '>' } else { ' ' };
        write!(
            f,
            "{} {:<12} {} {:<9} {:<50}  Style: {}",
            marker, self.id, self.icon, self.kind, self.preview, self.style
        )
    }
}

/// An edit given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// `style:ID=STYLE`
    SetStyle { id: String, style: String },
    /// `up:ID`
    MoveUp(String),
    /// `down:ID`
    MoveDown(String),
    /// `move:ID=INDEX`
    MoveTo { id: String, index: usize },
    /// `delete:ID`
    Delete(String),
    /// `select:ID`
    Select(String),
}

impl FromStr for EditOp {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EditorError::InvalidOperation(s.to_string());
        let (verb, rest) = s.split_once(':').ok_or_else(invalid)?;
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(invalid());
        }

        let key_value = || {
            rest.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .ok_or_else(invalid)
        };

        match verb.trim() {
            "style" => {
                let (id, style) = key_value()?;
                Ok(EditOp::SetStyle { id, style })
            }
            "move" => {
                let (id, index) = key_value()?;
                let index = index.parse().map_err(|_| invalid())?;
                Ok(EditOp::MoveTo { id, index })
            }
            "up" => Ok(EditOp::MoveUp(rest.to_string())),
            "down" => Ok(EditOp::MoveDown(rest.to_string())),
            "delete" => Ok(EditOp::Delete(rest.to_string())),
            "select" => Ok(EditOp::Select(rest.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::SetStyle { id, style } => write!(f, "style:{}={}", id, style),
            EditOp::MoveUp(id) => write!(f, "up:{}", id),
            EditOp::MoveDown(id) => write!(f, "down:{}", id),
            EditOp::MoveTo { id, index } => write!(f, "move:{}={}", id, index),
            EditOp::Delete(id) => write!(f, "delete:{}", id),
            EditOp::Select(id) => write!(f, "select:{}", id),
        }
    }
}
