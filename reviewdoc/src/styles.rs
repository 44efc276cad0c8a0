//! Style template registry
//!
//! A closed, immutable table mapping a style id to a function that wraps a
//! section's markup in the style's HTML.

use serde::Serialize;
use std::fmt;

/// Broad grouping of a style, used for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Structure,
    Content,
    Interactive,
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleCategory::Structure => "structure",
            StyleCategory::Content => "content",
            StyleCategory::Interactive => "interactive",
        };
        write!(f, "{}", name)
    }
}

/// A named visual template applied to a section's markup
#[derive(Debug, Clone, Copy)]
pub struct StyleTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: StyleCategory,
    pub render: fn(&str) -> String,
}

impl StyleTemplate {
    /// Wrap `markup` in this style
    pub fn apply(&self, markup: &str) -> String {
        (self.render)(markup)
    }
}

static STYLE_TEMPLATES: &[StyleTemplate] = &[
    StyleTemplate {
        id: "body",
        name: "Body Text",
        description: "Standard paragraph text",
        icon: "📄",
        category: StyleCategory::Content,
        render: body,
    },
    StyleTemplate {
        id: "platformCard",
        name: "Platform Card",
        description: "Casino/platform review card with styling",
        icon: "🎰",
        category: StyleCategory::Structure,
        render: platform_card,
    },
    StyleTemplate {
        id: "hero",
        name: "Hero Section",
        description: "Large intro section with emphasis",
        icon: "🎯",
        category: StyleCategory::Structure,
        render: hero,
    },
    StyleTemplate {
        id: "faqItem",
        name: "FAQ Item",
        description: "Question and answer format",
        icon: "❓",
        category: StyleCategory::Interactive,
        render: faq_item,
    },
    StyleTemplate {
        id: "comparisonTable",
        name: "Comparison Table",
        description: "Styled comparison table",
        icon: "📊",
        category: StyleCategory::Content,
        render: comparison_table,
    },
    StyleTemplate {
        id: "featureList",
        name: "Feature List",
        description: "Highlighted feature list with icons",
        icon: "✨",
        category: StyleCategory::Content,
        render: feature_list,
    },
    StyleTemplate {
        id: "proscons",
        name: "Pros & Cons",
        description: "Two-column pros and cons layout",
        icon: "⚖️",
        category: StyleCategory::Content,
        render: pros_cons,
    },
    StyleTemplate {
        id: "statsBar",
        name: "Stats Bar",
        description: "Visual statistics bar",
        icon: "📈",
        category: StyleCategory::Interactive,
        render: stats_bar,
    },
    StyleTemplate {
        id: "tabContent",
        name: "Tab Content",
        description: "Content within a tab",
        icon: "📑",
        category: StyleCategory::Structure,
        render: tab_content,
    },
    StyleTemplate {
        id: "heading",
        name: "Heading",
        description: "Section heading",
        icon: "📌",
        category: StyleCategory::Structure,
        render: heading,
    },
];

/// Every registered style, in registry order
pub fn all() -> &'static [StyleTemplate] {
    STYLE_TEMPLATES
}

/// Look up a style by id
pub fn lookup(id: &str) -> Option<&'static StyleTemplate> {
    STYLE_TEMPLATES.iter().find(|template| template.id == id)
}

fn body(content: &str) -> String {
    format!("<div class=\"body-text\">{content}</div>")
}

fn platform_card(content: &str) -> String {
    format!(
        r#"
      <div class="platform-card">
        <div class="platform-card__header">
          <div class="platform-card__title-section">
            {content}
          </div>
        </div>
        <div class="platform-card__body">
          <div class="platform-card__content">
            {content}
          </div>
        </div>
      </div>"#
    )
}

fn hero(content: &str) -> String {
    format!(
        r#"
      <div class="hero-section">
        <div class="hero-section__content">
          {content}
        </div>
      </div>"#
    )
}

fn faq_item(content: &str) -> String {
    format!(
        r#"
      <div class="faq-item">
        <div class="faq-item__question">
          {content}
        </div>
        <div class="faq-item__answer">
          {content}
        </div>
      </div>"#
    )
}

fn comparison_table(content: &str) -> String {
    format!(
        r#"
      <div class="comparison-table-container">
        <table class="comparison-table">
          {content}
        </table>
      </div>"#
    )
}

fn feature_list(content: &str) -> String {
    format!(
        r#"
      <div class="feature-list">
        <ul class="feature-list__items">
          {content}
        </ul>
      </div>"#
    )
}

fn pros_cons(content: &str) -> String {
    format!(
        r#"
      <div class="pros-cons-section">
        <div class="pros-cons-section__grid">
          {content}
        </div>
      </div>"#
    )
}

fn stats_bar(content: &str) -> String {
    format!(
        r#"
      <div class="stats-bar">
        <div class="stats-bar__content">
          {content}
        </div>
      </div>"#
    )
}

fn tab_content(content: &str) -> String {
    format!(
        r#"
      <div class="tab-content">
        {content}
      </div>"#
    )
}

fn heading(content: &str) -> String {
    format!("<h2 class=\"section-heading\">{content}</h2>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_unique_ids() {
        let ids: HashSet<&str> = all().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(all().len(), 10);
    }

    #[test]
    fn test_lookup() {
        let template = lookup("faqItem").unwrap();
        assert_eq!(template.name, "FAQ Item");
        assert_eq!(template.category, StyleCategory::Interactive);
        assert!(lookup("missing").is_none());
    }

    #[test]
    fn test_body_wraps_content() {
        assert_eq!(
            lookup("body").unwrap().apply("<p>x</p>"),
            "<div class=\"body-text\"><p>x</p></div>"
        );
    }

    #[test]
    fn test_duplicating_templates_repeat_content() {
        let html = lookup("platformCard").unwrap().apply("<p>Card</p>");
        assert_eq!(html.matches("<p>Card</p>").count(), 2);

        let html = lookup("faqItem").unwrap().apply("<p>Q</p>");
        assert_eq!(html.matches("<p>Q</p>").count(), 2);
    }

    #[test]
    fn test_every_template_contains_content() {
        for template in all() {
            assert!(
                template.apply("MARKER").contains("MARKER"),
                "{} dropped its content",
                template.id
            );
        }
    }
}
