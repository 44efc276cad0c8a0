//! Template assembler
//!
//! Maps the content of an extracted document into one of two fixed page
//! skeletons:
//!
//! - **comparison**: title, two intro paragraphs, then everything else in
//!   document order inside a single content section
//! - **single-subject**: title and intro, then a tabbed platform card whose
//!   panes (overview, bonuses, games, pros & cons) are filled by routing
//!   heading-bounded blocks on their classified category

use crate::classifier::{classify_heading, SectionCategory};
use crate::dom::{
    self, descendants_named, element_children, escape_attr, escape_html, tag_name, text_content,
};
use crate::parser::{content_elements, heading_level};
use crate::section::SectionKind;
use chrono::{Local, NaiveDate};
use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use thiserror::Error;

const COMPARISON_DEFAULT_TITLE: &str = "Your Article Title";
const SINGLE_SUBJECT_DEFAULT_TITLE: &str = "Casino Review 2025";
const INTRO_PARAGRAPHS: usize = 2;

/// Errors that can occur while assembling a page
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Extracted document has no body")]
    MissingBody,

    #[error("Failed to format page: {0}")]
    Fmt(#[from] fmt::Error),
}

/// Page skeleton to assemble into
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// Multi-subject comparison article
    Comparison,
    /// Single-subject review with a tabbed platform card
    SingleSubject,
}

/// Whether extracted text is HTML-escaped before it is placed in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapePolicy {
    #[default]
    Escape,
    Raw,
}

impl EscapePolicy {
    fn apply(self, text: &str) -> String {
        match self {
            EscapePolicy::Escape => escape_html(text),
            EscapePolicy::Raw => text.to_string(),
        }
    }
}

/// What the single-subject pros/cons pane shows once a pros/cons heading is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProsConsMode {
    /// Static "Edit pros here" / "Edit cons here" grid; detected content is dropped
    #[default]
    Placeholder,
    /// The detected pros/cons content inside the grid
    Detected,
}

/// Settings that shape the assembled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub stylesheet: String,
    pub language: String,
    pub embed_template_id: String,
    /// Date shown as the "last updated" month
    pub last_updated: NaiveDate,
    pub escape: EscapePolicy,
    pub pros_cons: ProsConsMode,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            stylesheet: "styling-test-page-fixed.css".to_string(),
            language: "en-GB".to_string(),
            embed_template_id: "1128".to_string(),
            last_updated: Local::now().date_naive(),
            escape: EscapePolicy::Escape,
            pros_cons: ProsConsMode::Placeholder,
        }
    }
}

/// A content block, with text still unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Heading {
        level: u8,
        text: String,
        category: SectionCategory,
    },
    Paragraph(String),
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Table(Vec<Vec<String>>),
}

/// Document content split into title, intro and the remaining blocks
#[derive(Debug, Default)]
struct Content {
    title: Option<String>,
    intro: Vec<String>,
    body: Vec<Block>,
}

/// Assemble extracted HTML into a complete page
///
/// # Parameters
/// * `html` - Extracted HTML of the document
/// * `layout` - Page skeleton to use
/// * `options` - Stylesheet, language, escaping and other page settings
///
/// # Returns
/// * `Ok(String)` - Complete HTML document
/// * `Err(AssemblyError)` - The content could not be read or formatted
pub fn assemble(
    html: &str,
    layout: Layout,
    options: &AssemblyOptions,
) -> Result<String, AssemblyError> {
    let content = read_content(html)?;
    log::info!(
        "Assembling {:?} page: {} intro paragraphs, {} body blocks",
        layout,
        content.intro.len(),
        content.body.len()
    );

    match layout {
        Layout::Comparison => comparison(&content, options),
        Layout::SingleSubject => single_subject(&content, options),
    }
}

fn read_content(html: &str) -> Result<Content, AssemblyError> {
    let document = dom::parse_html(html);
    let body = dom::body(&document).ok_or(AssemblyError::MissingBody)?;
    let mut content = Content::default();

    for (kind, element) in content_elements(&body) {
        match kind {
            SectionKind::Heading => {
                let text = text_content(&element).trim().to_string();
                if content.title.is_none() {
                    content.title = Some(text);
                    continue;
                }
                let level = tag_name(&element)
                    .as_deref()
                    .and_then(heading_level)
                    .unwrap_or(2);
                let category = classify_heading(&text);
                log::debug!("Heading '{}' (h{}) classified as {}", text, level, category);
                content.body.push(Block::Heading {
                    level,
                    text,
                    category,
                });
            }
            SectionKind::Paragraph => {
                let text = text_content(&element).trim().to_string();
                if content.intro.len() < INTRO_PARAGRAPHS {
                    content.intro.push(text);
                } else {
                    content.body.push(Block::Paragraph(text));
                }
            }
            SectionKind::List => {
                let items: Vec<String> = descendants_named(&element, "li")
                    .iter()
                    .map(|li| text_content(li).trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect();
                if !items.is_empty() {
                    let ordered = tag_name(&element).as_deref() == Some("ol");
                    content.body.push(Block::List { ordered, items });
                }
            }
            SectionKind::Table => {
                let rows = table_rows(&element);
                if !rows.is_empty() {
                    content.body.push(Block::Table(rows));
                }
            }
            SectionKind::Group => {}
        }
    }

    Ok(content)
}

fn table_rows(table: &Handle) -> Vec<Vec<String>> {
    descendants_named(table, "tr")
        .iter()
        .map(|row| {
            element_children(row)
                .iter()
                .filter(|cell| matches!(tag_name(cell).as_deref(), Some("td" | "th")))
                .map(|cell| text_content(cell).trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

fn write_block(
    out: &mut String,
    block: &Block,
    heading_tag: impl Fn(u8) -> u8,
    escape: EscapePolicy,
) -> fmt::Result {
    match block {
        Block::Heading { level, text, .. } => {
            let tag = heading_tag(*level);
            writeln!(out, "<h{tag}>{}</h{tag}>", escape.apply(text))
        }
        Block::Paragraph(text) => writeln!(out, "<p>{}</p>", escape.apply(text)),
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            writeln!(out, "<{tag}>")?;
            for item in items {
                writeln!(out, "  <li>{}</li>", escape.apply(item))?;
            }
            writeln!(out, "</{tag}>")
        }
        Block::Table(rows) => {
            out.push_str("<div class=\"table-container\">\n<div class=\"table-responsive\">\n<table class=\"platform-table\">\n<tbody>\n");
            for row in rows {
                out.push_str("<tr>\n");
                for (index, cell) in row.iter().enumerate() {
                    if index == 0 {
                        writeln!(out, "  <th scope=\"row\">{}</th>", escape.apply(cell))?;
                    } else {
                        writeln!(out, "  <td>{}</td>", escape.apply(cell))?;
                    }
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n</div>\n</div>\n");
            Ok(())
        }
    }
}

fn write_head(out: &mut String, options: &AssemblyOptions) -> fmt::Result {
    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="{language}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="{stylesheet}">
</head>
<body>

<div class="crypto-betting-widget" id="main-content">
<article>
"#,
        language = escape_attr(&options.language),
        stylesheet = escape_attr(&options.stylesheet),
    )
}

fn write_tail(out: &mut String, script: &str) {
    out.push_str("</article>\n</div>\n\n<script>\n");
    out.push_str(script);
    out.push_str("</script>\n\n</body>\n</html>");
}

fn intro_lines(content: &Content, escape: EscapePolicy, separator: &str) -> String {
    content
        .intro
        .iter()
        .map(|p| format!("<p class=\"intro\">{}</p>", escape.apply(p)))
        .collect::<Vec<_>>()
        .join(separator)
}

fn title_or<'a>(content: &'a Content, default: &'a str) -> &'a str {
    content
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or(default)
}

/// `datetime` attribute and label of the last-updated stamp
fn last_updated(options: &AssemblyOptions) -> (String, String) {
    (
        options.last_updated.format("%Y-%m").to_string(),
        options.last_updated.format("%B %Y").to_string(),
    )
}

fn comparison(content: &Content, options: &AssemblyOptions) -> Result<String, AssemblyError> {
    let escape = options.escape;

    let mut sections = String::new();
    for block in &content.body {
        write_block(&mut sections, block, |level| level.clamp(2, 4), escape)?;
    }

    let (datetime, month) = last_updated(options);
    let mut out = String::new();
    write_head(&mut out, options)?;
    write!(
        out,
        r#"    <header class="article-header">
        <h1>{title}</h1>
        {intro}
    </header>

    <div>
        [elementor-template id="{embed}"]
    </div>

    <!-- Quick Verdict Section -->
    <section class="quick-verdict" aria-labelledby="quick-verdict-heading">
        <div class="qv-header">
            <h2 id="quick-verdict-heading" class="qv-title">Quick Verdict</h2>
            <p class="qv-subtitle">Edit this subtitle with your verdict summary.</p>
            <div class="qv-updated">Last updated: <time datetime="{datetime}">{month}</time></div>
        </div>

        <div class="qv-trust-signals">
            <div class="qv-trust-item">
                <span class="qv-trust-icon" aria-hidden="true">✓</span>
                Trust Signal 1
            </div>
            <div class="qv-trust-item">
                <span class="qv-trust-icon" aria-hidden="true">✓</span>
                Trust Signal 2
            </div>
            <div class="qv-trust-item">
                <span class="qv-trust-icon" aria-hidden="true">✓</span>
                Trust Signal 3
            </div>
        </div>
    </section>

    <!-- Main Content -->
    <section class="content-section">
        {sections}
    </section>

"#,
        title = escape.apply(title_or(content, COMPARISON_DEFAULT_TITLE)),
        intro = intro_lines(content, escape, "\n        "),
        embed = escape_attr(&options.embed_template_id),
    )?;
    write_tail(&mut out, COMPARISON_SCRIPT);

    Ok(out)
}

/// Pane a single-subject block is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Overview,
    Bonuses,
    Games,
    ProsAndCons,
    General,
}

impl Slot {
    fn for_category(category: SectionCategory) -> Self {
        match category {
            SectionCategory::Bonus => Slot::Bonuses,
            SectionCategory::Games => Slot::Games,
            c if c.is_pros_cons() => Slot::ProsAndCons,
            _ => Slot::General,
        }
    }
}

#[derive(Debug, Default)]
struct Slots {
    overview: String,
    bonuses: String,
    games: String,
    pros_cons: String,
    general: String,
    pros_cons_detected: bool,
}

impl Slots {
    fn get_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Overview => &mut self.overview,
            Slot::Bonuses => &mut self.bonuses,
            Slot::Games => &mut self.games,
            Slot::ProsAndCons => &mut self.pros_cons,
            Slot::General => &mut self.general,
        }
    }

    /// Destination of a list found in an overview or general block
    fn unassigned_list_slot(&self) -> Slot {
        if self.games.is_empty() {
            Slot::Games
        } else if self.bonuses.is_empty() {
            Slot::Bonuses
        } else {
            Slot::General
        }
    }
}

fn route_blocks(blocks: &[Block], escape: EscapePolicy) -> Result<Slots, fmt::Error> {
    let mut slots = Slots::default();
    let mut current = Slot::Overview;
    let heading_tag = |level: u8| if level == 2 { 3 } else { 4 };

    for block in blocks {
        let target = match block {
            Block::Heading { category, .. } => {
                current = Slot::for_category(*category);
                if category.is_pros_cons() {
                    slots.pros_cons_detected = true;
                }
                current
            }
            Block::List { .. } if matches!(current, Slot::Overview | Slot::General) => {
                slots.unassigned_list_slot()
            }
            _ => current,
        };
        write_block(slots.get_mut(target), block, heading_tag, escape)?;
    }

    Ok(slots)
}

fn pros_cons_pane(slots: &Slots, mode: ProsConsMode) -> String {
    if !slots.pros_cons_detected {
        return "<p>Edit pros and cons here</p>".to_string();
    }

    match mode {
        ProsConsMode::Placeholder => PROS_CONS_PLACEHOLDER.to_string(),
        ProsConsMode::Detected => format!(
            r#"
        <div class="proscons-grid">
            {}
        </div>"#,
            slots.pros_cons
        ),
    }
}

fn single_subject(content: &Content, options: &AssemblyOptions) -> Result<String, AssemblyError> {
    let escape = options.escape;
    let slots = route_blocks(&content.body, escape)?;
    log::debug!(
        "Routed blocks: overview={}B bonuses={}B games={}B proscons={}B general={}B",
        slots.overview.len(),
        slots.bonuses.len(),
        slots.games.len(),
        slots.pros_cons.len(),
        slots.general.len()
    );

    let overview = if slots.overview.is_empty() {
        &slots.general
    } else {
        &slots.overview
    };
    let bonuses = or_placeholder(&slots.bonuses, "<p>Edit bonus information here</p>");
    let games = or_placeholder(&slots.games, "<p>Edit games information here</p>");
    let pros_cons = pros_cons_pane(&slots, options.pros_cons);

    let (datetime, month) = last_updated(options);
    let mut out = String::new();
    write_head(&mut out, options)?;
    write!(
        out,
        r#"
<header class="article-header">
    <h1>{title}</h1>
    {intro}
</header>

<div>
    [elementor-template id="{embed}"]
</div>

<!-- Quick Verdict Section -->
<section class="quick-verdict">
    <div class="qv-header">
        <h2 class="qv-title">Quick Verdict</h2>
        <p class="qv-subtitle">After extensive testing...</p>
        <div class="qv-updated">Last updated: <time datetime="{datetime}">{month}</time></div>
    </div>

    <div class="qv-trust-signals">
        <div class="qv-trust-item">
            <span class="qv-trust-icon" aria-hidden="true">✓</span>
            Feature 1
        </div>
        <div class="qv-trust-item">
            <span class="qv-trust-icon" aria-hidden="true">✓</span>
            Feature 2
        </div>
    </div>
</section>

<!-- Platform Card with Tabs -->
<div class="platform-card">
    <div class="tabs-container">
        <div class="tab-nav" role="tablist">
            <button class="tab-button active" role="tab" data-tab="overview" aria-selected="true">Overview</button>
            <button class="tab-button" role="tab" data-tab="bonuses">Bonuses</button>
            <button class="tab-button" role="tab" data-tab="games">Games</button>
            <button class="tab-button" role="tab" data-tab="proscons">Pros & Cons</button>
        </div>

        <div class="tab-content">
            <div class="tab-pane active" id="overview">
                {overview}
            </div>

            <div class="tab-pane" id="bonuses">
                {bonuses}
            </div>

            <div class="tab-pane" id="games">
                {games}
            </div>

            <div class="tab-pane" id="proscons">
                {pros_cons}
            </div>
        </div>
    </div>

    <div class="risk-warning">
        <p><strong>18+ Only:</strong> Please gamble responsibly. Visit BeGambleAware.org for support.</p>
    </div>
</div>

<!-- Additional Content -->
<section class="content-section">
    {general}
</section>

"#,
        title = escape.apply(title_or(content, SINGLE_SUBJECT_DEFAULT_TITLE)),
        intro = intro_lines(content, escape, "\n    "),
        embed = escape_attr(&options.embed_template_id),
        general = slots.general,
    )?;
    write_tail(&mut out, SINGLE_SUBJECT_SCRIPT);

    Ok(out)
}

fn or_placeholder<'a>(pane: &'a str, placeholder: &'a str) -> &'a str {
    if pane.is_empty() {
        placeholder
    } else {
        pane
    }
}

const PROS_CONS_PLACEHOLDER: &str = r#"
        <div class="proscons-grid">
            <div class="pros-section">
                <h4><span aria-hidden="true">✓</span> Pros</h4>
                <ul class="pros-list">
                    <li>Edit pros here</li>
                </ul>
            </div>
            <div class="cons-section">
                <h4><span aria-hidden="true">✗</span> Cons</h4>
                <ul class="cons-list">
                    <li>Edit cons here</li>
                </ul>
            </div>
        </div>"#;

const COMPARISON_SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', function() {
    // Tab functionality
    const tabButtons = document.querySelectorAll('.tab-button');
    tabButtons.forEach(button => {
        button.addEventListener('click', function() {
            const targetTab = this.getAttribute('data-tab');
            const tabsContainer = this.closest('.tabs-container');

            tabsContainer.querySelectorAll('.tab-button').forEach(btn => btn.classList.remove('active'));
            tabsContainer.querySelectorAll('.tab-pane').forEach(pane => pane.classList.remove('active'));

            this.classList.add('active');
            document.getElementById(targetTab)?.classList.add('active');
        });
    });
});
"#;

const SINGLE_SUBJECT_SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', function() {
    // Tab functionality
    const tabButtons = document.querySelectorAll('.tab-button');
    tabButtons.forEach(button => {
        button.addEventListener('click', function() {
            const targetTab = this.getAttribute('data-tab');
            const tabsContainer = this.closest('.tabs-container');

            tabsContainer.querySelectorAll('.tab-button').forEach(btn => {
                btn.classList.remove('active');
                btn.setAttribute('aria-selected', 'false');
            });
            tabsContainer.querySelectorAll('.tab-pane').forEach(pane => {
                pane.classList.remove('active');
            });

            this.classList.add('active');
            this.setAttribute('aria-selected', 'true');
            document.getElementById(targetTab)?.classList.add('active');
        });
    });
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AssemblyOptions {
        AssemblyOptions {
            last_updated: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            ..AssemblyOptions::default()
        }
    }

    /// Inner HTML of a single-subject tab pane, trimmed
    fn pane<'a>(html: &'a str, id: &str) -> &'a str {
        let open = format!("id=\"{}\">", id);
        let start = html.find(&open).unwrap() + open.len();
        let rest = &html[start..];
        let end = rest
            .find("\n            </div>\n\n")
            .or_else(|| rest.find("\n            </div>\n        </div>\n    </div>"))
            .unwrap();
        rest[..end].trim()
    }

    const REVIEW: &str = "<h1>Lucky Casino Review</h1>\
        <p>Intro one.</p><p>Intro two.</p>\
        <p>Overview text</p>\
        <h2>Welcome Bonus</h2><p>100% match</p>\
        <h2>Top Games</h2><ul><li>Slots</li><li>Roulette</li></ul>\
        <h2>Pros and Cons</h2><p>Fast payouts</p>\
        <h3>Customer Support</h3><p>24/7 chat</p>";

    #[test]
    fn test_comparison_intro_and_body() {
        let html = assemble(
            "<h1>Title</h1><p>Intro one.</p><p>Intro two.</p><p>Body.</p>",
            Layout::Comparison,
            &options(),
        )
        .unwrap();

        assert_eq!(html.matches("<p class=\"intro\">").count(), 2);
        assert!(html.contains("<p class=\"intro\">Intro one.</p>\n        <p class=\"intro\">Intro two.</p>"));
        assert_eq!(html.matches("<p>Body.</p>").count(), 1);
        assert!(!html.contains("<p>Intro one.</p>"));
        assert!(html.contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_comparison_document_order_and_clamping() {
        let html = assemble(
            "<h1>Best Casinos</h1><p>a</p><p>b</p><h1>Top Pick</h1><p>c</p><h5>Small print</h5><ol><li>one</li></ol><h3>Details</h3>",
            Layout::Comparison,
            &options(),
        )
        .unwrap();

        let expected = "<h2>Top Pick</h2>\n<p>c</p>\n<h4>Small print</h4>\n<ol>\n  <li>one</li>\n</ol>\n<h3>Details</h3>\n";
        assert!(html.contains(expected), "{}", html);
    }

    #[test]
    fn test_comparison_table() {
        let html = assemble(
            "<h1>T</h1><table><tr><td>Casino A</td><td>4.5</td></tr><tr><th>Casino B</th><td>4.0</td></tr></table>",
            Layout::Comparison,
            &options(),
        )
        .unwrap();

        assert!(html.contains("<table class=\"platform-table\">\n<tbody>\n<tr>\n  <th scope=\"row\">Casino A</th>\n  <td>4.5</td>\n</tr>\n<tr>\n  <th scope=\"row\">Casino B</th>\n  <td>4.0</td>\n</tr>\n</tbody>"));
        assert!(html.contains("<div class=\"table-container\">\n<div class=\"table-responsive\">"));
    }

    #[test]
    fn test_default_titles() {
        let html = assemble("<p>Only text</p>", Layout::Comparison, &options()).unwrap();
        assert!(html.contains("<h1>Your Article Title</h1>"));

        let html = assemble("<p>Only text</p>", Layout::SingleSubject, &options()).unwrap();
        assert!(html.contains("<h1>Casino Review 2025</h1>"));
    }

    #[test]
    fn test_page_frame() {
        let options = AssemblyOptions {
            stylesheet: "/css/site.css".to_string(),
            language: "en-US".to_string(),
            embed_template_id: "77".to_string(),
            ..options()
        };
        for layout in [Layout::Comparison, Layout::SingleSubject] {
            let html = assemble("<h1>T</h1>", layout, &options).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en-US\">"));
            assert!(html.contains("<link rel=\"stylesheet\" href=\"/css/site.css\">"));
            assert!(html.contains("[elementor-template id=\"77\"]"));
            assert!(html.contains("<time datetime=\"2025-11\">November 2025</time>"));
            assert!(html.contains("document.addEventListener('DOMContentLoaded'"));
            assert!(html.ends_with("</body>\n</html>"));
        }
    }

    #[test]
    fn test_config_values_are_attribute_escaped() {
        let options = AssemblyOptions {
            stylesheet: "/css/a.css\" onload=\"x".to_string(),
            embed_template_id: "7\"]<b>&".to_string(),
            ..options()
        };
        for layout in [Layout::Comparison, Layout::SingleSubject] {
            let html = assemble("<h1>T</h1>", layout, &options).unwrap();
            assert!(html.contains("href=\"/css/a.css&quot; onload=&quot;x\""));
            assert!(html.contains("[elementor-template id=\"7&quot;]<b>&amp;\"]"));
        }
    }

    #[test]
    fn test_text_is_escaped_by_default() {
        let input = "<h1>A &amp; B</h1><p>x</p><p>y</p><p>1 &lt; 2 &lt;script&gt;</p>";

        let html = assemble(input, Layout::Comparison, &options()).unwrap();
        assert!(html.contains("<h1>A &amp; B</h1>"));
        assert!(html.contains("<p>1 &lt; 2 &lt;script&gt;</p>"));

        let raw = AssemblyOptions {
            escape: EscapePolicy::Raw,
            ..options()
        };
        let html = assemble(input, Layout::Comparison, &raw).unwrap();
        assert!(html.contains("<h1>A & B</h1>"));
        assert!(html.contains("<p>1 < 2 <script></p>"));
    }

    #[test]
    fn test_single_subject_routing() {
        let html = assemble(REVIEW, Layout::SingleSubject, &options()).unwrap();

        assert_eq!(pane(&html, "overview"), "<p>Overview text</p>");
        assert_eq!(
            pane(&html, "bonuses"),
            "<h3>Welcome Bonus</h3>\n<p>100% match</p>"
        );
        assert_eq!(
            pane(&html, "games"),
            "<h3>Top Games</h3>\n<ul>\n  <li>Slots</li>\n  <li>Roulette</li>\n</ul>"
        );
        assert!(html.contains(
            "<section class=\"content-section\">\n    <h4>Customer Support</h4>\n<p>24/7 chat</p>\n"
        ));
    }

    #[test]
    fn test_pros_cons_placeholder_discards_detected_content() {
        let html = assemble(REVIEW, Layout::SingleSubject, &options()).unwrap();
        let pros_cons = pane(&html, "proscons");
        assert!(pros_cons.contains("<li>Edit pros here</li>"));
        assert!(pros_cons.contains("<li>Edit cons here</li>"));
        assert!(!html.contains("Fast payouts"));
    }

    #[test]
    fn test_pros_cons_detected_mode() {
        let options = AssemblyOptions {
            pros_cons: ProsConsMode::Detected,
            ..options()
        };
        let html = assemble(REVIEW, Layout::SingleSubject, &options).unwrap();
        let pros_cons = pane(&html, "proscons");
        assert!(pros_cons.contains("<div class=\"proscons-grid\">"));
        assert!(pros_cons.contains("<h3>Pros and Cons</h3>\n<p>Fast payouts</p>"));
    }

    #[test]
    fn test_pros_cons_absent() {
        let html = assemble("<h1>T</h1><h2>Bonus</h2><p>x</p>", Layout::SingleSubject, &options())
            .unwrap();
        assert_eq!(pane(&html, "proscons"), "<p>Edit pros and cons here</p>");
    }

    #[test]
    fn test_unassigned_lists_fill_games_then_bonuses() {
        let html = assemble(
            "<h1>T</h1><ul><li>a</li></ul><ul><li>b</li></ul><h2>Overview</h2><ul><li>c</li></ul>",
            Layout::SingleSubject,
            &options(),
        )
        .unwrap();

        assert_eq!(pane(&html, "games"), "<ul>\n  <li>a</li>\n</ul>");
        assert_eq!(pane(&html, "bonuses"), "<ul>\n  <li>b</li>\n</ul>");
        // Overview is empty, so its pane shows the general content
        assert_eq!(
            pane(&html, "overview"),
            "<h3>Overview</h3>\n<ul>\n  <li>c</li>\n</ul>"
        );
    }

    #[test]
    fn test_empty_panes_use_placeholders() {
        let html = assemble("<h1>T</h1>", Layout::SingleSubject, &options()).unwrap();
        assert_eq!(pane(&html, "bonuses"), "<p>Edit bonus information here</p>");
        assert_eq!(pane(&html, "games"), "<p>Edit games information here</p>");
    }

    #[test]
    fn test_heading_levels_in_single_subject() {
        let content = read_content("<h1>T</h1><h2>Bonus A</h2><h1>Bonus B</h1><h3>Bonus C</h3>").unwrap();
        let slots = route_blocks(&content.body, EscapePolicy::Escape).unwrap();
        assert_eq!(
            slots.bonuses,
            "<h3>Bonus A</h3>\n<h4>Bonus B</h4>\n<h4>Bonus C</h4>\n"
        );
    }
}
