//! Assisted classification through a text-generation service
//!
//! The whole extracted document is sent together with the style registry,
//! and the service answers with a JSON array of suggested sections. The
//! result replaces the parsed section list; it is never merged with it, and
//! the keyword heuristic is not used as a fallback when the service fails.

use crate::config::ClassifierSettings;
use crate::section::{section_id, Section, SectionKind};
use crate::styles::{self, StyleTemplate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

const API_VERSION: &str = "2023-06-01";

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"));

/// Errors from the assisted classification pass
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("{0} not configured")]
    MissingCredential(String),

    #[error("Request to classification service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classification service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed classification response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// A service that turns a prompt into text
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, ClassifierError>;
}

/// Name and description of a style, as sent to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleNode {
    pub name: String,
    pub description: String,
}

impl From<&StyleTemplate> for StyleNode {
    fn from(template: &StyleTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            description: template.description.to_string(),
        }
    }
}

/// One section as suggested by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedSection {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub suggested_style: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Build the instruction prompt for a document and a set of styles
pub fn build_prompt(html: &str, style_nodes: &BTreeMap<String, StyleNode>) -> String {
    let style_list = style_nodes
        .iter()
        .map(|(id, node)| format!("- {}: {} - {}", id, node.name, node.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert content analyzer for HTML conversion. Analyze the following HTML content and break it down into logical sections. For each section, suggest the most appropriate style template.

Available style templates:
{style_list}

HTML to analyze:
{html}

Analyze this HTML and return a JSON array of sections. Each section should have:
- type: 'heading' | 'paragraph' | 'list' | 'table' | 'group'
- content: Plain text content (first 100 chars)
- htmlContent: The actual HTML for this section
- suggestedStyle: The ID of the most appropriate style template
- reasoning: Brief explanation of why this style fits

Break down nested structures intelligently. Group related content together when appropriate. Focus on semantic meaning and context.

Return ONLY valid JSON, no additional text."
    )
}

/// Parse the suggested sections out of the service's reply
///
/// The reply may wrap the array in prose; everything from the first `[` to
/// the last `]` is parsed. A reply without an array yields no sections.
pub fn parse_suggestions(text: &str) -> Result<Vec<SuggestedSection>, ClassifierError> {
    match JSON_ARRAY.find(text) {
        Some(array) => Ok(serde_json::from_str(array.as_str())?),
        None => {
            log::warn!("Classification reply contained no JSON array");
            Ok(Vec::new())
        }
    }
}

/// Run the assisted classification of a document
///
/// # Parameters
/// * `generator` - Text-generation service
/// * `html` - Extracted HTML of the whole document
/// * `style_nodes` - Styles offered to the service, keyed by id
///
/// # Returns
/// * `Ok(Vec<SuggestedSection>)` - Suggestions in the order the service returned them
/// * `Err(ClassifierError)` - The request failed or the reply was not valid JSON
pub fn analyze(
    generator: &dyn TextGenerator,
    html: &str,
    style_nodes: &BTreeMap<String, StyleNode>,
) -> Result<Vec<SuggestedSection>, ClassifierError> {
    let prompt = build_prompt(html, style_nodes);
    log::info!(
        "Requesting assisted classification ({} bytes of HTML, {} styles)",
        html.len(),
        style_nodes.len()
    );

    let reply = generator.generate(&prompt)?;
    let suggestions = parse_suggestions(&reply)?;
    log::info!("Service suggested {} sections", suggestions.len());

    Ok(suggestions)
}

/// Style nodes for every registered style template
pub fn registry_style_nodes() -> BTreeMap<String, StyleNode> {
    styles::all()
        .iter()
        .map(|template| (template.id.to_string(), StyleNode::from(template)))
        .collect()
}

/// Turn suggestions into a fresh section list
///
/// Ids and orders follow the suggestion index, the style falls back to
/// `body`, and headings get level 2. Unknown kinds become groups.
pub fn into_sections(suggestions: Vec<SuggestedSection>) -> Vec<Section> {
    suggestions
        .into_iter()
        .enumerate()
        .map(|(index, suggestion)| {
            let kind = parse_kind(&suggestion.kind);
            let order = index as i64;
            Section {
                id: section_id(order),
                kind,
                text: suggestion.content,
                markup: suggestion.html_content,
                style_id: suggestion
                    .suggested_style
                    .filter(|style| !style.is_empty())
                    .unwrap_or_else(|| "body".to_string()),
                order,
                heading_level: (kind == SectionKind::Heading).then_some(2),
            }
        })
        .collect()
}

fn parse_kind(kind: &str) -> SectionKind {
    match kind.to_ascii_lowercase().as_str() {
        "heading" => SectionKind::Heading,
        "paragraph" => SectionKind::Paragraph,
        "list" => SectionKind::List,
        "table" => SectionKind::Table,
        _ => SectionKind::Group,
    }
}

/// Messages API client
pub struct AnthropicClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    /// Create a client with an explicit API key
    pub fn new(settings: &ClassifierSettings, api_key: String) -> Result<Self, ClassifierError> {
        let http = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_key,
        })
    }

    /// Create a client reading the API key from the configured environment variable
    ///
    /// # Returns
    /// * `Ok(AnthropicClient)` - Client ready to send requests
    /// * `Err(ClassifierError::MissingCredential)` - The variable is unset or empty
    pub fn from_env(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ClassifierError::MissingCredential(settings.api_key_env.clone()))?;
        Self::new(settings, api_key)
    }
}

impl TextGenerator for AnthropicClient {
    fn generate(&self, prompt: &str) -> Result<String, ClassifierError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        log::debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        let reply: MessagesResponse = serde_json::from_str(&body)?;

        // Only a leading text block counts
        Ok(reply
            .content
            .into_iter()
            .next()
            .filter(|block| block.kind == "text")
            .and_then(|block| block.text)
            .unwrap_or_default())
    }
}

/// Request envelope of the analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub html: String,
    #[serde(default)]
    pub style_nodes: BTreeMap<String, StyleNode>,
}

impl AnalyzeRequest {
    /// Request offering every registered style
    pub fn with_registry(html: String) -> Self {
        Self {
            html,
            style_nodes: registry_style_nodes(),
        }
    }
}

/// Response envelope of the analysis endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Success {
        sections: Vec<SuggestedSection>,
    },
    Failure {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl AnalyzeResponse {
    /// HTTP-style status code of the response
    pub fn status(&self) -> u16 {
        match self {
            AnalyzeResponse::Success { .. } => 200,
            AnalyzeResponse::Failure { .. } => 500,
        }
    }
}

/// Serve one analysis request
///
/// A missing credential is reported on its own; every other failure is
/// reported as "Failed to analyze content" with the cause in `details`.
///
/// # Parameters
/// * `request` - Document and styles to analyze
/// * `generator` - The service, or the credential error raised while creating it
pub fn handle_analyze(
    request: &AnalyzeRequest,
    generator: Result<&dyn TextGenerator, &ClassifierError>,
) -> AnalyzeResponse {
    let generator = match generator {
        Ok(generator) => generator,
        Err(err) if matches!(err, ClassifierError::MissingCredential(_)) => {
            return AnalyzeResponse::Failure {
                error: err.to_string(),
                details: None,
            }
        }
        Err(err) => {
            return AnalyzeResponse::Failure {
                error: "Failed to analyze content".to_string(),
                details: Some(err.to_string()),
            }
        }
    };

    match analyze(generator, &request.html, &request.style_nodes) {
        Ok(sections) => AnalyzeResponse::Success { sections },
        Err(err) => {
            log::error!("Error analyzing content: {}", err);
            AnalyzeResponse::Failure {
                error: "Failed to analyze content".to_string(),
                details: Some(err.to_string()),
            }
        }
    }
}
