//! Tool configuration from reviewdoc.toml

use crate::assembler::{AssemblyOptions, EscapePolicy, ProsConsMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "reviewdoc.toml";

/// Main tool configuration from reviewdoc.toml
///
/// Every field has a default, so a partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Stylesheet linked from assembled documents
    pub stylesheet: String,

    /// Stylesheet linked from the section editor's rendered output
    pub editor_stylesheet: String,

    /// `lang` attribute of assembled documents
    pub language: String,

    /// Id placed in the `[elementor-template id="..."]` short-code
    pub embed_template_id: String,

    /// HTML-escape extracted text before placing it in a template
    pub escape_text: bool,

    /// What the single-subject pros/cons pane shows when a pros/cons heading is found
    pub pros_cons: ProsConsMode,

    /// Assisted classification service settings
    pub classifier: ClassifierSettings,
}

/// Settings for the assisted classification service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Messages API endpoint
    pub endpoint: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            stylesheet: "styling-test-page-fixed.css".to_string(),
            editor_stylesheet: "/css/styling-test-page-fixed.css".to_string(),
            language: "en-GB".to_string(),
            embed_template_id: "1128".to_string(),
            escape_text: true,
            pros_cons: ProsConsMode::Placeholder,
            classifier: ClassifierSettings::default(),
        }
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 4096,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from a reviewdoc.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ToolConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;

        let config: ToolConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        Ok(config)
    }

    /// Save configuration to a reviewdoc.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the configuration file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(ConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        fs::write(&path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one, `reviewdoc.toml` in `dir` is
    /// used when present, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::debug!("Loading configuration from {}", path.display());
            return Self::load(path);
        }

        let candidate: PathBuf = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Loading configuration from {}", candidate.display());
            Self::load(&candidate)
        } else {
            log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(Self::default())
        }
    }

    /// Assembly options derived from this configuration
    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            stylesheet: self.stylesheet.clone(),
            language: self.language.clone(),
            embed_template_id: self.embed_template_id.clone(),
            escape: if self.escape_text {
                EscapePolicy::Escape
            } else {
                EscapePolicy::Raw
            },
            pros_cons: self.pros_cons,
            ..AssemblyOptions::default()
        }
    }
}

/// Errors that can occur when loading or saving the tool configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_config_roundtrip() {
        let config = ToolConfig {
            stylesheet: "/assets/review.css".to_string(),
            escape_text: false,
            pros_cons: ProsConsMode::Detected,
            ..ToolConfig::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ToolConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_content = r#"
language = "en-US"
pros_cons = "detected"

[classifier]
model = "claude-test"
"#;

        let config: ToolConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.language, "en-US");
        assert_eq!(config.pros_cons, ProsConsMode::Detected);
        assert_eq!(config.stylesheet, "styling-test-page-fixed.css");
        assert!(config.escape_text);
        assert_eq!(config.classifier.model, "claude-test");
        assert_eq!(config.classifier.max_tokens, 4096);
        assert_eq!(config.classifier.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_assembly_options_follow_config() {
        let config = ToolConfig {
            escape_text: false,
            embed_template_id: "42".to_string(),
            ..ToolConfig::default()
        };

        let options = config.assembly_options();
        assert_eq!(options.escape, EscapePolicy::Raw);
        assert_eq!(options.embed_template_id, "42");
        assert_eq!(options.language, "en-GB");
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, ToolConfig::default());
    }

    #[test]
    fn test_discover_reads_working_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "language = \"de-DE\"\n").unwrap();

        let config = ToolConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.language, "de-DE");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = ToolConfig::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
