//! Configuration loading
//!
//! Settings come from a TOML or YAML file. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use crate::ai::AiEngineConfig;
use ratemykb_state_store::config::{DEFAULT_FILE_EXTENSION, DEFAULT_REPORT_FILE_NAME};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File names looked up when the config path is a directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["config.toml", "config.yaml", "config.yml"];

/// Error type for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config not found at: {0}")]
    NotFound(String),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai_engine: AiEngineConfig,

    #[serde(default)]
    pub scan_settings: ScanSettings,

    #[serde(default)]
    pub prompt_config: PromptConfig,

    #[serde(default)]
    pub exclusion_file: ExclusionFileConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Which files are considered notes
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// Extension of note files, with or without the leading dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Directory names to skip anywhere in the tree, or `/`-prefixed paths
    /// relative to the scan root
    #[serde(default)]
    pub exclude_directories: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            file_extension: default_file_extension(),
            exclude_directories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    /// Instructions sent with every note; `{{ content }}` marks where the
    /// note goes
    #[serde(default = "default_prompt")]
    pub quality_classification_prompt: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            quality_classification_prompt: default_prompt(),
        }
    }
}

/// Markdown file listing `[[links]]` to notes that must not be rated
#[derive(Debug, Clone, Deserialize)]
pub struct ExclusionFileConfig {
    /// Relative paths resolve against the scan root
    #[serde(default = "default_exclusion_file")]
    pub path: PathBuf,
}

impl Default for ExclusionFileConfig {
    fn default() -> Self {
        Self {
            path: default_exclusion_file(),
        }
    }
}

impl ExclusionFileConfig {
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_file_name")]
    pub file_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_name: default_report_file_name(),
        }
    }
}

// Default value functions
fn default_file_extension() -> String { DEFAULT_FILE_EXTENSION.to_string() }
fn default_exclusion_file() -> PathBuf { PathBuf::from("quality_exclude_links.md") }
fn default_report_file_name() -> String { DEFAULT_REPORT_FILE_NAME.to_string() }
fn default_prompt() -> String {
    "Review the content and determine if it's: 'Empty', 'Low quality/low effort', or 'Good enough'."
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Toml,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// `None` gives the defaults. A directory is searched for
    /// [`CONFIG_FILE_NAMES`] in order, falling back to the defaults when none
    /// exists. A file path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if path.is_dir() {
            return match CONFIG_FILE_NAMES
                .iter()
                .map(|name| path.join(name))
                .find(|candidate| candidate.is_file())
            {
                Some(file) => Self::load_file(&file),
                None => Ok(Self::default()),
            };
        }

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::load_file(path)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, Format::for_path(path))
    }

    fn parse(content: &str, format: Format) -> Result<Self> {
        // serde_yaml reads an empty document as unit, not as an empty map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        match format {
            Format::Toml => Ok(toml::from_str(content)?),
            Format::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}
