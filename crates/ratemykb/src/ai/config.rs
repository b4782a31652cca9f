//! Classifier engine settings (`[ai_engine]` section)

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Which classifier backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Local Ollama server
    Ollama,
    /// Offline length/TODO heuristic, no network
    Heuristic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "heuristic" => Ok(Self::Heuristic),
            other => Err(format!(
                "unknown provider '{}' (expected 'ollama' or 'heuristic')",
                other
            )),
        }
    }
}

/// Classifier engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiEngineConfig {
    #[serde(default = "default_provider")]
    pub provider: Provider,

    /// Base URL of the Ollama server
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AiEngineConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: default_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_provider() -> Provider { Provider::Ollama }
fn default_url() -> String { "http://localhost:11434/".to_string() }
fn default_model() -> String { "gemma:12b".to_string() }
fn default_timeout_seconds() -> u64 { 120 }
