//! Content classification
//!
//! A [`Classifier`] turns the full text of a note into a [`Label`]. The
//! driving loop receives one at construction time and never looks at which
//! backend it is talking to.

pub mod config;
pub mod heuristic;
pub mod ollama;

pub use config::{AiEngineConfig, Provider};
pub use heuristic::{FixedClassifier, HeuristicClassifier};
pub use ollama::OllamaClassifier;

use ratemykb_state_store::Label;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors that can occur while classifying one document
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Request never produced an HTTP response
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("classifier returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response carried no usable classification
    #[error("classifier returned no classification")]
    EmptyResponse,
}

/// Something that can judge the quality of a note.
pub trait Classifier {
    /// Short name for progress output and logs.
    fn name(&self) -> &str;

    fn classify(&self, content: &str) -> Result<Label, ClassifyError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn classify(&self, content: &str) -> Result<Label, ClassifyError> {
        (**self).classify(content)
    }
}

/// Build the classifier selected by `config.provider`.
pub fn build_classifier(config: &AiEngineConfig, prompt: &str) -> Box<dyn Classifier> {
    match config.provider {
        Provider::Ollama => Box::new(OllamaClassifier::new(config, prompt)),
        Provider::Heuristic => Box::new(HeuristicClassifier),
    }
}

static CONTENT_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*content\s*\}\}").unwrap());

const CONTENT_INTRO: &str = "Here is the content to review:";

/// Fill `content` into a prompt template.
///
/// Templates without a `{{ content }}` placeholder get the content appended
/// after the instructions.
pub fn render_prompt(template: &str, content: &str) -> String {
    if CONTENT_PLACEHOLDER.is_match(template) {
        CONTENT_PLACEHOLDER
            .replace_all(template, regex::NoExpand(content))
            .into_owned()
    } else {
        format!("{}\n\n{}\n{}", template.trim_end(), CONTENT_INTRO, content)
    }
}
