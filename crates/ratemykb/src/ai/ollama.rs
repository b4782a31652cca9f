//! Ollama chat classifier
//!
//! Sends one non-streaming `/api/chat` request per note and offers the model
//! a `classifyContent` tool. Models that ignore the tool usually answer with
//! JSON or plain text instead, so the reply is read in three passes:
//! tool-call arguments, then a JSON body in the message content, then the
//! raw content itself.

use super::{render_prompt, ClassifyError, Classifier, AiEngineConfig};
use ratemykb_state_store::Label;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

const TOOL_NAME: &str = "classifyContent";

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").unwrap());

pub struct OllamaClassifier {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    prompt: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessageOut<'a>>,
    stream: bool,
    tools: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessageOut<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolFunction,
}

#[derive(Debug, Deserialize)]
struct ToolFunction {
    #[serde(default)]
    name: String,
    /// Ollama sends an object; some proxies send a JSON-encoded string.
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ClassificationPayload {
    classification: String,
}

impl OllamaClassifier {
    pub fn new(config: &AiEngineConfig, prompt: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        Self {
            agent,
            endpoint: format!("{}/api/chat", config.url.trim_end_matches('/')),
            model: config.model.clone(),
            prompt: prompt.to_string(),
            name: format!("ollama:{}", config.model),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessageOut {
                role: "user",
                content: prompt,
            }],
            stream: false,
            tools: tool_definitions(),
        }
    }
}

impl Classifier for OllamaClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, content: &str) -> Result<Label, ClassifyError> {
        if content.trim().is_empty() {
            return Ok(Label::empty());
        }

        let prompt = render_prompt(&self.prompt, content);
        debug!(model = %self.model, chars = prompt.len(), "Sending classification request");

        let response = match self.agent.post(&self.endpoint).send_json(self.request_body(&prompt)) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(ClassifyError::Status { code, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ClassifyError::Http(transport.to_string()));
            }
        };

        let chat: ChatResponse = response
            .into_json()
            .map_err(|e| ClassifyError::InvalidResponse(e.to_string()))?;
        let message = chat
            .message
            .ok_or_else(|| ClassifyError::InvalidResponse("response has no message".to_string()))?;

        parse_message(&message)
    }
}

fn tool_definitions() -> Value {
    json!([{
        "type": "function",
        "function": {
            "name": TOOL_NAME,
            "description": "Classify the quality of content",
            "parameters": {
                "type": "object",
                "properties": {
                    "classification": {
                        "type": "string",
                        "description": "The classification of the content describing its quality"
                    }
                },
                "required": ["classification"]
            }
        }
    }])
}

/// Pull a label out of a chat reply.
pub(crate) fn parse_message(message: &ChatMessage) -> Result<Label, ClassifyError> {
    for call in &message.tool_calls {
        if !call.function.name.is_empty() && call.function.name != TOOL_NAME {
            continue;
        }
        if let Some(label) = classification_from_arguments(&call.function.arguments) {
            return Ok(label);
        }
    }

    let cleaned = clean_content(&message.content);
    if let Ok(payload) = serde_json::from_str::<ClassificationPayload>(&cleaned) {
        if let Ok(label) = Label::new(&payload.classification) {
            return Ok(label);
        }
    }

    Label::new(&cleaned).map_err(|_| ClassifyError::EmptyResponse)
}

fn classification_from_arguments(arguments: &Value) -> Option<Label> {
    let parsed;
    let object = match arguments {
        Value::String(encoded) => {
            parsed = serde_json::from_str::<Value>(encoded).ok()?;
            &parsed
        }
        other => other,
    };
    object
        .get("classification")
        .and_then(Value::as_str)
        .and_then(|s| Label::new(s).ok())
}

/// Drop reasoning blocks and Markdown code fences around the answer.
fn clean_content(content: &str) -> String {
    let without_think = THINK_BLOCK.replace_all(content, "");
    let trimmed = without_think.trim();
    match CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => trimmed.to_string(),
    }
}
