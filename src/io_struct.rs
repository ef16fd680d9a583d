use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST /chat` request.
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub model: Option<String>,
}

/// One event on the `/chat` response stream, serialized as one JSON object
/// per line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Thinking { thinking: String },
    ClearThinking { clear_thinking: bool },
    Response { response: String },
    Error { error: String },
}

impl StreamEvent {
    pub fn clear_thinking() -> Self {
        StreamEvent::ClearThinking {
            clear_thinking: true,
        }
    }
}

/// Request body sent to the generation API.
#[derive(Debug, Serialize)]
pub struct GeneratePayload<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// One line of the generation API's NDJSON stream. Only the text delta is
/// of interest; everything else (done flags, timings) is tolerated and
/// ignored.
#[derive(Debug, Deserialize)]
pub struct GenerateChunk {
    pub response: Option<String>,

    #[serde(flatten)]
    pub other: Value,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: f64,
}
