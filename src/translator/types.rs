//! Response types for the OpenAI-compatible chat-completions dialect.

use serde::Deserialize;
use serde_json::Value;

/// Top-level chat-completions response.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub created: Option<i64>,
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    pub usage: Option<UsageBlock>,
}

/// A single response choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// The message inside a choice.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// Tool call requested by the model.
#[derive(Debug, Deserialize)]
pub struct WireToolCall {
    pub id: Option<String>,
    pub function: Option<WireFunction>,
}

/// Function name and its encoded arguments.
#[derive(Debug, Deserialize)]
pub struct WireFunction {
    pub name: Option<String>,
    /// Usually a JSON-encoded string; some compatible servers send an object.
    pub arguments: Option<Value>,
}

/// Token usage counters.
#[derive(Debug, Deserialize)]
pub struct UsageBlock {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}
