//! Message types for the conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::defaults::Defaults;

/// Kind of conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    System,
    User,
    Assistant,
    ToolCall,
    ToolResult,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageType::System => "system",
            MessageType::User => "user",
            MessageType::Assistant => "assistant",
            MessageType::ToolCall => "tool call",
            MessageType::ToolResult => "tool result",
        };
        f.write_str(label)
    }
}

/// One invocation requested by the model.
///
/// `arguments` is kept exactly as the provider encoded it; only the tool
/// callback decodes it. `None` means the provider sent no arguments at all,
/// which the session rejects before running anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub arguments: Option<String>,
}

impl ToolCallRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: Some(arguments.into()),
        }
    }
}

/// A single turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    message_type: MessageType,
    pub content: String,
    pub created: DateTime<Utc>,

    // Request shaping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_name: Option<String>,

    // Response metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,

    /// Tool name (for tool results)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool call ID (for tool results)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRecord>,
}

impl Message {
    /// Create an empty message of the given type
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            content: String::new(),
            created: Utc::now(),
            model: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
            logprobs: None,
            stream: None,
            seed: None,
            response_format_type: None,
            tool_choice: None,
            uri: None,
            api_key_name: None,
            finish_reason: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            name: None,
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a message carrying every field of the template.
    ///
    /// This is a full copy, not a merge: fields the template leaves unset
    /// stay unset on the message.
    pub fn from_defaults(message_type: MessageType, defaults: &Defaults) -> Self {
        let mut message = Self::new(message_type);
        message.uri = defaults.uri.clone();
        message.api_key_name = defaults.api_key_name.clone();
        message.model = defaults.model.clone();
        message.temperature = defaults.temperature;
        message.top_p = defaults.top_p;
        message.max_tokens = defaults.max_tokens;
        message.logprobs = defaults.logprobs;
        message.stream = defaults.stream;
        message.seed = defaults.seed;
        message.response_format_type = defaults.response_format_type.clone();
        message.tool_choice = defaults.tool_choice.clone();
        message
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        let mut message = Self::new(MessageType::System);
        message.content = content.into();
        message
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        let mut message = Self::new(MessageType::User);
        message.content = content.into();
        message
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        let mut message = Self::new(MessageType::Assistant);
        message.content = content.into();
        message
    }

    /// Create a tool result message
    pub fn tool_result(
        call_id: impl Into<String>,
        name: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        let mut message = Self::new(MessageType::ToolResult);
        message.content = result.into();
        message.name = Some(name.into());
        message.tool_call_id = Some(call_id.into());
        message
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Check if the model asked for tool calls
    #[inline]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
