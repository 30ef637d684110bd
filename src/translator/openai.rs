//! OpenAI-compatible chat-completions dialect.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::session::{Message, MessageType, ToolCallRecord};
use crate::tools::{Parameter, Tool};
use crate::Result;

use super::types::{ChatResponse, WireToolCall};
use super::Translator;

/// Translator for `/v1/chat/completions` style endpoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiTranslator;

impl OpenAiTranslator {
    pub fn new() -> Self {
        Self
    }

    fn role(message_type: MessageType) -> &'static str {
        match message_type {
            MessageType::System => "system",
            MessageType::User => "user",
            MessageType::Assistant => "assistant",
            MessageType::ToolCall => "tool_call",
            MessageType::ToolResult => "tool",
        }
    }

    fn convert_message(&self, message: &Message) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "role".into(),
            json!(Self::role(message.message_type())),
        );
        obj.insert("content".into(), json!(message.content));

        if message.message_type() == MessageType::ToolResult {
            obj.insert("tool_call_id".into(), json!(message.tool_call_id));
            obj.insert("name".into(), json!(message.name));
        }

        if message.has_tool_calls() {
            let calls: Vec<Value> = message
                .tool_calls
                .iter()
                .map(|tc| {
                    json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": tc.arguments
                        }
                    })
                })
                .collect();
            obj.insert("tool_calls".into(), Value::Array(calls));
        }

        Value::Object(obj)
    }

    fn convert_parameter(&self, param: &Parameter) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), json!(param.param_type));
        obj.insert("description".into(), json!(param.description));
        if !param.enum_values.is_empty() {
            obj.insert("enum".into(), json!(param.enum_values));
        }
        Value::Object(obj)
    }

    fn convert_tool(&self, tool: &Tool) -> Value {
        let properties: Map<String, Value> = tool
            .parameters
            .iter()
            .map(|p| (p.name.clone(), self.convert_parameter(p)))
            .collect();

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": tool.required_parameters()
                }
            }
        })
    }

    fn convert_tool_call(call: WireToolCall) -> ToolCallRecord {
        let (name, arguments) = match call.function {
            Some(function) => {
                let arguments = match function.arguments {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s),
                    Some(other) => Some(other.to_string()),
                };
                (function.name.unwrap_or_default(), arguments)
            }
            None => (String::new(), None),
        };

        ToolCallRecord {
            id: call.id.unwrap_or_default(),
            name,
            arguments,
        }
    }
}

impl Translator for OpenAiTranslator {
    fn name(&self) -> &str {
        "openai"
    }

    fn create_request(&self, conversation: &[Message], tools: &[Tool]) -> Result<String> {
        // Request shaping always comes from the latest user turn.
        let settings = conversation
            .iter()
            .rev()
            .find(|m| m.message_type() == MessageType::User)
            .ok_or_else(|| Error::translation("no user message in conversation"))?;

        let mut request = Map::new();

        if let Some(ref model) = settings.model {
            request.insert("model".into(), json!(model));
        }
        if let Some(temperature) = settings.temperature {
            request.insert("temperature".into(), json!(temperature));
        }
        if let Some(top_p) = settings.top_p {
            request.insert("top_p".into(), json!(top_p));
        }
        if let Some(max_tokens) = settings.max_tokens {
            request.insert("max_tokens".into(), json!(max_tokens));
        }
        if let Some(logprobs) = settings.logprobs {
            request.insert("logprobs".into(), json!(logprobs));
        }
        if let Some(stream) = settings.stream {
            request.insert("stream".into(), json!(stream));
        }
        if let Some(seed) = settings.seed {
            request.insert("seed".into(), json!(seed));
        }
        if let Some(ref format) = settings.response_format_type {
            request.insert("response_format".into(), json!({ "type": format }));
        }

        let messages: Vec<Value> = conversation
            .iter()
            .map(|m| self.convert_message(m))
            .collect();
        request.insert("messages".into(), Value::Array(messages));

        if !tools.is_empty() {
            let tool_array: Vec<Value> = tools.iter().map(|t| self.convert_tool(t)).collect();
            request.insert("tools".into(), Value::Array(tool_array));

            if let Some(ref choice) = settings.tool_choice {
                request.insert("tool_choice".into(), json!(choice));
            }
        }

        debug!(
            "Built request with {} messages and {} tools",
            conversation.len(),
            tools.len()
        );

        serde_json::to_string(&Value::Object(request))
            .map_err(|e| Error::translation(format!("failed to encode request: {e}")))
    }

    fn response_to_message(&self, body: &str) -> Result<Message> {
        let response: ChatResponse = serde_json::from_str(body).map_err(Error::malformed)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::translation("no choices in response"))?;

        // Anything that is not "assistant" collapses to a system turn.
        let message_type = if choice.message.role == "assistant" {
            MessageType::Assistant
        } else {
            MessageType::System
        };

        let mut message = Message::new(message_type);
        message.content = choice.message.content.unwrap_or_default();
        message.finish_reason = choice.finish_reason;
        message.model = response.model;

        if let Some(created) = response.created.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)) {
            message.created = created;
        }

        if let Some(usage) = response.usage {
            message.prompt_tokens = usage.prompt_tokens;
            message.completion_tokens = usage.completion_tokens;
            message.total_tokens = usage.total_tokens;
        }

        message.tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_tool_call)
            .collect();

        Ok(message)
    }
}
