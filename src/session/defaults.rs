//! Default configuration template applied to new user and tool-result messages.

use serde::{Deserialize, Serialize};

/// Name of the built-in translator dialect.
pub const DEFAULT_TRANSLATOR: &str = "openai";

/// Routing and request-shaping settings copied onto new messages.
///
/// A directive never edits this in place; it produces a new value through
/// one of the `with_*` builders and the session swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub uri: Option<String>,
    pub api_key_name: Option<String>,
    pub model: Option<String>,
    pub translator: String,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub logprobs: Option<bool>,
    pub stream: Option<bool>,
    pub seed: Option<i64>,
    pub response_format_type: Option<String>,
    pub tool_choice: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            uri: None,
            api_key_name: None,
            model: None,
            translator: DEFAULT_TRANSLATOR.to_string(),
            temperature: None,
            top_p: None,
            max_tokens: None,
            logprobs: None,
            stream: None,
            seed: None,
            response_format_type: None,
            tool_choice: None,
        }
    }
}

impl Defaults {
    pub fn with_uri(self, uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..self
        }
    }

    pub fn with_api_key_name(self, name: impl Into<String>) -> Self {
        Self {
            api_key_name: Some(name.into()),
            ..self
        }
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..self
        }
    }

    pub fn with_translator(self, translator: impl Into<String>) -> Self {
        Self {
            translator: translator.into(),
            ..self
        }
    }

    pub fn with_temperature(self, temperature: f64) -> Self {
        Self {
            temperature: Some(temperature),
            ..self
        }
    }
}
