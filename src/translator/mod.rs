//! Wire-format translation layer.
//!
//! This module provides:
//! - [`Translator`] trait mapping a conversation to a request body and a
//!   response body back to a [`Message`]
//! - [`TranslatorRegistry`] resolving dialect names to implementations
//! - [`OpenAiTranslator`] for OpenAI-compatible chat-completions endpoints
//!
//! # Adding a New Dialect
//!
//! 1. Create a new file (e.g., `anthropic.rs`)
//! 2. Implement `Translator`
//! 3. Add it to `TranslatorRegistry::create()` and `available()`

mod types;

pub mod openai;

pub use openai::OpenAiTranslator;

use crate::error::Error;
use crate::session::Message;
use crate::tools::Tool;
use crate::Result;

/// Translator trait — one implementation per provider dialect.
pub trait Translator: Send + Sync {
    /// Dialect name as used by the `#TRANSLATOR` directive.
    fn name(&self) -> &str;

    /// Build the request body for the whole conversation.
    fn create_request(&self, conversation: &[Message], tools: &[Tool]) -> Result<String>;

    /// Parse a response body into a single message.
    fn response_to_message(&self, body: &str) -> Result<Message>;
}

/// Translator registry — creates translators by dialect name.
///
/// # Example
///
/// ```ignore
/// let translator = TranslatorRegistry::create("openai")?;
/// let body = translator.create_request(&conversation, &tools)?;
/// ```
pub struct TranslatorRegistry;

impl TranslatorRegistry {
    /// Create a translator from its dialect name.
    ///
    /// Supported dialects:
    /// - `"openai"`: OpenAI-compatible chat completions
    pub fn create(name: &str) -> Result<Box<dyn Translator>> {
        match name {
            "openai" => Ok(Box::new(OpenAiTranslator::new())),
            other => Err(Error::Config(format!("Unknown translator: {other}"))),
        }
    }

    /// List available dialect names.
    pub fn available() -> &'static [&'static str] {
        &["openai"]
    }
}
