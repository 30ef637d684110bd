//! Directive lines read from the prompt source.

const SYSTEM_CMD: &str = "#system ";
const URI_CMD: &str = "#URI ";
const API_KEY_NAME_CMD: &str = "#API_KEY_NAME ";
const MODEL_CMD: &str = "#MODEL ";
const TRANSLATOR_CMD: &str = "#TRANSLATOR ";

/// A `#`-prefixed line that changes session state instead of being sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    System(String),
    Uri(String),
    ApiKeyName(String),
    Model(String),
    Translator(String),
    /// Starts with `#` but matches no known command.
    Unknown(String),
}

impl Directive {
    /// Parse a source line. Returns `None` for ordinary prompt text.
    pub fn parse(line: &str) -> Option<Self> {
        if !line.starts_with('#') {
            return None;
        }

        let directive = if let Some(text) = line.strip_prefix(SYSTEM_CMD) {
            Directive::System(text.to_string())
        } else if let Some(uri) = line.strip_prefix(URI_CMD) {
            Directive::Uri(uri.to_string())
        } else if let Some(name) = line.strip_prefix(API_KEY_NAME_CMD) {
            Directive::ApiKeyName(name.to_string())
        } else if let Some(model) = line.strip_prefix(MODEL_CMD) {
            Directive::Model(model.to_string())
        } else if let Some(name) = line.strip_prefix(TRANSLATOR_CMD) {
            Directive::Translator(name.to_string())
        } else {
            Directive::Unknown(line.to_string())
        };

        Some(directive)
    }
}
