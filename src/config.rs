//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::session::{Defaults, DEFAULT_TRANSLATOR};
use crate::translator::TranslatorRegistry;
use crate::Result;

/// Main configuration structure.
///
/// Everything here only seeds the session template; `#URI`, `#MODEL` and
/// friends in the input still override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completions endpoint
    #[serde(default)]
    pub uri: Option<String>,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_name: Option<String>,

    /// Model to use
    #[serde(default)]
    pub model: Option<String>,

    /// Wire dialect
    #[serde(default = "default_translator")]
    pub translator: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

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

    /// `response_format.type`, e.g. "json_object"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

fn default_translator() -> String {
    DEFAULT_TRANSLATOR.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: None,
            api_key_name: None,
            model: None,
            translator: default_translator(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
            top_p: None,
            max_tokens: None,
            logprobs: None,
            stream: None,
            seed: None,
            response_format: None,
            tool_choice: None,
        }
    }
}

impl Config {
    /// Session template seeded from this configuration
    pub fn defaults(&self) -> Defaults {
        Defaults {
            uri: self.uri.clone(),
            api_key_name: self.api_key_name.clone(),
            model: self.model.clone(),
            translator: self.translator.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            logprobs: self.logprobs,
            stream: self.stream,
            seed: self.seed,
            response_format_type: self.response_format.clone(),
            tool_choice: self.tool_choice.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values that would otherwise only fail mid-session
    pub fn validate(&self) -> Result<()> {
        if !TranslatorRegistry::available().contains(&self.translator.as_str()) {
            return Err(Error::Config(format!(
                "Unknown translator: {}",
                self.translator
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".colloquy")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default location
pub fn load() -> Result<Config> {
    let path = config_path();

    if !path.exists() {
        return Err(Error::Config(format!(
            "Config not found at {:?}. Run 'colloquy onboard' first.",
            path
        )));
    }

    load_from(&path)
}

/// Load configuration, falling back to defaults when no file exists
pub fn load_or_default() -> Result<Config> {
    let path = config_path();
    if path.exists() {
        load_from(&path)
    } else {
        Ok(Config::default())
    }
}

/// Load configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config at {:?}: {}", path, e)))?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to the default location
pub fn save(config: &Config) -> Result<()> {
    save_to(config, &config_path())
}

/// Save configuration to an explicit path
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Interactive setup that writes the config file
pub fn onboard() -> Result<()> {
    use crate::ui;
    use inquire::{Select, Text};

    ui::print_header("setup", "local");
    println!("  Answers become the defaults for every session.\n");

    let mut config = Config::default();

    let uri = Text::new("Chat completions endpoint:")
        .with_default("https://api.openai.com/v1/chat/completions")
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    config.uri = Some(uri);

    let key_name = Text::new("Environment variable holding the API key:")
        .with_default("OPENAI_API_KEY")
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    if std::env::var(&key_name).is_err() {
        ui::print_warning(&format!("{} is not set in this shell", key_name));
    }
    config.api_key_name = Some(key_name);

    let model = Text::new("Model:")
        .with_default("gpt-4o-mini")
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    config.model = Some(model);

    let translator = Select::new("Wire dialect:", TranslatorRegistry::available().to_vec())
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    config.translator = translator.to_string();

    save(&config)?;

    println!();
    ui::print_success(&format!("Saved {:?}", config_path()));
    ui::print_step("Run 'colloquy chat' and type a prompt.");

    Ok(())
}
