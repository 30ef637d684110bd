//! Tools module - capabilities the model can invoke
//!
//! A tool is a named callback with a parameter schema. The model asks for
//! it through a tool-call record; the session runs the callback and sends
//! the returned text back as a tool result.

pub mod builtin;
mod runner;

pub use runner::ToolRunner;

use std::fmt;
use std::sync::Arc;

/// Callback signature: encoded arguments in, result text out.
pub type ToolFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// One parameter of a tool's schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// JSON Schema type tag ("string", "number", ...)
    pub param_type: String,
    pub description: String,
    pub required: bool,
    /// Allowed values; empty means unrestricted
    pub enum_values: Vec<String>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: false,
            enum_values: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }
}

/// A capability the model can call
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    function: ToolFn,
}

impl Tool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, function: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            function: Arc::new(function),
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Run the callback with the encoded arguments
    pub fn call(&self, arguments: &str) -> String {
        (self.function)(arguments)
    }

    /// Names of required parameters, in declaration order
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
