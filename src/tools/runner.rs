//! Tool runner - keeps registered tools and executes them by name

use tracing::debug;

use crate::error::Error;
use crate::Result;

use super::Tool;

/// Registered tools, in registration order.
///
/// Order matters: it is the order the tools appear in every request.
#[derive(Debug, Default, Clone)]
pub struct ToolRunner {
    tools: Vec<Tool>,
}

impl ToolRunner {
    /// Create an empty tool runner
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a tool runner with the demonstration tools
    pub fn new_with_builtins() -> Self {
        let mut runner = Self::new();
        runner.register(super::builtin::get_weather());
        runner.register(super::builtin::fahrenheit_to_celsius());
        runner
    }

    /// Register a tool. A tool with the same name is replaced in place.
    pub fn register(&mut self, tool: Tool) {
        match self.tools.iter_mut().find(|t| t.name == tool.name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    /// Registered tools for request building
    pub fn definitions(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Execute a tool by name
    pub fn execute(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::Tool(format!("Tool not found: {}", name)))?;

        debug!("Executing tool: {} with args: {}", name, arguments);
        let result = tool.call(arguments);
        debug!("Tool {} returned {} chars", name, result.len());
        Ok(result)
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// List registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_runner_register_and_execute() {
        let mut runner = ToolRunner::new();
        runner.register(Tool::new("test_tool", "Test", |_| "success".to_string()));

        assert!(runner.has("test_tool"));

        let result = runner.execute("test_tool", "{}").unwrap();
        assert_eq!(result, "success");
    }

    #[test]
    fn test_tool_runner_unknown_tool() {
        let runner = ToolRunner::new();
        let result = runner.execute("unknown", "{}");
        assert!(matches!(result, Err(Error::Tool(_))));
    }

    #[test]
    fn test_register_replaces_and_keeps_order() {
        let mut runner = ToolRunner::new();
        runner.register(Tool::new("a", "first", |_| "1".to_string()));
        runner.register(Tool::new("b", "second", |_| "2".to_string()));
        runner.register(Tool::new("a", "replaced", |_| "3".to_string()));

        assert_eq!(runner.tool_names(), vec!["a", "b"]);
        assert_eq!(runner.execute("a", "").unwrap(), "3");
    }

    #[test]
    fn test_builtins_registered() {
        let runner = ToolRunner::new_with_builtins();
        assert_eq!(
            runner.tool_names(),
            vec!["get_weather", "fahrenheit_to_celsius"]
        );
    }
}
