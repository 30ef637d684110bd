//! Demonstration tools registered by `colloquy chat --demo-tools`.

use serde_json::Value;

use super::{Parameter, Tool};

/// Weather lookup stub. Always reports the same conditions.
pub fn get_weather() -> Tool {
    Tool::new(
        "get_weather",
        "Get the current weather for a location",
        |_args| "Sunny and 75 degrees fahrenheit".to_string(),
    )
    .with_parameter(
        Parameter::new(
            "location",
            "string",
            "The city and state, e.g. San Francisco, CA",
        )
        .required(),
    )
}

/// Converts `{"fahrenheit": n}` to a Celsius reading.
///
/// Bad input is reported back to the model as text so it can retry.
pub fn fahrenheit_to_celsius() -> Tool {
    Tool::new(
        "fahrenheit_to_celsius",
        "Converts a temperature in Fahrenheit to Celsius",
        convert_fahrenheit,
    )
    .with_parameter(
        Parameter::new("fahrenheit", "number", "The temperature in Fahrenheit").required(),
    )
}

fn convert_fahrenheit(args: &str) -> String {
    let params: Value = match serde_json::from_str(args) {
        Ok(value) => value,
        Err(e) => return format!("Invalid arguments: {e}"),
    };

    match params.get("fahrenheit").and_then(Value::as_f64) {
        Some(fahrenheit) => format!("{:.1}", (fahrenheit - 32.0) * 5.0 / 9.0),
        None => "Missing fahrenheit parameter".to_string(),
    }
}
