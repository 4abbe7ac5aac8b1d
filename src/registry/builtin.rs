// ---------------------------------------------------------------------------
// registry/builtin.rs — calculator + weather, the tools served by default
// ---------------------------------------------------------------------------

use std::sync::Arc;

use serde_json::Value;

use super::{ItemType, MethodSpec, ParameterShape, Registry, ToolDefinition, ToolError};
use crate::effects::{Effects, RandomSource};

/// Inclusive bounds of the weather stub's temperature.
pub const TEMPERATURE_MIN: i64 = 15;
pub const TEMPERATURE_MAX: i64 = 29;

/// Largest integer an f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

pub fn default_registry(effects: &Effects) -> Registry {
    Registry::new(vec![calculator(), weather(effects.random.clone())])
}

pub fn calculator() -> ToolDefinition {
    let binary = ParameterShape::exactly(ItemType::Number, 2);

    ToolDefinition::new("calculator", "Basic arithmetic on two numbers")
        .method(MethodSpec::new("add", "Add two numbers", binary, |args| {
            arithmetic(args, |a, b| Ok(a + b))
        }))
        .method(MethodSpec::new("subtract", "Subtract the second number from the first", binary, |args| {
            arithmetic(args, |a, b| Ok(a - b))
        }))
        .method(MethodSpec::new("multiply", "Multiply two numbers", binary, |args| {
            arithmetic(args, |a, b| Ok(a * b))
        }))
        .method(MethodSpec::new("divide", "Divide the first number by the second", binary, |args| {
            arithmetic(args, |a, b| {
                if b == 0.0 {
                    Err(ToolError::new("Division by zero"))
                } else {
                    Ok(a / b)
                }
            })
        }))
}

pub fn weather(random: Arc<dyn RandomSource>) -> ToolDefinition {
    ToolDefinition::new("weather", "Current weather lookup (stubbed)").method(MethodSpec::new(
        "getTemperature",
        "Current temperature for a city",
        ParameterShape::exactly(ItemType::String, 1),
        move |args| {
            let city = args
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| ToolError::new("city must be a string"))?;
            let temperature = random.int_in_range(TEMPERATURE_MIN, TEMPERATURE_MAX);
            Ok(Value::String(format!("{city}의 현재 온도는 {temperature}°C입니다.")))
        },
    ))
}

fn arithmetic<F>(args: &[Value], op: F) -> Result<Value, ToolError>
where
    F: Fn(f64, f64) -> Result<f64, ToolError>,
{
    let a = operand(args, 0)?;
    let b = operand(args, 1)?;
    let result = op(a, b)?;
    if !result.is_finite() {
        return Err(ToolError::new("Result is not a finite number"));
    }
    Ok(number_value(result))
}

fn operand(args: &[Value], index: usize) -> Result<f64, ToolError> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| ToolError::new(format!("argument {index} must be a number")))
}

/// Integral results within the exact-integer range serialise as JSON
/// integers, so `2 + 3` is `5` rather than `5.0`.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
