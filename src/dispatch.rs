//! Dispatcher — resolves `(tool, method)` against the registry, validates
//! the positional arguments and runs the handler.
//!
//! Every failure comes back as a [`DispatchError`]; nothing a handler does
//! (including panicking) escapes to the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::registry::{LookupError, MethodSpec, Registry};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown method '{method}' on tool '{tool}'")]
    UnknownMethod { tool: String, method: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Domain(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownTool(_) => "unknown_tool",
            DispatchError::UnknownMethod { .. } => "unknown_method",
            DispatchError::InvalidArguments(_) => "invalid_arguments",
            DispatchError::Domain(_) => "domain_error",
            DispatchError::Internal(_) => "internal_error",
        }
    }
}

impl From<LookupError> for DispatchError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::UnknownTool(tool) => DispatchError::UnknownTool(tool),
            LookupError::UnknownMethod { tool, method } => {
                DispatchError::UnknownMethod { tool, method }
            }
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn invoke(&self, tool: &str, method: &str, params: &[Value]) -> Result<Value, DispatchError> {
        let outcome = self.resolve_and_run(tool, method, params);
        match &outcome {
            Ok(_) => tracing::debug!(tool = %tool, method = %method, "dispatch: ok"),
            Err(e) => tracing::info!(
                tool = %tool,
                method = %method,
                kind = e.kind(),
                "dispatch failed: {}",
                e
            ),
        }
        outcome
    }

    fn resolve_and_run(&self, tool: &str, method: &str, params: &[Value]) -> Result<Value, DispatchError> {
        let spec = self.registry.get_method(tool, method)?;
        validate(tool, spec, params)?;

        let handler = spec.handler.clone();
        match panic::catch_unwind(AssertUnwindSafe(|| handler(params))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DispatchError::Domain(e.0)),
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                tracing::error!(tool = %tool, method = %method, "dispatch: handler panicked: {}", detail);
                Err(DispatchError::Internal(detail))
            }
        }
    }
}

/// Arity first, then item types, so the message names the first problem.
fn validate(tool: &str, spec: &MethodSpec, params: &[Value]) -> Result<(), DispatchError> {
    let shape = &spec.shape;
    if !shape.accepts_len(params.len()) {
        let expected = if shape.min_items == shape.max_items {
            shape.min_items.to_string()
        } else {
            format!("{}..={}", shape.min_items, shape.max_items)
        };
        return Err(DispatchError::InvalidArguments(format!(
            "{}.{} expects {} argument(s), got {}",
            tool,
            spec.name,
            expected,
            params.len()
        )));
    }

    if let Some((index, _)) = params
        .iter()
        .enumerate()
        .find(|(_, v)| !shape.item_type.matches(v))
    {
        return Err(DispatchError::InvalidArguments(format!(
            "{}.{} argument {} must be a {}",
            tool, spec.name, index, shape.item_type
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Effects;
    use crate::registry::builtin::default_registry;
    use crate::registry::{ItemType, MethodSpec, ParameterShape, ToolDefinition};
    use chrono::Utc;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let effects = Effects::fixed(Utc::now(), 20, "x");
        Dispatcher::new(Arc::new(default_registry(&effects)))
    }

    fn args(v: Value) -> Vec<Value> {
        v.as_array().unwrap().clone()
    }

    #[test]
    fn resolution_order_tool_then_method() {
        let d = dispatcher();
        assert_eq!(
            d.invoke("abacus", "divide", &args(json!([1, 2]))),
            Err(DispatchError::UnknownTool("abacus".into()))
        );
        assert_eq!(
            d.invoke("calculator", "modulo", &args(json!([1, 2]))),
            Err(DispatchError::UnknownMethod { tool: "calculator".into(), method: "modulo".into() })
        );
    }

    #[test]
    fn arity_is_checked_before_the_handler() {
        let d = dispatcher();
        let err = d.invoke("calculator", "add", &args(json!([2]))).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments(ref m) if m.contains("expects 2")));
        let err = d.invoke("calculator", "add", &args(json!([1, 2, 3]))).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments(_)));
        let err = d.invoke("weather", "getTemperature", &[]).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments(_)));
    }

    #[test]
    fn item_types_are_checked() {
        let d = dispatcher();
        let err = d.invoke("calculator", "add", &args(json!([2, "3"]))).unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidArguments("calculator.add argument 1 must be a number".into())
        );
        let err = d.invoke("weather", "getTemperature", &args(json!([42]))).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArguments(_)));
    }

    #[test]
    fn domain_errors_are_normalised() {
        let d = dispatcher();
        assert_eq!(
            d.invoke("calculator", "divide", &args(json!([1, 0]))),
            Err(DispatchError::Domain("Division by zero".into()))
        );
    }

    #[test]
    fn valid_calls_return_documented_results() {
        let d = dispatcher();
        assert_eq!(d.invoke("calculator", "add", &args(json!([2, 3]))), Ok(json!(5)));
        assert_eq!(d.invoke("calculator", "divide", &args(json!([10, 2]))), Ok(json!(5)));
        assert_eq!(
            d.invoke("weather", "getTemperature", &args(json!(["Seoul"]))),
            Ok(json!("Seoul의 현재 온도는 20°C입니다."))
        );
    }

    #[test]
    fn handler_panic_becomes_internal_error() {
        let registry = Registry::new(vec![ToolDefinition::new("broken", "panics").method(
            MethodSpec::new("boom", "always panics", ParameterShape::exactly(ItemType::Number, 0), |_| {
                panic!("kaboom")
            }),
        )]);
        let d = Dispatcher::new(Arc::new(registry));
        assert_eq!(d.invoke("broken", "boom", &[]), Err(DispatchError::Internal("kaboom".into())));
    }

    #[test]
    fn every_error_has_a_message() {
        let errors = [
            DispatchError::UnknownTool("x".into()),
            DispatchError::UnknownMethod { tool: "x".into(), method: "y".into() },
            DispatchError::InvalidArguments("bad".into()),
            DispatchError::Domain("Division by zero".into()),
            DispatchError::Internal("oops".into()),
        ];
        for e in errors {
            assert!(!e.to_string().is_empty());
        }
    }
}
