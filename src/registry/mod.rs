//! Tool registry — the static table of tools and their methods.
//!
//! Built once at startup (see [`builtin::default_registry`]) and shared
//! read-only behind an `Arc`. There is no mutation API.

pub mod builtin;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Failure raised by a tool handler (e.g. division by zero).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ToolError(pub String);

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Positional-argument handler. Arguments have already been validated
/// against the method's [`ParameterShape`] when this runs.
pub type Handler = Arc<dyn Fn(&[Value]) -> Result<Value, ToolError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Number,
    String,
}

impl ItemType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ItemType::Number => value.is_number(),
            ItemType::String => value.is_string(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Number => f.write_str("number"),
            ItemType::String => f.write_str("string"),
        }
    }
}

/// Accepted argument list: every item of `item_type`, length within
/// `min_items..=max_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterShape {
    pub item_type: ItemType,
    pub min_items: usize,
    pub max_items: usize,
}

impl ParameterShape {
    pub const fn exactly(item_type: ItemType, n: usize) -> Self {
        Self {
            item_type,
            min_items: n,
            max_items: n,
        }
    }

    pub fn accepts_len(&self, len: usize) -> bool {
        (self.min_items..=self.max_items).contains(&len)
    }
}

#[derive(Clone)]
pub struct MethodSpec {
    pub name: String,
    pub description: String,
    pub shape: ParameterShape,
    pub handler: Handler,
}

impl MethodSpec {
    pub fn new<F>(name: &str, description: &str, shape: ParameterShape, handler: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            shape,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    methods: Vec<MethodSpec>,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            methods: Vec::new(),
        }
    }

    /// Append a method; a later method with the same name replaces the
    /// earlier one in place, keeping its position.
    pub fn method(mut self, spec: MethodSpec) -> Self {
        match self.methods.iter_mut().find(|m| m.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.methods.push(spec),
        }
        self
    }

    pub fn methods(&self) -> &[MethodSpec] {
        &self.methods
    }

    pub fn get_method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.iter().map(|m| m.name.clone()).collect()
    }
}

/// Public view of a tool, as served by `GET /tools`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown method '{method}' on tool '{tool}'")]
    UnknownMethod { tool: String, method: String },
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    tools: Vec<ToolDefinition>,
}

impl Registry {
    /// Tools keep the order given; a duplicate name replaces the earlier entry.
    pub fn new(tools: Vec<ToolDefinition>) -> Self {
        let mut deduped: Vec<ToolDefinition> = Vec::with_capacity(tools.len());
        for tool in tools {
            match deduped.iter_mut().find(|t| t.name == tool.name) {
                Some(existing) => *existing = tool,
                None => deduped.push(tool),
            }
        }
        Self { tools: deduped }
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn list_tools(&self) -> Vec<ToolSummary> {
        self.tools
            .iter()
            .map(|t| ToolSummary {
                name: t.name.clone(),
                description: t.description.clone(),
                methods: t.method_names(),
            })
            .collect()
    }

    pub fn get_method(&self, tool: &str, method: &str) -> Result<&MethodSpec, LookupError> {
        let definition = self
            .tool(tool)
            .ok_or_else(|| LookupError::UnknownTool(tool.to_string()))?;
        definition
            .get_method(method)
            .ok_or_else(|| LookupError::UnknownMethod {
                tool: tool.to_string(),
                method: method.to_string(),
            })
    }
}
