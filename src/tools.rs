//! # Client-side tools
//!
//! A [`Tool`] is a function the model may call during an agent turn. It carries
//! a name, a description, a JSON Schema for its arguments, and an async
//! handler that runs in this process when the model emits a `function_call`.
//!
//! ## Schema notation
//!
//! Arguments can be described in three ways, all normalized to a JSON Schema
//! object:
//!
//! - **Simple notation**: `{"ticker_symbol": "string"}` (every parameter required)
//! - **Typed properties**: `{"start": {"type": "string", "optional": true}}`
//! - **Full JSON Schema**: passed through unchanged
//!
//! ## Example
//!
//! ```rust,no_run
//! use llama_stack_demos::tool;
//! use serde_json::json;
//!
//! let echo = tool("echo", "Repeat the input back")
//!     .param("text", "string")
//!     .build(|args| async move { Ok(json!({"echo": args["text"]})) });
//! ```

use crate::Result;
use crate::types::ToolSpec;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed async handler: JSON arguments in, JSON result out.
pub type ToolHandler =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>> + Send + Sync>;

/// A function the model can call, executed locally.
///
/// Cloning is cheap: the handler is shared behind an `Arc`.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    input_schema: Value,
    handler: ToolHandler,
}

impl Tool {
    /// Create a tool from a name, description, argument schema and handler.
    ///
    /// See the module docs for the accepted schema notations.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: normalize_schema(input_schema),
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// Run the handler.
    pub async fn execute(&self, arguments: Value) -> Result<Value> {
        (self.handler)(arguments).await
    }

    /// The tool in the Responses API `function` tool format.
    pub fn to_spec(&self) -> ToolSpec {
        ToolSpec::Function {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

fn normalize_schema(schema: Value) -> Value {
    let Value::Object(params) = schema else {
        return json!({"type": "object", "properties": {}, "required": []});
    };
    if params.contains_key("type") && params.contains_key("properties") {
        return Value::Object(params);
    }

    let mut properties = Map::new();
    let mut required = Vec::new();

    for (name, spec) in params {
        match spec {
            Value::String(type_str) => {
                properties.insert(name.clone(), json!({ "type": json_type(&type_str) }));
                required.push(name);
            }
            Value::Object(mut prop) => {
                let optional = prop
                    .remove("optional")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                let explicit_required = prop.remove("required").and_then(|v| v.as_bool());
                let has_default = prop.contains_key("default");

                properties.insert(name.clone(), Value::Object(prop));

                // Explicit flags win; otherwise a default value makes it optional.
                let is_required = match explicit_required {
                    Some(flag) => flag,
                    None => !optional && !has_default,
                };
                if is_required {
                    required.push(name);
                }
            }
            _ => {}
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn json_type(type_str: &str) -> &'static str {
    match type_str {
        "string" | "str" => "string",
        "integer" | "int" | "i32" | "i64" | "u32" | "u64" => "integer",
        "number" | "float" | "f32" | "f64" => "number",
        "boolean" | "bool" => "boolean",
        "array" | "list" | "vec" => "array",
        "object" | "dict" | "map" => "object",
        _ => "string",
    }
}

/// Builder for [`Tool`], created with [`tool`].
pub struct ToolBuilder {
    name: String,
    description: String,
    schema: Map<String, Value>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: Map::new(),
        }
    }

    /// Add a required parameter in simple type notation.
    pub fn param(mut self, name: &str, type_str: &str) -> Self {
        self.schema
            .insert(name.to_string(), Value::String(type_str.to_string()));
        self
    }

    /// Add an optional parameter with a description.
    pub fn optional_param(mut self, name: &str, type_str: &str, description: &str) -> Self {
        self.schema.insert(
            name.to_string(),
            json!({
                "type": json_type(type_str),
                "description": description,
                "optional": true
            }),
        );
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> Tool
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Tool::new(self.name, self.description, Value::Object(self.schema), handler)
    }
}

/// Start building a tool.
pub fn tool(name: impl Into<String>, description: impl Into<String>) -> ToolBuilder {
    ToolBuilder::new(name, description)
}
