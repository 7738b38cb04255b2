//! Tool parameter schemas and invocation outcomes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    /// JSON Schema object describing the parameters.
    pub schema: Value,
}

impl ToolParameters {
    /// Create an empty parameter schema (no parameters).
    pub fn empty() -> Self {
        Self::object().build()
    }

    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: Map::new(),
            required: Vec::new(),
        }
    }

    /// The schema as a JSON object, as MCP expects it.
    pub fn as_object(&self) -> Map<String, Value> {
        self.schema.as_object().cloned().unwrap_or_default()
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    fn property(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a required string property.
    pub fn string(self, name: &str, description: &str) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": description}),
            true,
        )
    }

    /// Add an optional string property.
    pub fn optional_string(self, name: &str, description: &str) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": description}),
            false,
        )
    }

    /// Add an optional string property with a default.
    pub fn string_or(self, name: &str, description: &str, default: &str) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": description, "default": default}),
            false,
        )
    }

    /// Add an enum (string) property with a default.
    pub fn string_enum(self, name: &str, description: &str, values: &[&str], default: &str) -> Self {
        self.property(
            name,
            json!({"type": "string", "description": description, "enum": values, "default": default}),
            false,
        )
    }

    /// Add a required integer property.
    pub fn integer(self, name: &str, description: &str) -> Self {
        self.property(
            name,
            json!({"type": "integer", "description": description}),
            true,
        )
    }

    /// Add an optional integer property.
    pub fn optional_integer(self, name: &str, description: &str) -> Self {
        self.property(
            name,
            json!({"type": "integer", "description": description}),
            false,
        )
    }

    /// Add an optional integer property with a default.
    pub fn integer_or(self, name: &str, description: &str, default: u64) -> Self {
        self.property(
            name,
            json!({"type": "integer", "description": description, "default": default}),
            false,
        )
    }

    /// Add an optional number property with a default.
    pub fn number_or(self, name: &str, description: &str, default: f64) -> Self {
        self.property(
            name,
            json!({"type": "number", "description": description, "default": default}),
            false,
        )
    }

    /// Add an optional boolean property with a default.
    pub fn boolean_or(self, name: &str, description: &str, default: bool) -> Self {
        self.property(
            name,
            json!({"type": "boolean", "description": description, "default": default}),
            false,
        )
    }

    /// Add a required list-of-strings property.
    pub fn string_list(self, name: &str, description: &str) -> Self {
        self.property(
            name,
            json!({"type": "array", "items": {"type": "string"}, "description": description}),
            true,
        )
    }

    /// Add the required `token` property.
    pub fn token(self) -> Self {
        self.string("token", "User access token for CSGHub.")
    }

    /// Add an optional `token` property.
    pub fn optional_token(self) -> Self {
        self.optional_string("token", "User access token for CSGHub (optional).")
    }

    /// Add `per` and `page` pagination properties.
    pub fn per_page(self, size_key: &str, default_size: u64) -> Self {
        self.integer_or(size_key, "Number of items per page.", default_size)
            .integer_or("page", "Page number, starting from 1.", 1)
    }

    /// Build into ToolParameters.
    pub fn build(self) -> ToolParameters {
        ToolParameters {
            schema: json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}

/// Text result of one tool invocation as handed to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    /// JSON document, serialized.
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    /// Parse the text back into JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_tracks_required_and_defaults() {
        let params = ToolParameters::object()
            .token()
            .per_page("per", 10)
            .string_enum("sdk", "App SDK.", &["gradio", "streamlit"], "gradio")
            .build();
        assert_eq!(params.schema["required"], json!(["token"]));
        assert_eq!(params.schema["properties"]["per"]["default"], 10);
        assert_eq!(params.schema["properties"]["sdk"]["enum"][1], "streamlit");
        assert_eq!(params.as_object()["type"], "object");
    }

    #[test]
    fn empty_schema_is_an_object() {
        let params = ToolParameters::empty();
        assert_eq!(
            params.schema,
            json!({"type": "object", "properties": {}, "required": []})
        );
    }
}
