//! Builder for tool input schemas (JSON Schema objects).

use rmcp::model::JsonObject;
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct InputSchema {
    properties: JsonObject,
    required: Vec<String>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn string(self, name: &str, description: &str) -> Self {
        self.field(name, json!({ "type": "string", "description": description }), true)
    }

    pub fn optional_string(self, name: &str, description: &str) -> Self {
        self.field(name, json!({ "type": "string", "description": description }), false)
    }

    pub fn string_array(self, name: &str, description: &str) -> Self {
        self.field(
            name,
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description
            }),
            true,
        )
    }

    pub fn optional_string_array(self, name: &str, description: &str) -> Self {
        self.field(
            name,
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description
            }),
            false,
        )
    }

    pub fn optional_bool(self, name: &str, description: &str) -> Self {
        self.field(name, json!({ "type": "boolean", "description": description }), false)
    }

    /// Optional number constrained to `minimum..=maximum`.
    pub fn optional_integer(self, name: &str, description: &str, minimum: i64, maximum: i64) -> Self {
        self.field(
            name,
            json!({
                "type": "number",
                "minimum": minimum,
                "maximum": maximum,
                "description": description
            }),
            false,
        )
    }

    pub fn build(self) -> JsonObject {
        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(self.properties));
        if !self.required.is_empty() {
            schema.insert("required".to_string(), json!(self.required));
        }
        schema
    }
}
