//! Tool descriptors advertised to the model

use serde_json::{Map, Value, json};

use crate::llm::ToolDefinition;

/// The closed set of tools the agent can call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Price,
    News,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::Price, ToolKind::News];

    /// Wire name used in the tool-use protocol
    pub fn name(&self) -> &'static str {
        match self {
            Self::Price => "get_crypto_price",
            Self::News => "get_crypto_news",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// JSON-schema type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
}

impl ParamType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub param_type: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn required(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            param_type,
            description,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &'static str, param_type: ParamType, description: &'static str, default: Value) -> Self {
        Self {
            name,
            param_type,
            description,
            required: false,
            default: Some(default),
        }
    }

    fn schema(&self) -> Value {
        let mut schema = json!({
            "type": self.param_type.as_str(),
            "description": self.description,
        });
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

/// Name, description and parameters of one tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolDescriptor {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Object schema with one property per parameter
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|param| (param.name.to_string(), param.schema()))
            .collect();
        let required: Vec<&str> = self.params.iter().filter(|p| p.required).map(|p| p.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn to_llm_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description, self.input_schema())
    }
}
