//! Typed records exchanged with the inference engine
//!
//! Each record is a plain serde struct that can also describe its own fields.
//! The engine receives the input record as `in_value` and the output record's
//! field map as `out_type`, then answers with a JSON object of that shape.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

/// Type tag of a record field, as understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Str,
    /// Integer
    Int,
    /// Floating point number
    Float,
    /// Boolean
    Bool,
}

impl FieldKind {
    /// Engine-side type tag
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }

    /// JSON Schema type name
    pub fn json_type(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
        }
    }
}

/// One described field of an [`LlmType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name as it appears in JSON
    pub name: &'static str,
    /// Type tag
    pub kind: FieldKind,
    /// Human-readable meaning of the field
    pub description: &'static str,
}

impl Field {
    /// A free-text field
    pub const fn str(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Str,
            description,
        }
    }
}

/// A record that can cross the engine boundary
pub trait LlmType: Serialize + DeserializeOwned + Send + Sync {
    /// Described fields, in declaration order
    fn fields() -> &'static [Field];

    /// `{name: type_tag}` map sent to the engine as the expected output shape
    fn output_type() -> Map<String, Value> {
        Self::fields()
            .iter()
            .map(|f| (f.name.to_string(), Value::String(f.kind.as_str().to_string())))
            .collect()
    }

    /// JSON Schema object describing the record
    fn json_schema() -> Value {
        let properties: Map<String, Value> = Self::fields()
            .iter()
            .map(|f| {
                (
                    f.name.to_string(),
                    json!({ "type": f.kind.json_type(), "description": f.description }),
                )
            })
            .collect();
        let required: Vec<&str> = Self::fields().iter().map(|f| f.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A natural-language question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text, passed through untouched
    pub question: String,
}

impl Question {
    /// Wrap a question string
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

impl LlmType for Question {
    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[Field::str("question", "A question")];
        FIELDS
    }
}

/// The engine's natural-language reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text
    pub answer: String,
}

impl LlmType for Answer {
    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[Field::str("answer", "An answer to the question")];
        FIELDS
    }
}
