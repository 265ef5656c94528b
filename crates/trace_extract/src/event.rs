use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Rendered in place of an absent author or function name.
pub const UNKNOWN_SENTINEL: &str = "unknown";

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FunctionCall {
    pub name: Option<String>,
}

impl FunctionCall {
    pub fn name_or_unknown(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_SENTINEL)
    }
}

/// One record of an event trace.
///
/// Every field is optional: a field of the wrong JSON type is treated the same as a missing one,
/// so constructing a `TraceEvent` never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceEvent {
    pub author: Option<String>,
    /// The `actions` key is present, whatever its value.
    pub has_actions: bool,
    pub state_delta: Option<Map<String, Value>>,
    /// One entry per `content.parts[*].functionCall`, in part order.
    pub function_calls: Vec<FunctionCall>,
}

impl TraceEvent {
    pub fn from_value(raw: &Value) -> Self {
        let author = raw
            .get("author")
            .and_then(Value::as_str)
            .map(str::to_string);
        let actions = raw.get("actions").and_then(Value::as_object);
        let state_delta = actions
            .and_then(|actions| actions.get("stateDelta"))
            .and_then(Value::as_object)
            .cloned();

        Self {
            author,
            has_actions: raw.get("actions").is_some(),
            state_delta,
            function_calls: function_calls(raw),
        }
    }

    pub fn from_values(raw: &[Value]) -> Vec<Self> {
        raw.iter().map(Self::from_value).collect()
    }

    pub fn author_or_unknown(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_SENTINEL)
    }

    pub fn is_authored_by(&self, author: &str) -> bool {
        self.author.as_deref() == Some(author)
    }

    pub fn state_value(&self, output_key: &str) -> Option<&Value> {
        self.state_delta.as_ref()?.get(output_key)
    }

    pub fn carries(&self, author: &str, output_key: &str) -> bool {
        self.is_authored_by(author) && self.state_value(output_key).is_some()
    }
}

impl<'de> Deserialize<'de> for TraceEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|raw| Self::from_value(&raw))
    }
}

fn function_calls(raw: &Value) -> Vec<FunctionCall> {
    let Some(parts) = raw
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    parts
        .iter()
        .filter_map(|part| part.get("functionCall"))
        .map(|call| FunctionCall {
            name: call.get("name").and_then(Value::as_str).map(str::to_string),
        })
        .collect()
}
