use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

// Non-greedy: the body ends at the first closing fence after the opening one.
const FENCE_PATTERN: &str = r"(?s)```json\s*\n(.*?)\n```";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).expect("fence pattern compiles"))
}

/// Result of decoding one state-delta value.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// The value was not text and is returned unchanged.
    Structured(Value),
    /// A fenced JSON block was found and parsed. May be `Value::Null`.
    Parsed(Value),
    MissingFence,
    InvalidJson { message: String },
}

impl DecodeOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Structured(_) | Self::Parsed(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Structured(value) | Self::Parsed(value) => Some(value),
            Self::MissingFence | Self::InvalidJson { .. } => None,
        }
    }
}

/// Decodes a raw state-delta value. Never panics and never fails outright; see [`DecodeOutcome`].
pub fn decode_output(raw: &Value) -> DecodeOutcome {
    match raw {
        Value::String(text) => decode_fenced_text(text),
        other => DecodeOutcome::Structured(other.clone()),
    }
}

pub fn decode_fenced_text(text: &str) -> DecodeOutcome {
    let Some(body) = fenced_json_body(text) else {
        return DecodeOutcome::MissingFence;
    };
    match serde_json::from_str::<Value>(body) {
        Ok(value) => DecodeOutcome::Parsed(value),
        Err(err) => DecodeOutcome::InvalidJson {
            message: err.to_string(),
        },
    }
}

/// Returns the trimmed body of the first ```` ```json ```` block in `text`.
pub fn fenced_json_body(text: &str) -> Option<&str> {
    fence_regex()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim())
}
