use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::TraceLoadError;
use crate::event::TraceEvent;

/// Parses a trace from either a JSON array of events or JSONL (one event per line).
///
/// A single top-level object is read as a one-event trace. Blank JSONL lines are skipped and a
/// trailing `\r` is tolerated.
pub fn parse_trace_str(text: &str) -> Result<Vec<TraceEvent>, TraceLoadError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => Ok(TraceEvent::from_values(&items)),
        Ok(value @ Value::Object(_)) => Ok(vec![TraceEvent::from_value(&value)]),
        Ok(other) => Err(TraceLoadError::Shape {
            found: json_kind(&other),
        }),
        Err(err) if trimmed.starts_with('[') => Err(TraceLoadError::Json(err)),
        Err(_) => parse_jsonl(text),
    }
}

fn parse_jsonl(text: &str) -> Result<Vec<TraceEvent>, TraceLoadError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.chars().all(|ch| ch.is_whitespace()) {
            continue;
        }
        let value = serde_json::from_str::<Value>(line).map_err(|err| TraceLoadError::Line {
            line_number: idx + 1,
            message: err.to_string(),
        })?;
        if !value.is_object() {
            return Err(TraceLoadError::Line {
                line_number: idx + 1,
                message: format!("expected an event object, found {}", json_kind(&value)),
            });
        }
        events.push(TraceEvent::from_value(&value));
    }
    Ok(events)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn read_trace<R: Read>(mut reader: R) -> Result<Vec<TraceEvent>, TraceLoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_trace_str(&text)
}

pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, TraceLoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TraceLoadError::File {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace_str(&text)
}

#[cfg(feature = "tokio")]
mod tokio_load {
    use tokio::io::{AsyncRead, AsyncReadExt};

    use crate::error::TraceLoadError;
    use crate::event::TraceEvent;

    pub async fn read_trace_async<R: AsyncRead + Unpin>(
        mut reader: R,
    ) -> Result<Vec<TraceEvent>, TraceLoadError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).await?;
        super::parse_trace_str(&text)
    }

}

#[cfg(feature = "tokio")]
pub use tokio_load::read_trace_async;
