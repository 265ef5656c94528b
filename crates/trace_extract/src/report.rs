use serde::Serialize;
use serde_json::Value;

use crate::aggregate::{extract_all, AgentOutputs};
use crate::event::TraceEvent;
use crate::extract::extract_final_output;
use crate::registry::OutputKeyRegistry;
use crate::summary::{summarize, TraceSummary};

/// Every extraction over one trace, bundled for a response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub final_output: Option<Value>,
    pub agent_outputs: AgentOutputs,
    pub conversation_summary: TraceSummary,
    /// The final output was found, decoded, and is not empty (`null`, `""`, `[]` or `{}`).
    pub extraction_successful: bool,
    pub total_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionReport {
    pub fn build(events: &[TraceEvent], registry: &OutputKeyRegistry) -> Self {
        let final_output = extract_final_output(events, registry);
        let extraction_successful = final_output.as_ref().is_some_and(|value| !is_empty(value));
        let error = (!extraction_successful)
            .then(|| format!("No {} found", registry.final_output().output_key));

        Self {
            final_output,
            agent_outputs: extract_all(events, registry),
            conversation_summary: summarize(events, registry.final_output()),
            extraction_successful,
            total_entries: events.len(),
            error,
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
