use serde::Serialize;

use crate::event::TraceEvent;
use crate::registry::OutputTarget;

/// One function call found in an event's `content.parts`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AgentCall {
    /// 0-based position of the owning event in the trace.
    pub entry_index: usize,
    pub function_name: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct TraceSummary {
    pub total_entries: usize,
    /// One entry per event, duplicates and order preserved.
    pub authors: Vec<String>,
    pub agent_calls: Vec<AgentCall>,
    /// Some event by the coordinator carries the final key. Presence only; nothing is decoded.
    pub final_output_found: bool,
}

pub fn summarize(events: &[TraceEvent], final_output: &OutputTarget) -> TraceSummary {
    let mut summary = TraceSummary {
        total_entries: events.len(),
        ..TraceSummary::default()
    };

    for (entry_index, event) in events.iter().enumerate() {
        let author = event.author_or_unknown();
        summary.authors.push(author.to_string());
        summary
            .agent_calls
            .extend(event.function_calls.iter().map(|call| AgentCall {
                entry_index,
                function_name: call.name_or_unknown().to_string(),
                author: author.to_string(),
            }));
        if event.carries(&final_output.author, &final_output.output_key) {
            summary.final_output_found = true;
        }
    }

    summary
}
