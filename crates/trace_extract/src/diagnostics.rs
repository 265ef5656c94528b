use serde::Serialize;

use crate::event::TraceEvent;
use crate::registry::OutputKeyRegistry;

/// Per-event view used when an extraction comes back empty and the trace needs inspecting.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct EventDiagnostic {
    pub entry_index: usize,
    pub author: String,
    pub has_actions: bool,
    pub has_state_delta: bool,
    /// Registered keys present in this event's state delta, in registry order.
    pub registered_keys: Vec<String>,
    pub has_final_output: bool,
    pub function_calls: usize,
}

pub fn diagnose(events: &[TraceEvent], registry: &OutputKeyRegistry) -> Vec<EventDiagnostic> {
    let final_output = registry.final_output();
    events
        .iter()
        .enumerate()
        .map(|(entry_index, event)| EventDiagnostic {
            entry_index,
            author: event.author_or_unknown().to_string(),
            has_actions: event.has_actions,
            has_state_delta: event.state_delta.is_some(),
            registered_keys: registry
                .keys()
                .filter(|key| event.state_value(key).is_some())
                .map(str::to_string)
                .collect(),
            has_final_output: event.carries(&final_output.author, &final_output.output_key),
            function_calls: event.function_calls.len(),
        })
        .collect()
}
