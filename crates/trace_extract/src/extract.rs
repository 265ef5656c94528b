use serde_json::Value;
use tracing::debug;

use crate::error::ExtractError;
use crate::event::TraceEvent;
use crate::fence::{decode_output, DecodeOutcome};
use crate::registry::OutputKeyRegistry;

/// A decoded output and the 0-based trace index of the event it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub entry_index: usize,
    pub value: Value,
}

/// Returns the decoded `output_key` value from the most recent event authored by `author`.
///
/// Only the most recent matching event is considered: if its value cannot be decoded the result
/// is `None`, even when an earlier event carries a decodable value.
pub fn extract_output(events: &[TraceEvent], author: &str, output_key: &str) -> Option<Value> {
    extract_output_detailed(events, author, output_key)
        .ok()
        .map(|extracted| extracted.value)
}

/// Targeted extraction of the registry's coordinator output.
pub fn extract_final_output(events: &[TraceEvent], registry: &OutputKeyRegistry) -> Option<Value> {
    let target = registry.final_output();
    extract_output(events, &target.author, &target.output_key)
}

/// Same scan as [`extract_output`], keeping the reason nothing was produced.
pub fn extract_output_detailed(
    events: &[TraceEvent],
    author: &str,
    output_key: &str,
) -> Result<Extracted, ExtractError> {
    let found = events
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, event)| event.is_authored_by(author))
        .find_map(|(entry_index, event)| {
            event
                .state_value(output_key)
                .map(|raw| (entry_index, raw))
        });

    let Some((entry_index, raw)) = found else {
        debug!(
            author,
            output_key,
            entries = events.len(),
            "no event carries the requested output"
        );
        return Err(ExtractError::NotFound {
            author: author.to_string(),
            output_key: output_key.to_string(),
        });
    };

    match decode_output(raw) {
        DecodeOutcome::Structured(value) | DecodeOutcome::Parsed(value) => {
            debug!(author, output_key, entry_index, "decoded output");
            Ok(Extracted { entry_index, value })
        }
        DecodeOutcome::MissingFence => {
            debug!(author, output_key, entry_index, "output has no fenced json block");
            Err(ExtractError::MissingFence {
                entry_index,
                output_key: output_key.to_string(),
            })
        }
        DecodeOutcome::InvalidJson { message } => {
            debug!(
                author,
                output_key,
                entry_index,
                error = %message,
                "output holds invalid fenced json"
            );
            Err(ExtractError::InvalidJson {
                entry_index,
                output_key: output_key.to_string(),
                message,
            })
        }
    }
}
