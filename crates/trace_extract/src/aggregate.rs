use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::event::TraceEvent;
use crate::fence::{decode_output, DecodeOutcome};
use crate::registry::OutputKeyRegistry;

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    output_key: String,
    value: Option<Value>,
}

/// First recorded output per registered key, in registry order.
///
/// Every registered key is present. Unresolved keys serialize as `null`. A `null` value is never
/// stored, so a key whose first occurrence is `null` stays open for a later event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentOutputs {
    slots: Vec<Slot>,
}

impl AgentOutputs {
    fn pending<'a>(keys: impl Iterator<Item = &'a str>) -> Self {
        Self {
            slots: keys
                .map(|key| Slot {
                    output_key: key.to_string(),
                    value: None,
                })
                .collect(),
        }
    }

    /// The stored value for `output_key`, or `None` when it is unresolved or unregistered.
    pub fn get(&self, output_key: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|slot| slot.output_key == output_key)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn is_resolved(&self, output_key: &str) -> bool {
        self.get(output_key).is_some()
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.slots
            .iter()
            .map(|slot| (slot.output_key.as_str(), slot.value.as_ref()))
    }

    fn all_resolved(&self) -> bool {
        self.slots.iter().all(|slot| slot.value.is_some())
    }
}

impl Serialize for AgentOutputs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for slot in &self.slots {
            map.serialize_entry(&slot.output_key, &slot.value)?;
        }
        map.end()
    }
}

/// Scans the trace forward and stores the first value seen under each registered key.
///
/// Author is not checked. A fenced JSON payload is stored parsed; text without a decodable
/// fence is stored verbatim; non-text values are stored as-is. A value that is or decodes to
/// `null` leaves the key unresolved. A resolved key is never overwritten by a later event.
pub fn extract_all(events: &[TraceEvent], registry: &OutputKeyRegistry) -> AgentOutputs {
    let mut outputs = AgentOutputs::pending(registry.keys());

    for (entry_index, event) in events.iter().enumerate() {
        let Some(state_delta) = event.state_delta.as_ref() else {
            continue;
        };

        for slot in outputs.slots.iter_mut().filter(|slot| slot.value.is_none()) {
            let Some(raw) = state_delta.get(&slot.output_key) else {
                continue;
            };
            let value = decode_permissive(raw);
            if value.is_null() {
                debug!(output_key = %slot.output_key, entry_index, "skipping null agent output");
                continue;
            }
            debug!(
                output_key = %slot.output_key,
                entry_index,
                author = event.author_or_unknown(),
                "resolved agent output"
            );
            slot.value = Some(value);
        }

        if outputs.all_resolved() {
            break;
        }
    }

    outputs
}

fn decode_permissive(raw: &Value) -> Value {
    match decode_output(raw) {
        DecodeOutcome::Structured(value) | DecodeOutcome::Parsed(value) => value,
        DecodeOutcome::MissingFence | DecodeOutcome::InvalidJson { .. } => raw.clone(),
    }
}
