#![forbid(unsafe_code)]
//! Recovers structured agent results from multi-agent conversation traces.
//!
//! A trace is the ordered list of events emitted by one multi-agent run. Agents publish their
//! results into an event's `actions.stateDelta` mapping, usually as free text wrapping a
//! ```` ```json ```` fenced payload. This crate provides:
//! - A tolerant event model where every field is optional ([`TraceEvent`]).
//! - Targeted extraction of one agent's most recent output ([`extract_output`]).
//! - Aggregate extraction of the first output recorded under each registered key ([`extract_all`]).
//! - A diagnostic digest of authors and function calls ([`summarize`], [`diagnose`]).
//!
//! None of the extraction operations fail: malformed events are skipped and decode failures
//! degrade to "absent". [`extract_output_detailed`] keeps the failure cause for callers that
//! need it.

mod aggregate;
mod diagnostics;
mod error;
mod event;
mod extract;
mod fence;
mod load;
mod registry;
mod report;
mod summary;

pub use aggregate::{extract_all, AgentOutputs};
pub use diagnostics::{diagnose, EventDiagnostic};
pub use error::{ExtractError, RegistryError, TraceLoadError};
pub use event::{FunctionCall, TraceEvent, UNKNOWN_SENTINEL};
pub use extract::{extract_final_output, extract_output, extract_output_detailed, Extracted};
pub use fence::{decode_fenced_text, decode_output, fenced_json_body, DecodeOutcome};
pub use load::{parse_trace_str, read_trace, read_trace_file};
pub use registry::{OutputKeyRegistry, OutputTarget};
pub use report::ExtractionReport;
pub use summary::{summarize, AgentCall, TraceSummary};

#[cfg(feature = "tokio")]
pub use load::read_trace_async;
