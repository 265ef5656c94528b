use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use trace_extract::{
    extract_output_detailed, ExtractError, ExtractionReport, OutputKeyRegistry, RegistryError,
    TraceEvent, TraceLoadError,
};

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Agent whose output to extract. Requires `--key`.
    #[arg(long, requires = "key")]
    pub author: Option<String>,

    /// State-delta key holding the output. Requires `--author`.
    #[arg(long, requires = "author")]
    pub key: Option<String>,

    /// Exit with an error instead of printing `null` when nothing is extracted.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load trace: {0}")]
    Trace(#[from] TraceLoadError),
    #[error("failed to load registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub struct Input {
    pub events: Vec<TraceEvent>,
    pub registry: OutputKeyRegistry,
}

impl Input {
    pub fn load(trace: Option<&Path>, registry: Option<&Path>) -> Result<Self, Error> {
        let events = match trace {
            Some(path) => trace_extract::read_trace_file(path)?,
            None => trace_extract::read_trace(io::stdin().lock())?,
        };
        let registry = match registry {
            Some(path) => OutputKeyRegistry::from_path(path)?,
            None => OutputKeyRegistry::default(),
        };
        debug!(
            entries = events.len(),
            keys = registry.key_count(),
            "loaded trace"
        );
        Ok(Self { events, registry })
    }
}

pub struct Output {
    pub pretty: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), Error> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        Ok(())
    }
}

pub fn extract(input: &Input, output: &Output, args: ExtractArgs) -> Result<(), Error> {
    let (author, key) = match (args.author, args.key) {
        (Some(author), Some(key)) => (author, key),
        _ => {
            let target = input.registry.final_output();
            (target.author.clone(), target.output_key.clone())
        }
    };

    match extract_output_detailed(&input.events, &author, &key) {
        Ok(extracted) => output.emit(&extracted.value),
        Err(err) if args.strict => Err(err.into()),
        Err(err) => {
            debug!(error = %err, "nothing extracted");
            output.emit(&serde_json::Value::Null)
        }
    }
}

pub fn extract_all(input: &Input, output: &Output) -> Result<(), Error> {
    output.emit(&trace_extract::extract_all(&input.events, &input.registry))
}

pub fn summarize(input: &Input, output: &Output) -> Result<(), Error> {
    output.emit(&trace_extract::summarize(
        &input.events,
        input.registry.final_output(),
    ))
}

pub fn diagnose(input: &Input, output: &Output) -> Result<(), Error> {
    output.emit(&trace_extract::diagnose(&input.events, &input.registry))
}

pub fn report(input: &Input, output: &Output) -> Result<(), Error> {
    output.emit(&ExtractionReport::build(&input.events, &input.registry))
}
