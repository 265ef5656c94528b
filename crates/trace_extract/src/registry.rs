use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::RegistryError;

/// An agent and the state-delta key it publishes its result under.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct OutputTarget {
    pub author: String,
    pub output_key: String,
}

impl OutputTarget {
    pub fn new(author: impl Into<String>, output_key: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            output_key: output_key.into(),
        }
    }

    /// Target using the `<author>_output` key convention.
    pub fn for_agent(author: impl Into<String>) -> Self {
        let author = author.into();
        let output_key = format!("{author}_output");
        Self { author, output_key }
    }
}

/// The fixed set of output keys a run is expected to produce.
///
/// One coordinator target carries the run's final combined result; specialist targets carry the
/// per-agent results. Keys are declared up front, never discovered from a trace.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OutputKeyRegistry {
    final_output: OutputTarget,
    specialists: Vec<OutputTarget>,
}

impl Default for OutputKeyRegistry {
    fn default() -> Self {
        Self {
            final_output: OutputTarget::for_agent("financial_coordinator"),
            specialists: ["data_analyst", "trading_analyst", "risk_analyst", "execution_analyst"]
                .into_iter()
                .map(OutputTarget::for_agent)
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    final_output: TargetEntry,
    #[serde(default)]
    specialists: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TargetEntry {
    author: String,
    output_key: Option<String>,
}

impl From<TargetEntry> for OutputTarget {
    fn from(entry: TargetEntry) -> Self {
        match entry.output_key {
            Some(output_key) => OutputTarget::new(entry.author, output_key),
            None => OutputTarget::for_agent(entry.author),
        }
    }
}

impl OutputKeyRegistry {
    pub fn new(
        final_output: OutputTarget,
        specialists: Vec<OutputTarget>,
    ) -> Result<Self, RegistryError> {
        let registry = Self {
            final_output,
            specialists,
        };
        registry.validate()?;
        if registry.specialists.is_empty() {
            warn!(
                final_key = %registry.final_output.output_key,
                "output key registry declares no specialist agents"
            );
        }
        Ok(registry)
    }

    /// Parses a registry such as:
    ///
    /// ```toml
    /// [final_output]
    /// author = "financial_coordinator"
    ///
    /// [[specialists]]
    /// author = "data_analyst"
    /// output_key = "market_data_analysis_output"
    /// ```
    ///
    /// An omitted `output_key` defaults to `<author>_output`.
    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(text)?;
        Self::new(
            file.final_output.into(),
            file.specialists.into_iter().map(Into::into).collect(),
        )
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn final_output(&self) -> &OutputTarget {
        &self.final_output
    }

    pub fn specialists(&self) -> &[OutputTarget] {
        &self.specialists
    }

    /// Every registered key: specialists in declaration order, then the final key.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.specialists
            .iter()
            .chain(std::iter::once(&self.final_output))
            .map(|target| target.output_key.as_str())
    }

    pub fn contains_key(&self, output_key: &str) -> bool {
        self.keys().any(|key| key == output_key)
    }

    pub fn key_count(&self) -> usize {
        self.specialists.len() + 1
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for target in self
            .specialists
            .iter()
            .chain(std::iter::once(&self.final_output))
        {
            if target.author.trim().is_empty() {
                return Err(RegistryError::EmptyIdentifier { field: "author" });
            }
            if target.output_key.trim().is_empty() {
                return Err(RegistryError::EmptyIdentifier {
                    field: "output_key",
                });
            }
            if !seen.insert(target.output_key.as_str()) {
                return Err(RegistryError::DuplicateKey(target.output_key.clone()));
            }
        }
        Ok(())
    }
}
