//! Configuration sources
//!
//! Every layer of a `LayeredConfig` is a [`Source`]: a named provider that
//! answers point lookups with a present value or nothing. Only the runtime
//! source can be written to.

use crate::error::{InitFailure, LayerconfError, Result};
use crate::system;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which layer a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Runtime,
    ProcessProperties,
    Environment,
    PropertiesFile,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::ProcessProperties => "process-properties",
            Self::Environment => "environment",
            Self::PropertiesFile => "properties-file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named provider of string lookups
pub trait Source: fmt::Debug + Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Value for `key`, or `None` when this source does not define it.
    /// An empty string is a present value.
    fn lookup(&self, key: &str) -> Option<String>;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }
}

/// Mutable in-memory overrides, always consulted first
#[derive(Debug, Clone, Default)]
pub struct RuntimeSource {
    values: HashMap<String, String>,
}

impl RuntimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, returning the previous one
    pub fn set(&mut self, key: String, value: String) -> Option<String> {
        self.values.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Source for RuntimeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Runtime
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Read-only view of process properties
#[derive(Debug, Clone, Default)]
pub enum ProcessPropertiesSource {
    /// Read through to the process-wide registry in [`crate::system`]
    #[default]
    Registry,
    /// A fixed set of properties, isolated from the registry
    Fixed(HashMap<String, String>),
}

impl ProcessPropertiesSource {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Source for ProcessPropertiesSource {
    fn kind(&self) -> SourceKind {
        SourceKind::ProcessProperties
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self {
            Self::Registry => system::property(key),
            Self::Fixed(values) => values.get(key).cloned(),
        }
    }
}

/// Read-only view of environment variables
#[derive(Debug, Clone, Default)]
pub enum EnvironmentSource {
    /// Read through to the operating system environment
    #[default]
    Os,
    /// A fixed set of variables, isolated from the real environment
    Fixed(HashMap<String, String>),
}

impl EnvironmentSource {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Source for EnvironmentSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Environment
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match self {
            Self::Os => match std::env::var(key) {
                Ok(value) => Some(value),
                Err(std::env::VarError::NotPresent) => None,
                Err(std::env::VarError::NotUnicode(_)) => {
                    warn!("Ignoring environment variable {} with non-unicode value", key);
                    None
                }
            },
            Self::Fixed(values) => values.get(key).cloned(),
        }
    }
}

/// Snapshot of a properties file taken at load time
#[derive(Debug, Clone)]
pub struct PropertiesFileSource {
    origin: String,
    values: HashMap<String, String>,
}

impl PropertiesFileSource {
    /// Read and parse the properties file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let file = std::fs::File::open(path)
            .map_err(|e| LayerconfError::config_init(origin.clone(), InitFailure::Io(e)))?;
        Self::parse(origin, file)
    }

    /// Parse properties from any reader; `origin` names where they came from
    pub fn parse<R: Read>(origin: impl Into<String>, reader: R) -> Result<Self> {
        let origin = origin.into();
        let values = java_properties::read(reader)
            .map_err(|e| LayerconfError::config_init(origin.clone(), InitFailure::Parse(e)))?;

        info!("Loaded {} properties from {}", values.len(), origin);

        Ok(Self { origin, values })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn origin_path(&self) -> PathBuf {
        PathBuf::from(&self.origin)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl Source for PropertiesFileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::PropertiesFile
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}
