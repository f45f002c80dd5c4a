//! layerconf - Layered String Configuration
//!
//! Resolves flat string settings from runtime overrides, process properties,
//! environment variables and a bundled properties file, in that priority
//! order, behind a single lookup API.

pub mod config;
pub mod error;
pub mod system;
pub mod utils;

// Re-export commonly used types
pub use config::{
    EnvironmentSource, LayeredConfig, LayeredConfigBuilder, ProcessPropertiesSource,
    PropertiesFileSource, Resolved, ResourceLocator, RuntimeSource, Source, SourceKind,
};
pub use error::{InitFailure, LayerconfError, Result};
