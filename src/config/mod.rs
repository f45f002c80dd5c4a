//! Configuration management module
//!
//! This module resolves string settings from several sources in a fixed
//! priority order: runtime overrides, process properties, environment
//! variables and a properties file.

pub mod layered;
pub mod resource;
pub mod source;

pub use layered::*;
pub use resource::*;
pub use source::*;
