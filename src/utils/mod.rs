//! Utility modules for layerconf

pub mod list;

pub use list::*;
