//! Resource location
//!
//! Resources are addressed the way classpath resources are: by an identifier
//! such as `/app.properties` that is resolved against an ordered list of
//! search roots. The first root holding a regular file with that relative
//! path wins.

use crate::error::{LayerconfError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Environment variable holding extra resource roots, in platform path-list syntax
pub const RESOURCE_PATH_ENV: &str = "LAYERCONF_RESOURCE_PATH";

/// Ordered set of directories searched for resources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLocator {
    roots: Vec<PathBuf>,
}

impl ResourceLocator {
    /// Locator with no roots; add them with [`ResourceLocator::with_root`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator over `LAYERCONF_RESOURCE_PATH`, the working directory and the
    /// directory of the running executable, in that order
    pub fn from_env() -> Self {
        let mut locator = Self::new();

        if let Some(paths) = std::env::var_os(RESOURCE_PATH_ENV) {
            for root in std::env::split_paths(&paths) {
                if !root.as_os_str().is_empty() {
                    locator.push_root(root);
                }
            }
        }

        if let Ok(dir) = std::env::current_dir() {
            locator.push_root(dir);
        }

        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            locator.push_root(dir);
        }

        locator
    }

    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.push_root(root);
        self
    }

    /// Append a root; roots already present are not added twice
    pub fn push_root<P: Into<PathBuf>>(&mut self, root: P) {
        let root = root.into();
        if !self.roots.contains(&root) {
            self.roots.push(root);
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve `resource_id` to an existing file
    pub fn locate(&self, resource_id: &str) -> Result<PathBuf> {
        let relative = match relative_resource_path(resource_id) {
            Some(relative) => relative,
            None => {
                debug!("Rejecting resource identifier: {}", resource_id);
                return Err(LayerconfError::not_found(
                    resource_id.to_string(),
                    self.searched(),
                ));
            }
        };

        for root in &self.roots {
            let candidate = root.join(&relative);
            if candidate.is_file() {
                debug!("Resolved resource {} to {}", resource_id, candidate.display());
                return Ok(candidate);
            }
        }

        debug!("Resource {} not found under {} roots", resource_id, self.roots.len());
        Err(LayerconfError::not_found(
            resource_id.to_string(),
            self.searched(),
        ))
    }

    fn searched(&self) -> String {
        if self.roots.is_empty() {
            return "no resource roots".to_string();
        }

        self.roots
            .iter()
            .map(|root| root.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Turn an identifier into a path relative to a resource root.
///
/// Leading separators are dropped, `.` segments ignored; parent segments or
/// an empty remainder make the identifier unresolvable.
fn relative_resource_path(resource_id: &str) -> Option<PathBuf> {
    let trimmed = resource_id.trim_start_matches(['/', '\\']);
    let mut relative = PathBuf::new();

    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}
