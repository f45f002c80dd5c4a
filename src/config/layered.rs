//! Layered configuration
//!
//! A [`LayeredConfig`] answers lookups from four sources consulted in a
//! fixed order: runtime overrides, process properties, environment
//! variables, then a properties file loaded once at construction. The first
//! source holding a key supplies its value.

use crate::config::resource::ResourceLocator;
use crate::config::source::{
    EnvironmentSource, ProcessPropertiesSource, PropertiesFileSource, RuntimeSource, Source,
    SourceKind,
};
use crate::error::{LayerconfError, Result};
use crate::utils::list::split_list;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A value together with the source that supplied it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    pub key: String,
    pub value: String,
    pub source: SourceKind,
}

/// String configuration resolved across prioritized sources
#[derive(Debug)]
pub struct LayeredConfig {
    runtime: RuntimeSource,
    process: ProcessPropertiesSource,
    environment: EnvironmentSource,
    file: PropertiesFileSource,
}

impl LayeredConfig {
    /// Build a configuration whose lowest layer is the properties file
    /// `file_resource_id`, located through [`ResourceLocator::from_env`].
    ///
    /// The file is read here and never again.
    pub fn new(file_resource_id: &str) -> Result<Self> {
        Self::builder().build(file_resource_id)
    }

    pub fn builder() -> LayeredConfigBuilder {
        LayeredConfigBuilder::default()
    }

    /// Resolution order:
    ///
    /// 1. Runtime properties
    /// 2. Process properties
    /// 3. Environment variables
    /// 4. Properties file
    pub fn sources(&self) -> [&dyn Source; 4] {
        [&self.runtime, &self.process, &self.environment, &self.file]
    }

    /// Look up `key`, returning `None` only when no source defines it
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.resolve(key).map(|resolved| resolved.value)
    }

    /// Look up `key`, falling back to `default` when no source defines it
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    /// Look up `key` and split its value on the list delimiter
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get_string(key).map(|value| split_list(&value))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sources().iter().any(|source| source.contains_key(key))
    }

    /// Look up `key` and report which source supplied the value
    pub fn resolve(&self, key: &str) -> Option<Resolved> {
        for source in self.sources() {
            if let Some(value) = source.lookup(key) {
                trace!("Resolved {} from {}", key, source.name());
                return Some(Resolved {
                    key: key.to_string(),
                    value,
                    source: source.kind(),
                });
            }
        }

        trace!("{} not defined in any source", key);
        None
    }

    /// Every definition of `key`, highest priority first. The first entry is
    /// the effective value; the rest are shadowed by it.
    pub fn explain(&self, key: &str) -> Vec<Resolved> {
        self.sources()
            .iter()
            .filter_map(|source| {
                source.lookup(key).map(|value| Resolved {
                    key: key.to_string(),
                    value,
                    source: source.kind(),
                })
            })
            .collect()
    }

    /// Set a runtime override. Runtime values shadow every other source.
    pub fn add_property<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        debug!("Setting runtime property: {}", key);
        self.runtime.set(key, value.into());
    }

    /// Drop a runtime override so lower sources show through again
    pub fn clear_property(&mut self, key: &str) -> Option<String> {
        let removed = self.runtime.remove(key);
        if removed.is_some() {
            debug!("Cleared runtime property: {}", key);
        }
        removed
    }

    pub fn runtime_properties(&self) -> &RuntimeSource {
        &self.runtime
    }

    /// Where the properties file snapshot was loaded from
    pub fn file_origin(&self) -> &str {
        self.file.origin()
    }
}

/// Configures the providers behind each layer; the layer order itself is fixed
#[derive(Debug, Clone, Default)]
pub struct LayeredConfigBuilder {
    locator: Option<ResourceLocator>,
    process: ProcessPropertiesSource,
    environment: EnvironmentSource,
}

impl LayeredConfigBuilder {
    pub fn locator(mut self, locator: ResourceLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn process_properties(mut self, process: ProcessPropertiesSource) -> Self {
        self.process = process;
        self
    }

    pub fn environment(mut self, environment: EnvironmentSource) -> Self {
        self.environment = environment;
        self
    }

    /// Locate and load `file_resource_id`, then assemble the layers
    pub fn build(self, file_resource_id: &str) -> Result<LayeredConfig> {
        let locator = self.locator.clone().unwrap_or_else(ResourceLocator::from_env);
        let path = locator.locate(file_resource_id)?;
        let file = PropertiesFileSource::load(&path).map_err(|e| match e {
            LayerconfError::ConfigInit { reason, .. } => {
                LayerconfError::config_init(file_resource_id, reason)
            }
        })?;

        Ok(self.assemble(file))
    }

    /// Assemble the layers over an in-memory properties document
    pub fn build_from_str(self, origin: &str, contents: &str) -> Result<LayeredConfig> {
        let file = PropertiesFileSource::parse(origin, contents.as_bytes())?;
        Ok(self.assemble(file))
    }

    fn assemble(self, file: PropertiesFileSource) -> LayeredConfig {
        LayeredConfig {
            runtime: RuntimeSource::new(),
            process: self.process,
            environment: self.environment,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InitFailure;
    use tempfile::TempDir;

    const PROPERTIES: &str = "\
shared.key=from file
file.only=file value
file.empty=
list.value=a, b\\\\, c
";

    fn isolated() -> LayeredConfig {
        LayeredConfig::builder()
            .process_properties(ProcessPropertiesSource::from_pairs([
                ("shared.key", "from process"),
                ("process.only", "process value"),
            ]))
            .environment(EnvironmentSource::from_pairs([
                ("shared.key", "from environment"),
                ("ENV_ONLY", "env value"),
                ("ENV_EMPTY", ""),
            ]))
            .build_from_str("inline.properties", PROPERTIES)
            .unwrap()
    }

    #[test]
    fn test_source_order_is_fixed() {
        let config = isolated();
        let kinds: Vec<_> = config.sources().iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::Runtime,
                SourceKind::ProcessProperties,
                SourceKind::Environment,
                SourceKind::PropertiesFile,
            ]
        );
    }

    #[test]
    fn test_single_source_values() {
        let config = isolated();
        assert_eq!(config.get_string("file.only"), Some("file value".to_string()));
        assert_eq!(config.get_string("ENV_ONLY"), Some("env value".to_string()));
        assert_eq!(
            config.get_string("process.only"),
            Some("process value".to_string())
        );
    }

    #[test]
    fn test_priority_across_sources() {
        let mut config = isolated();
        assert_eq!(
            config.get_string("shared.key"),
            Some("from process".to_string())
        );

        config.add_property("shared.key", "from runtime");
        assert_eq!(
            config.get_string("shared.key"),
            Some("from runtime".to_string())
        );
    }

    #[test]
    fn test_environment_beats_file() {
        let config = LayeredConfig::builder()
            .process_properties(ProcessPropertiesSource::from_pairs(Vec::<(String, String)>::new()))
            .environment(EnvironmentSource::from_pairs([("shared.key", "from environment")]))
            .build_from_str("inline.properties", PROPERTIES)
            .unwrap();

        assert_eq!(
            config.resolve("shared.key").map(|r| r.source),
            Some(SourceKind::Environment)
        );
    }

    #[test]
    fn test_missing_key_is_absent() {
        let config = isolated();
        assert_eq!(config.get_string("no.such.key"), None);
        assert!(!config.contains_key("no.such.key"));
        assert_eq!(config.resolve("no.such.key"), None);
        assert!(config.explain("no.such.key").is_empty());
    }

    #[test]
    fn test_empty_values_are_present() {
        let mut config = isolated();
        assert_eq!(config.get_string("file.empty"), Some(String::new()));
        assert_eq!(config.get_string("ENV_EMPTY"), Some(String::new()));
        assert!(config.contains_key("ENV_EMPTY"));

        config.add_property("file.only", "");
        assert_eq!(config.get_string("file.only"), Some(String::new()));
        assert_eq!(config.get_string_or("file.only", "fallback"), "");
    }

    #[test]
    fn test_add_property_overwrites() {
        let mut config = isolated();
        config.add_property("runtime.key", "first");
        config.add_property("runtime.key", "second");

        assert_eq!(config.get_string("runtime.key"), Some("second".to_string()));
        assert_eq!(config.runtime_properties().len(), 1);
    }

    #[test]
    fn test_clear_property_restores_lower_source() {
        let mut config = isolated();
        config.add_property("file.only", "override");
        assert_eq!(config.clear_property("file.only"), Some("override".to_string()));
        assert_eq!(config.get_string("file.only"), Some("file value".to_string()));
        assert_eq!(config.clear_property("file.only"), None);
    }

    #[test]
    fn test_get_string_or_default() {
        let config = isolated();
        assert_eq!(config.get_string_or("missing", "fallback"), "fallback");
        assert_eq!(config.get_string_or("file.only", "fallback"), "file value");
    }

    #[test]
    fn test_get_list() {
        let mut config = isolated();
        assert_eq!(
            config.get_list("list.value"),
            Some(vec!["a".to_string(), "b, c".to_string()])
        );
        assert_eq!(config.get_list("file.empty"), Some(Vec::new()));
        assert_eq!(config.get_list("missing"), None);

        config.add_property("runtime.list", "x,y");
        assert_eq!(config.get_string("runtime.list"), Some("x,y".to_string()));
        assert_eq!(
            config.get_list("runtime.list"),
            Some(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_explain_lists_shadowed_values() {
        let mut config = isolated();
        config.add_property("shared.key", "from runtime");

        let explained = config.explain("shared.key");
        let sources: Vec<_> = explained.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                SourceKind::Runtime,
                SourceKind::ProcessProperties,
                SourceKind::Environment,
                SourceKind::PropertiesFile,
            ]
        );
        assert_eq!(explained[0].value, "from runtime");
        assert_eq!(explained[3].value, "from file");
        assert_eq!(Some(explained[0].clone()), config.resolve("shared.key"));
    }

    #[test]
    fn test_build_locates_file_through_locator() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("app.properties"), "app.name=located\n").unwrap();

        let config = LayeredConfig::builder()
            .locator(ResourceLocator::new().with_root(root.path()))
            .environment(EnvironmentSource::from_pairs(Vec::<(String, String)>::new()))
            .build("/app.properties")
            .unwrap();

        assert_eq!(config.get_string("app.name"), Some("located".to_string()));
        assert_eq!(
            config.file_origin(),
            root.path().join("app.properties").display().to_string()
        );
    }

    #[test]
    fn test_build_missing_resource_fails() {
        let root = TempDir::new().unwrap();
        let result = LayeredConfig::builder()
            .locator(ResourceLocator::new().with_root(root.path()))
            .build("/missing.properties");

        match result {
            Err(LayerconfError::ConfigInit {
                resource,
                reason: InitFailure::NotFound { .. },
            }) => assert_eq!(resource, "/missing.properties"),
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
