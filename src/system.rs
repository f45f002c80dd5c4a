//! Process-wide property registry
//!
//! Properties set here are visible to every `LayeredConfig` through its
//! process-properties source. The registry is seeded with a handful of
//! platform defaults the first time it is touched, and hosts can feed it
//! `-Dkey=value` arguments at startup with [`load_args`].

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

const ARG_PREFIX: &str = "-D";

static REGISTRY: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, String>> {
    REGISTRY.get_or_init(|| RwLock::new(platform_defaults()))
}

fn read() -> RwLockReadGuard<'static, HashMap<String, String>> {
    registry().read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, HashMap<String, String>> {
    registry().write().unwrap_or_else(PoisonError::into_inner)
}

fn platform_defaults() -> HashMap<String, String> {
    let mut defaults = HashMap::new();
    defaults.insert("os.name".to_string(), std::env::consts::OS.to_string());
    defaults.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
    defaults.insert("os.family".to_string(), std::env::consts::FAMILY.to_string());
    defaults.insert(
        "file.separator".to_string(),
        std::path::MAIN_SEPARATOR.to_string(),
    );
    defaults.insert(
        "path.separator".to_string(),
        (if cfg!(windows) { ";" } else { ":" }).to_string(),
    );
    defaults.insert(
        "line.separator".to_string(),
        (if cfg!(windows) { "\r\n" } else { "\n" }).to_string(),
    );
    if let Ok(dir) = std::env::current_dir() {
        defaults.insert("user.dir".to_string(), dir.display().to_string());
    }
    if let Some(home) = dirs::home_dir() {
        defaults.insert("user.home".to_string(), home.display().to_string());
    }
    defaults
}

/// Set a process property, returning the previous value
pub fn set_property<K: Into<String>, V: Into<String>>(key: K, value: V) -> Option<String> {
    let key = key.into();
    debug!("Setting process property: {}", key);
    write().insert(key, value.into())
}

/// Look up a process property
pub fn property(key: &str) -> Option<String> {
    read().get(key).cloned()
}

/// Remove a process property, returning the removed value
pub fn clear_property(key: &str) -> Option<String> {
    write().remove(key)
}

/// Snapshot of every process property currently set
pub fn properties() -> HashMap<String, String> {
    read().clone()
}

/// Parse a single `-Dkey=value` token.
///
/// A bare `-Dkey` maps to the empty string. Anything else, including `-D`
/// with no key, yields `None`.
pub fn parse_arg(arg: &str) -> Option<(&str, &str)> {
    let definition = arg.strip_prefix(ARG_PREFIX)?;
    let (key, value) = definition.split_once('=').unwrap_or((definition, ""));
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Load `-Dkey=value` definitions from process arguments.
///
/// Arguments that are not property definitions are skipped. Returns how many
/// properties were set.
pub fn load_args<I, S>(args: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut loaded = 0;
    let mut registry = write();
    for arg in args {
        if let Some((key, value)) = parse_arg(arg.as_ref()) {
            registry.insert(key.to_string(), value.to_string());
            loaded += 1;
        }
    }
    debug!("Loaded {} process properties from arguments", loaded);
    loaded
}
