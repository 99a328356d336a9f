//! Configuration source — flat, dotted-key string properties.
//!
//! TOML files are flattened into `gateway.random.enabled`-style keys so the
//! enablement condition can stay a plain key-value lookup. Loading follows
//! the same conventions as the rest of the stack: `[meta] base = "..."`
//! overlay chains, environment-variable overrides, `~` expansion.
//!
//! # Module layout
//!
//! - **mod** — the [`Settings`] store and its [`PropertyResolver`] impl.
//! - **load** — file loading: base-chain merging, flattening, path
//!   resolution.

mod load;

pub use load::{CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH, expand_home, load};

use std::collections::HashMap;
use std::path::Path;

use crate::enablement::PropertyResolver;
use crate::error::Result;

/// Environment variables with this prefix participate in overrides; anything
/// else in the process environment is ignored.
pub const ENV_OVERRIDE_PREFIX: &str = "GATEWAY_";

/// Override-variable name for a property key: upper-cased, with `.` and `-`
/// collapsed to `_` (`gateway.my-filter.enabled` → `GATEWAY_MY_FILTER_ENABLED`).
pub fn env_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Immutable-after-load store of string properties.
///
/// Lookups consult the captured environment overrides first, then the file
/// values. The environment is captured as a snapshot at load time so
/// repeated lookups stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
    env: HashMap<String, String>,
}

impl Settings {
    /// An empty store: every lookup misses, every component stays enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from literal key-value pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            env: HashMap::new(),
        }
    }

    /// Load and flatten a TOML file, following its `[meta] base` chain.
    pub fn from_file(path: &Path) -> Result<Self> {
        load::from_file(path)
    }

    /// Flatten TOML source text without touching the filesystem.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        load::from_toml_str(source)
    }

    /// Capture environment overrides from an iterator of `(name, value)`
    /// pairs. Only names under [`ENV_OVERRIDE_PREFIX`] are kept.
    ///
    /// Tests pass their own pairs instead of mutating the process
    /// environment; [`load`] passes `std::env::vars()`.
    pub fn with_env_overrides<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env = vars
            .into_iter()
            .filter(|(name, _)| name.starts_with(ENV_OVERRIDE_PREFIX))
            .collect();
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value for `key`: an environment override wins over the file value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.env
            .get(&env_key(key))
            .or_else(|| self.values.get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyResolver for Settings {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}
