//! Settings loading: TOML files, `[meta] base = "..."` overlay chains, and
//! flattening into dotted property keys.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GateError, Result};

use super::Settings;

/// Path consulted by [`load`] when neither an explicit path nor
/// [`CONFIG_PATH_VAR`] names one.
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.toml";

/// Environment variable naming the settings file to load.
pub const CONFIG_PATH_VAR: &str = "PORTCULLIS_CONFIG";

/// Reserved table for loader directives (`base`); never flattened into
/// properties.
const META_TABLE: &str = "meta";

/// Deep-merge two TOML values. Tables merge key-wise so an overlay file only
/// names what differs from its base; any other value type is replaced
/// wholesale by the overlay.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, overlay_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read one file, follow its `[meta] base` chain, and return the merged
/// value. `visited` holds canonicalized paths already on the chain so a
/// circular reference fails instead of recursing forever.
fn read_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(GateError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| GateError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay: toml::Value = toml::from_str(&raw)
        .map_err(|e| GateError::Config(format!("parse error in {}: {e}", path.display())))?;

    let base_ref = overlay
        .get(META_TABLE)
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
        .map(str::to_string);

    match base_ref {
        Some(base_str) => {
            let base_path = if Path::new(&base_str).is_absolute() {
                PathBuf::from(&base_str)
            } else {
                path.parent().unwrap_or(Path::new(".")).join(&base_str)
            };
            let base = read_merged(&base_path, visited)?;
            Ok(merge_values(base, overlay))
        }
        None => Ok(overlay),
    }
}

/// Flatten a TOML value into dotted string properties.
///
/// Tables recurse with `.`-joined keys, arrays recurse with their index as
/// the segment, and scalars are stringified the way an operator would write
/// them (`true`, `3`, `1.5`).
fn flatten(prefix: &str, value: &toml::Value, out: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                if prefix.is_empty() && key == META_TABLE {
                    continue;
                }
                let child_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&child_key, child, out);
            }
        }
        toml::Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(&format!("{prefix}.{index}"), item, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

pub(super) fn from_file(path: &Path) -> Result<Settings> {
    let merged = read_merged(path, &mut HashSet::new())?;
    let mut values = HashMap::new();
    flatten("", &merged, &mut values);
    debug!(path = %path.display(), properties = values.len(), "settings loaded");
    Ok(Settings {
        values,
        env: HashMap::new(),
    })
}

pub(super) fn from_toml_str(source: &str) -> Result<Settings> {
    let value: toml::Value =
        toml::from_str(source).map_err(|e| GateError::Config(format!("parse error: {e}")))?;
    let mut values = HashMap::new();
    flatten("", &value, &mut values);
    Ok(Settings {
        values,
        env: HashMap::new(),
    })
}

/// Load settings and capture environment overrides.
///
/// Path resolution order: the explicit `path`, then [`CONFIG_PATH_VAR`],
/// then [`DEFAULT_CONFIG_PATH`] when it exists. With none of those, the
/// store starts empty — which leaves every component enabled, consistent
/// with the opt-out model.
pub fn load(path: Option<&str>) -> Result<Settings> {
    let named = path
        .map(str::to_string)
        .or_else(|| env::var(CONFIG_PATH_VAR).ok());

    let settings = match named {
        Some(p) => from_file(&expand_home(&p))?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                from_file(default_path)?
            } else {
                Settings::new()
            }
        }
    };

    Ok(settings.with_env_overrides(env::vars()))
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    match (path, dirs::home_dir()) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        _ => PathBuf::from(path),
    }
}
