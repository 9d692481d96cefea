//! Upgrades of the YAML configuration file written by older releases.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::Path;

/// Keys added after the first release, with the value written when absent.
fn added_keys() -> Vec<(&'static str, Value, &'static str)> {
    vec![
        (
            "remote_url",
            Value::String(String::new()),
            "  # base URL of the hosted table service; empty disables sync\n",
        ),
        ("remote_api_key", Value::String(String::new()), ""),
        (
            "remote_timeout_secs",
            Value::Number(super::default_remote_timeout().into()),
            "",
        ),
        (
            "week_start",
            Value::String("sunday".into()),
            "  # week_start options: sunday | monday\n",
        ),
    ]
}

/// Names of the known keys missing from `map`.
pub fn missing_keys(map: &Mapping) -> Vec<&'static str> {
    added_keys()
        .into_iter()
        .filter(|(k, _, _)| !map.contains_key(Value::String(k.to_string())))
        .map(|(k, _, _)| k)
        .collect()
}

/// Add every missing key to the config file at `path`, keeping existing
/// values. Returns the keys that were added (empty: nothing to do).
pub fn fill_missing_keys(path: &Path) -> io::Result<Vec<&'static str>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let mut yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| io::Error::other(format!("invalid YAML in {:?}: {}", path, e)))?;
    let Some(map) = yaml.as_mapping_mut() else {
        return Err(io::Error::other(format!("{:?} is not a YAML mapping", path)));
    };

    let missing = missing_keys(map);
    if missing.is_empty() {
        return Ok(missing);
    }

    let keys = added_keys();
    for (key, default, _) in &keys {
        if missing.contains(key) {
            map.insert(Value::String(key.to_string()), default.clone());
        }
    }

    let serialized = serde_yaml::to_string(&yaml)
        .map_err(|e| io::Error::other(format!("serialize error: {}", e)))?;

    // Re-attach the option comments after each added key
    let mut new_content = String::new();
    for line in serialized.lines() {
        new_content.push_str(line);
        new_content.push('\n');

        for (key, _, comment) in &keys {
            if !comment.is_empty() && missing.contains(key) && line.starts_with(&format!("{key}:")) {
                new_content.push_str(comment);
            }
        }
    }

    fs::write(path, new_content)?;
    Ok(missing)
}
