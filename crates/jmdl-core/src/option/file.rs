//! Option files on disk (TOML, JSON, or YAML by extension).

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{JmOption, OptionContext};

/// Serialization format of an option file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFormat {
    Toml,
    Json,
    Yaml,
}

impl OptionFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(OptionFormat::Toml),
            Some("json") => Ok(OptionFormat::Json),
            Some("yml") | Some("yaml") => Ok(OptionFormat::Yaml),
            _ => bail!("unsupported option file extension: {}", path.display()),
        }
    }
}

/// Reads an option file into a tree.
pub fn unpack(path: &Path) -> Result<Value> {
    let format = OptionFormat::from_path(path)?;
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = match format {
        OptionFormat::Toml => toml::from_str(&data).with_context(|| format!("parse TOML {}", path.display()))?,
        OptionFormat::Json => serde_json::from_str(&data).with_context(|| format!("parse JSON {}", path.display()))?,
        OptionFormat::Yaml => serde_yaml::from_str(&data).with_context(|| format!("parse YAML {}", path.display()))?,
    };
    Ok(value)
}

/// Writes a tree to an option file, creating parent directories.
///
/// TOML has no null; null leaves are omitted and come back from the defaults
/// on the next read.
pub fn pack(value: &Value, path: &Path) -> Result<()> {
    let data = match OptionFormat::from_path(path)? {
        OptionFormat::Toml => toml::to_string_pretty(&strip_nulls(value))?,
        OptionFormat::Json => serde_json::to_string_pretty(value)?,
        OptionFormat::Yaml => serde_yaml::to_string(value)?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().filter(|v| !v.is_null()).map(strip_nulls).collect()),
        other => other.clone(),
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jmdl")?;
    Ok(xdg_dirs.place_config_file("option.toml")?)
}

/// Load the user's option file, creating a default file if none exists.
pub fn load_or_init(ctx: &Arc<OptionContext>) -> Result<JmOption> {
    let path = config_path()?;
    if !path.exists() {
        let option = JmOption::default_option(ctx)?;
        option.to_file(Some(&path))?;
        tracing::info!("created default option file at {}", path.display());
        return JmOption::from_file(&path, ctx);
    }

    JmOption::from_file(&path, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_by_extension() {
        assert_eq!(OptionFormat::from_path(Path::new("a.toml")).unwrap(), OptionFormat::Toml);
        assert_eq!(OptionFormat::from_path(Path::new("a.JSON")).unwrap(), OptionFormat::Json);
        assert_eq!(OptionFormat::from_path(Path::new("a.yml")).unwrap(), OptionFormat::Yaml);
        assert!(OptionFormat::from_path(Path::new("a.ini")).is_err());
        assert!(OptionFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn strip_nulls_recurses() {
        let v = json!({ "a": null, "b": { "c": null, "d": 1 }, "e": [1, null] });
        assert_eq!(strip_nulls(&v), json!({ "b": { "d": 1 }, "e": [1] }));
    }

    #[test]
    fn pack_unpack_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let tree = json!({
            "version": "2.0",
            "dir_rule": { "rule": "Bd_Aid", "base_dir": "/data" },
            "download": { "image": { "suffix": null, "decode": false } }
        });

        for name in ["o.json", "o.yml", "nested/o.toml"] {
            let path = dir.path().join(name);
            pack(&tree, &path).unwrap();
            let back = unpack(&path).unwrap();
            assert_eq!(back["dir_rule"]["rule"], "Bd_Aid");
            assert_eq!(back["download"]["image"]["decode"], false);
        }

        let toml_back = unpack(&dir.path().join("nested/o.toml")).unwrap();
        assert!(toml_back["download"]["image"].get("suffix").is_none());
    }
}
