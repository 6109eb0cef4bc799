//! Option trees: defaults, deep merge, and schema version checks.

use serde_json::{json, Map, Value};

use super::error::UnsupportedSchemaVersionError;
use crate::dir_rule::WORKSPACE_TOKEN;

/// Option schema version this build reads and writes.
pub const SUPPORTED_VERSION: &str = "2.0";

/// Headers every postman sends unless the option file overrides them.
pub fn default_headers() -> Map<String, Value> {
    let mut headers = Map::new();
    headers.insert(
        "accept".to_string(),
        json!("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert("accept-language".to_string(), json!("zh-CN,zh;q=0.9,en;q=0.8"));
    headers.insert("cache-control".to_string(), json!("no-cache"));
    headers.insert(
        "user-agent".to_string(),
        json!("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36"),
    );
    headers
}

/// The complete default option tree.
pub fn default_tree() -> Value {
    json!({
        "version": SUPPORTED_VERSION,
        "debug": true,
        "dir_rule": { "rule": "Bd_Ptitle", "base_dir": WORKSPACE_TOKEN },
        "download": {
            "cache": true,
            "image": { "decode": true, "suffix": null },
            "threading": { "batch_count": 30 }
        },
        "client": {
            "domain": [],
            "postman": {
                "type": "cffi",
                "meta_data": {
                    "impersonate": "chrome110",
                    "cookies": null,
                    "headers": Value::Object(default_headers())
                }
            },
            "impl": "html",
            "retry_times": 5
        }
    })
}

/// Deep-merges `user` over `defaults`.
///
/// Maps merge key by key; any other user value (lists included) replaces the
/// default outright.
pub fn merge(user: &Value, defaults: &Value) -> Value {
    match (user, defaults) {
        (Value::Object(user_map), Value::Object(default_map)) => {
            let mut merged = default_map.clone();
            for (key, user_value) in user_map {
                let value = match default_map.get(key) {
                    Some(default_value) if user_value.is_object() && default_value.is_object() => {
                        merge(user_value, default_value)
                    }
                    _ => user_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        _ => user.clone(),
    }
}

/// Fails unless `version` equals [`SUPPORTED_VERSION`] numerically.
pub fn check_version(version: Option<&Value>) -> Result<(), UnsupportedSchemaVersionError> {
    let parsed = match version {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    let supported: f64 = SUPPORTED_VERSION.parse().unwrap_or_default();

    match parsed {
        Some(v) if v == supported => Ok(()),
        _ => Err(UnsupportedSchemaVersionError {
            found: version.map_or_else(|| "<missing>".to_string(), |v| v.to_string()),
            supported: SUPPORTED_VERSION,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_leaf_overrides_only_that_leaf() {
        let merged = merge(&json!({ "download": { "cache": false } }), &default_tree());
        assert_eq!(merged["download"]["cache"], false);
        assert_eq!(merged["download"]["image"]["decode"], true);
        assert_eq!(merged["download"]["threading"]["batch_count"], 30);
        assert_eq!(merged["client"]["impl"], "html");
    }

    #[test]
    fn lists_replace_rather_than_concatenate() {
        let defaults = json!({ "domain": ["a.example", "b.example"] });
        let merged = merge(&json!({ "domain": ["c.example"] }), &defaults);
        assert_eq!(merged["domain"], json!(["c.example"]));
    }

    #[test]
    fn scalar_replaces_map_and_map_replaces_scalar() {
        let defaults = json!({ "a": { "b": 1 }, "c": 2 });
        let merged = merge(&json!({ "a": 5, "c": { "d": 3 } }), &defaults);
        assert_eq!(merged, json!({ "a": 5, "c": { "d": 3 } }));
    }

    #[test]
    fn merge_leaves_inputs_untouched() {
        let defaults = default_tree();
        let before = defaults.clone();
        let _ = merge(&json!({ "client": { "retry_times": 1 } }), &defaults);
        assert_eq!(defaults, before);
    }

    #[test]
    fn new_user_keys_are_added() {
        let merged = merge(&json!({ "download": { "extra_flag": 1 } }), &default_tree());
        assert_eq!(merged["download"]["extra_flag"], 1);
        assert_eq!(merged["download"]["cache"], true);
    }

    #[test]
    fn version_compares_numerically() {
        assert!(check_version(Some(&json!("2.0"))).is_ok());
        assert!(check_version(Some(&json!("2"))).is_ok());
        assert!(check_version(Some(&json!(2.0))).is_ok());
        assert!(check_version(Some(&json!(2))).is_ok());

        let err = check_version(Some(&json!("1.0"))).unwrap_err();
        assert_eq!(err.found, "\"1.0\"");
        assert!(check_version(Some(&json!("two"))).is_err());
        assert!(check_version(None).is_err());
    }
}
