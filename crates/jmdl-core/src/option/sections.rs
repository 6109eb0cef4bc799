//! Typed option sections, deserialized from the merged option tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirRuleSection {
    pub rule: String,
    pub base_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadSection {
    /// Skip images whose target file already exists.
    pub cache: bool,
    pub image: ImageSection,
    pub threading: ThreadingSection,
    /// Keys this build does not interpret, kept for round trips.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSection {
    /// Descramble images before saving.
    pub decode: bool,
    /// Preferred saved suffix (e.g. `.png`); `None` keeps each image's own.
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadingSection {
    /// Images downloaded concurrently per batch.
    pub batch_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Fallback domains; empty means "discover".
    pub domain: Vec<String>,
    pub postman: PostmanSection,
    /// Backend key, `html` or `api`.
    #[serde(rename = "impl")]
    pub impl_key: String,
    pub retry_times: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanSection {
    /// Transport backend identifier understood by the postman factory.
    #[serde(rename = "type")]
    pub kind: String,
    pub meta_data: PostmanMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanMeta {
    /// Browser profile the transport should impersonate.
    pub impersonate: Option<String>,
    pub cookies: Option<BTreeMap<String, String>>,
    pub headers: BTreeMap<String, String>,
}
