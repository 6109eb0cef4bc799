//! Transport capabilities supplied by the embedding application.
//!
//! The client depends only on these traits; HTTP stacks, impersonation, and
//! retry/backoff live behind them.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::option::PostmanSection;
use crate::response::RawResponse;

/// A single GET-style request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostmanRequest {
    pub url: String,
    /// Per-request headers layered over the postman's configured ones.
    pub headers: BTreeMap<String, String>,
}

impl PostmanRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Sends requests and returns raw responses.
pub trait Postman: Send + Sync {
    fn send(&self, request: &PostmanRequest) -> anyhow::Result<RawResponse>;
}

/// Builds postmen from the option file's `client.postman` section.
pub trait PostmanFactory: Send + Sync {
    fn create(&self, config: &PostmanSection) -> anyhow::Result<Arc<dyn Postman>>;
}

/// Lists every domain the catalog is currently served from.
///
/// The last entry is reserved and never used as a fallback domain.
pub trait DomainDiscovery: Send + Sync {
    fn all_known_domains(&self, postman: &dyn Postman) -> anyhow::Result<Vec<String>>;
}

/// Capabilities needed to build a [`super::JmClient`].
#[derive(Clone)]
pub struct ClientEnv {
    pub postmans: Arc<dyn PostmanFactory>,
    pub domains: Arc<dyn DomainDiscovery>,
}

impl ClientEnv {
    pub fn new(postmans: Arc<dyn PostmanFactory>, domains: Arc<dyn DomainDiscovery>) -> Self {
        Self { postmans, domains }
    }
}
