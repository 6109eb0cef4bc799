//! Option construction and path-decision errors.

use std::io;

use crate::client::UnknownClientImpl;
use crate::dir_rule::{RuleEvaluationError, UnsupportedRuleError};

/// The option document declares a schema version this build does not read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported option version {found} (supported: {supported})")]
pub struct UnsupportedSchemaVersionError {
    pub found: String,
    pub supported: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum OptionError {
    #[error(transparent)]
    UnsupportedVersion(#[from] UnsupportedSchemaVersionError),
    #[error("option document must be a map")]
    NotAMap,
    #[error("unknown option section `{0}`")]
    UnknownSection(String),
    #[error("option section `{section}` is invalid: {source}")]
    InvalidSection {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    UnsupportedRule(#[from] UnsupportedRuleError),
    #[error(transparent)]
    RuleEvaluation(#[from] RuleEvaluationError),
    #[error(transparent)]
    UnknownClientImpl(#[from] UnknownClientImpl),
    #[error("photo {photo_id} has no image at index {index}")]
    ImageIndexOutOfRange { photo_id: String, index: usize },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("transport setup failed: {0:#}")]
    Transport(anyhow::Error),
}
