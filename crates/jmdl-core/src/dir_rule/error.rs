//! Path rule error types.

use std::fmt;

use super::compile::EntitySelector;
use crate::entity::FieldError;

/// A rule string that cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported dir rule token \"{token}\" in \"{rule}\"")]
pub struct UnsupportedRuleError {
    pub rule: String,
    /// Offending token; the whole rule when it has no `_` separator.
    pub token: String,
}

/// Why one segment of a compiled rule failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentFailure {
    /// The segment needs an album or photo that was not supplied.
    MissingEntity(EntitySelector),
    /// The entity has the field but no value for it.
    MissingField(String),
    /// The entity has no such field.
    UnknownField(String),
}

impl From<FieldError> for SegmentFailure {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::Missing(name) => SegmentFailure::MissingField(name),
            FieldError::Unknown(name) => SegmentFailure::UnknownField(name),
        }
    }
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentFailure::MissingEntity(selector) => write!(f, "no {} supplied", selector),
            SegmentFailure::MissingField(name) => write!(f, "field `{}` has no value", name),
            SegmentFailure::UnknownField(name) => write!(f, "no field named `{}`", name),
        }
    }
}

/// A compiled rule failed while resolving a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dir rule \"{rule}\" failed at segment {segment}: {cause} (entity: {entity})")]
pub struct RuleEvaluationError {
    pub rule: String,
    /// 1-based index of the failing segment.
    pub segment: usize,
    /// Description of the entity the segment was evaluated against.
    pub entity: String,
    pub cause: SegmentFailure,
}
