//! Rule compilation and evaluation.
//!
//! A rule such as `Bd_Aauthor_Ptitle` compiles into one [`Segment`] per
//! underscore-separated token.

use std::fmt;

use super::error::{RuleEvaluationError, SegmentFailure, UnsupportedRuleError};
use crate::entity::{Album, FieldSource, Photo};
use crate::naming::{normalize_dir, sanitize_dir_name};

const SEPARATOR: char = '_';
const BASE_DIR_TOKEN: &str = "Bd";

/// Which entity a segment reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySelector {
    None,
    Album,
    Photo,
}

impl fmt::Display for EntitySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntitySelector::None => "none",
            EntitySelector::Album => "album",
            EntitySelector::Photo => "photo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolver {
    /// Literal base directory (already DSL-substituted).
    BaseDir(String),
    /// Named entity field, sanitized for the filesystem.
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub selector: EntitySelector,
    pub resolver: Resolver,
}

impl Segment {
    fn resolve(&self, entity: Option<&dyn FieldSource>) -> Result<String, SegmentFailure> {
        match &self.resolver {
            Resolver::BaseDir(dir) => Ok(dir.clone()),
            Resolver::Field(name) => {
                let entity = entity.ok_or(SegmentFailure::MissingEntity(self.selector))?;
                Ok(sanitize_dir_name(&entity.field(name)?))
            }
        }
    }
}

/// An immutable, compiled path rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    rule: String,
    segments: Vec<Segment>,
}

impl CompiledRule {
    /// Compiles `rule` against an already-substituted `base_dir`.
    pub fn compile(rule: &str, base_dir: &str) -> Result<Self, UnsupportedRuleError> {
        if !rule.contains(SEPARATOR) {
            return Err(UnsupportedRuleError {
                rule: rule.to_string(),
                token: rule.to_string(),
            });
        }

        let segments = rule
            .split(SEPARATOR)
            .map(|token| compile_token(token, rule, base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rule: rule.to_string(),
            segments,
        })
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Evaluates every segment in order and joins them as a directory path.
    pub fn resolve(
        &self,
        album: Option<&Album>,
        photo: Option<&Photo>,
    ) -> Result<String, RuleEvaluationError> {
        let mut parts = Vec::with_capacity(self.segments.len());

        for (i, segment) in self.segments.iter().enumerate() {
            let entity: Option<&dyn FieldSource> = match segment.selector {
                EntitySelector::None => None,
                EntitySelector::Album => album.map(|a| a as &dyn FieldSource),
                EntitySelector::Photo => photo.map(|p| p as &dyn FieldSource),
            };

            let part = segment
                .resolve(entity)
                .map_err(|cause| RuleEvaluationError {
                    rule: self.rule.clone(),
                    segment: i + 1,
                    entity: entity.map_or_else(|| "none".to_string(), |e| e.describe()),
                    cause,
                })?;
            parts.push(part);
        }

        Ok(normalize_dir(&parts.join("/")))
    }
}

fn compile_token(token: &str, rule: &str, base_dir: &str) -> Result<Segment, UnsupportedRuleError> {
    if token == BASE_DIR_TOKEN {
        return Ok(Segment {
            selector: EntitySelector::None,
            resolver: Resolver::BaseDir(base_dir.to_string()),
        });
    }

    let selector = match token.chars().next() {
        Some('A') => EntitySelector::Album,
        Some('P') => EntitySelector::Photo,
        _ => {
            return Err(UnsupportedRuleError {
                rule: rule.to_string(),
                token: token.to_string(),
            })
        }
    };

    Ok(Segment {
        selector,
        resolver: Resolver::Field(token[1..].to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album(id: &str) -> Album {
        Album::new(id, "Album Title")
    }

    fn photo(index: u32) -> Photo {
        Photo::new("9001", "Chapter: One?", index)
    }

    #[test]
    fn base_album_photo_rule() {
        let rule = CompiledRule::compile("Bd_Aid_Pindex", "/root").unwrap();
        let path = rule.resolve(Some(&album("5")), Some(&photo(3))).unwrap();
        assert_eq!(path, "/root/5/3/");
    }

    #[test]
    fn segments_record_selectors() {
        let rule = CompiledRule::compile("Bd_Atitle_Pid", "/data").unwrap();
        let selectors: Vec<_> = rule.segments().iter().map(|s| s.selector).collect();
        assert_eq!(
            selectors,
            [EntitySelector::None, EntitySelector::Album, EntitySelector::Photo]
        );
    }

    #[test]
    fn field_values_are_sanitized() {
        let rule = CompiledRule::compile("Bd_Ptitle", "/data").unwrap();
        let path = rule.resolve(None, Some(&photo(1))).unwrap();
        assert_eq!(path, "/data/Chapter_ One_/");
    }

    #[test]
    fn rule_without_separator_is_rejected() {
        let err = CompiledRule::compile("Bd", "/root").unwrap_err();
        assert_eq!(err.token, "Bd");
        assert_eq!(err.rule, "Bd");
    }

    #[test]
    fn unknown_prefix_is_rejected_with_token_and_rule() {
        let err = CompiledRule::compile("Zx_Aid", "/root").unwrap_err();
        assert_eq!(err.token, "Zx");
        let msg = err.to_string();
        assert!(msg.contains("\"Zx\""));
        assert!(msg.contains("\"Zx_Aid\""));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = CompiledRule::compile("Bd__Aid", "/root").unwrap_err();
        assert_eq!(err.token, "");
    }

    #[test]
    fn evaluation_errors_name_segment_and_cause() {
        let rule = CompiledRule::compile("Bd_Aauthor_Pindex", "/root").unwrap();
        let err = rule.resolve(Some(&album("5")), Some(&photo(1))).unwrap_err();
        assert_eq!(err.segment, 2);
        assert_eq!(err.entity, "album 5");
        assert_eq!(err.cause, SegmentFailure::MissingField("author".to_string()));

        let rule = CompiledRule::compile("Bd_Pnope", "/root").unwrap();
        let err = rule.resolve(None, Some(&photo(1))).unwrap_err();
        assert_eq!(err.cause, SegmentFailure::UnknownField("nope".to_string()));
        assert!(err.to_string().contains("Bd_Pnope"));
    }

    #[test]
    fn missing_entity_is_reported() {
        let rule = CompiledRule::compile("Bd_Aid", "/root").unwrap();
        let err = rule.resolve(None, Some(&photo(1))).unwrap_err();
        assert_eq!(err.cause, SegmentFailure::MissingEntity(EntitySelector::Album));
        assert_eq!(err.entity, "none");
    }
}
