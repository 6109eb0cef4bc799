//! Directory rules.
//!
//! A rule DSL string plus a base directory decides where a photo's images
//! are written. Examples:
//!
//! - `Bd_Aid_Pindex` → `<base>/<album id>/<photo index>/`
//! - `Bd_Aauthor_Atitle_Pindex` → `<base>/<author>/<album title>/<photo index>/`
//!
//! `Bd` is the base directory, `A<field>` an album field, `P<field>` a photo
//! field. Compiled rules are shared through a [`RuleCache`].

mod cache;
mod compile;
mod dsl;
mod error;

pub use cache::RuleCache;
pub use compile::{CompiledRule, EntitySelector, Resolver, Segment};
pub use dsl::{substitute_base_dir, WORKSPACE_TOKEN};
pub use error::{RuleEvaluationError, SegmentFailure, UnsupportedRuleError};

use std::path::Path;
use std::sync::Arc;

use crate::entity::{Album, Photo};

/// Sample rules accepted by the compiler.
pub const RULE_SAMPLES: &[&str] = &["Bd_Aid_Pindex", "Bd_Aauthor_Atitle_Pindex"];

/// A configured rule bound to its compiled form.
#[derive(Debug, Clone)]
pub struct DirRule {
    rule_dsl: String,
    /// `base_dir` as configured, placeholders intact.
    base_dir_dsl: String,
    base_dir: String,
    compiled: Arc<CompiledRule>,
}

impl DirRule {
    /// Substitutes placeholders in `base_dir`, then compiles through `cache`.
    pub fn new(
        rule_dsl: &str,
        base_dir: &str,
        workspace: &Path,
        cache: &RuleCache,
    ) -> Result<Self, UnsupportedRuleError> {
        let base_dir_dsl = base_dir.to_string();
        let base_dir = substitute_base_dir(base_dir, workspace);
        let compiled = cache.get_or_compile(rule_dsl, &base_dir)?;
        Ok(Self {
            rule_dsl: rule_dsl.to_string(),
            base_dir_dsl,
            base_dir,
            compiled,
        })
    }

    pub fn rule_dsl(&self) -> &str {
        &self.rule_dsl
    }

    pub fn base_dir_dsl(&self) -> &str {
        &self.base_dir_dsl
    }

    /// Base directory after placeholder substitution.
    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    pub fn compiled(&self) -> &CompiledRule {
        &self.compiled
    }

    /// Resolves the save directory for `photo` (and its album, when known).
    pub fn decide_image_save_dir(
        &self,
        album: Option<&Album>,
        photo: &Photo,
    ) -> Result<String, RuleEvaluationError> {
        self.compiled.resolve(album, Some(photo))
    }
}
