//! Compiled rule cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::compile::CompiledRule;
use super::error::UnsupportedRuleError;

/// Compiled rules keyed by `(rule, substituted base_dir)`.
///
/// Entries are never evicted. Concurrent compilation of one key may race;
/// rules are pure functions of their key, so the last insert wins harmlessly.
#[derive(Debug, Default)]
pub struct RuleCache {
    entries: RwLock<HashMap<(String, String), Arc<CompiledRule>>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rule for the key, compiling it on first use.
    pub fn get_or_compile(&self, rule: &str, base_dir: &str) -> Result<Arc<CompiledRule>, UnsupportedRuleError> {
        let key = (rule.to_string(), base_dir.to_string());
        if let Some(compiled) = self.entries.read().get(&key) {
            return Ok(Arc::clone(compiled));
        }

        let compiled = Arc::new(CompiledRule::compile(rule, base_dir)?);
        tracing::debug!(rule, base_dir, "compiled dir rule");
        self.entries.write().insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_reuses_compiled_rule() {
        let cache = RuleCache::new();
        let a = cache.get_or_compile("Bd_Aid", "/root").unwrap();
        let b = cache.get_or_compile("Bd_Aid", "/root").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn base_dir_is_part_of_key() {
        let cache = RuleCache::new();
        let a = cache.get_or_compile("Bd_Aid", "/root").unwrap();
        let b = cache.get_or_compile("Bd_Aid", "/other").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = RuleCache::new();
        assert!(cache.get_or_compile("Zx_Aid", "/root").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_compilation_settles_on_one_entry() {
        let cache = RuleCache::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| cache.get_or_compile("Bd_Pindex", "/root").unwrap());
            }
        });
        assert_eq!(cache.len(), 1);
    }
}
