//! Override hooks for path decisions.
//!
//! Hooks registered for an option are consulted in registration order before
//! the option's dir rule applies; the first non-empty answer wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::{Image, Photo};
use crate::option::JmOption;

/// Identity of one constructed [`JmOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId(u64);

impl OptionId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        OptionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A hook that may preempt any of the option's path decisions.
///
/// Every method defaults to "no opinion".
pub trait OptionAdvice: Send + Sync {
    /// Directory (with trailing separator) for a photo's images.
    fn decide_image_save_dir(&self, _option: &JmOption, _photo: &Photo) -> Option<String> {
        None
    }

    /// Full file path for the photo's image at `index` (0-based).
    fn decide_image_filepath(&self, _option: &JmOption, _photo: &Photo, _index: usize) -> Option<String> {
        None
    }

    /// Saved suffix (with dot) for an image.
    fn decide_image_suffix(&self, _option: &JmOption, _image: &Image) -> Option<String> {
        None
    }
}

/// Hooks per option identity. Registration is append-only per key.
///
/// Keys live until [`AdviceRegistry::unregister`] is called.
#[derive(Default)]
pub struct AdviceRegistry {
    entries: RwLock<HashMap<OptionId, Vec<Arc<dyn OptionAdvice>>>>,
}

impl AdviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `hooks` to the list for `id`, creating it if absent.
    pub fn register<I>(&self, id: OptionId, hooks: I)
    where
        I: IntoIterator<Item = Arc<dyn OptionAdvice>>,
    {
        let mut entries = self.entries.write();
        let list = entries.entry(id).or_default();
        let before = list.len();
        list.extend(hooks);
        tracing::debug!(option = id.0, added = list.len() - before, "registered option advice");
    }

    /// Current hooks for `id`, in priority order.
    ///
    /// Returns a snapshot: the hook objects are shared, but hooks registered
    /// after this call do not appear in the returned list.
    pub fn advice_for(&self, id: OptionId) -> Vec<Arc<dyn OptionAdvice>> {
        self.entries.read().get(&id).cloned().unwrap_or_default()
    }

    /// Drops every hook registered for `id`.
    pub fn unregister(&self, id: OptionId) {
        self.entries.write().remove(&id);
    }

    /// First non-empty answer from the hooks for `id`.
    pub(crate) fn first_opinion<F>(&self, id: OptionId, mut ask: F) -> Option<String>
    where
        F: FnMut(&dyn OptionAdvice) -> Option<String>,
    {
        self.advice_for(id)
            .iter()
            .find_map(|hook| ask(hook.as_ref()).filter(|answer| !answer.is_empty()))
    }
}

impl std::fmt::Debug for AdviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdviceRegistry")
            .field("options", &self.entries.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl OptionAdvice for Fixed {
        fn decide_image_suffix(&self, _option: &JmOption, _image: &Image) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(OptionId::next(), OptionId::next());
    }

    #[test]
    fn registration_appends_per_key() {
        let registry = AdviceRegistry::new();
        let id = OptionId::next();
        registry.register(id, [Arc::new(Fixed(None)) as Arc<dyn OptionAdvice>]);
        registry.register(
            id,
            [
                Arc::new(Fixed(Some(""))) as Arc<dyn OptionAdvice>,
                Arc::new(Fixed(Some(".png"))) as Arc<dyn OptionAdvice>,
                Arc::new(Fixed(Some(".jpg"))) as Arc<dyn OptionAdvice>,
            ],
        );
        assert_eq!(registry.advice_for(id).len(), 4);

        let other = OptionId::next();
        registry.register(other, Vec::new());
        assert!(registry.advice_for(other).is_empty());
    }

    #[test]
    fn lookup_is_a_snapshot_of_the_list() {
        let registry = AdviceRegistry::new();
        let id = OptionId::next();
        let hook = Arc::new(Fixed(Some(".png"))) as Arc<dyn OptionAdvice>;
        registry.register(id, [Arc::clone(&hook)]);

        let before = registry.advice_for(id);
        registry.register(id, [Arc::new(Fixed(None)) as Arc<dyn OptionAdvice>]);
        assert_eq!(before.len(), 1);
        assert!(Arc::ptr_eq(&before[0], &hook));
        assert_eq!(registry.advice_for(id).len(), 2);
    }

    #[test]
    fn unknown_and_unregistered_ids_have_no_hooks() {
        let registry = AdviceRegistry::new();
        let id = OptionId::next();
        assert!(registry.advice_for(id).is_empty());
        registry.register(id, [Arc::new(Fixed(Some(".png"))) as Arc<dyn OptionAdvice>]);
        registry.unregister(id);
        assert!(registry.advice_for(id).is_empty());
    }
}
