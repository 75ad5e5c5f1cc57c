use derive_more::Deref;
use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

/// Opaque annotation payload. Shared so duplicated subtrees can carry the
/// same metadata without requiring `Clone` on the payload type.
pub type AnnotationValue = Arc<dyn Any + Send + Sync>;

///
/// Annotations
///
/// Node-local key/value side-table. Keys are ordered so listings are
/// deterministic; values are never inspected by the engine.
///

#[derive(Clone, Default, Deref)]
pub struct Annotations(BTreeMap<String, AnnotationValue>);

impl Annotations {
    /// Insert or overwrite `key`, returning the previous payload.
    pub(crate) fn insert(
        &mut self,
        key: impl Into<String>,
        value: AnnotationValue,
    ) -> Option<AnnotationValue> {
        self.0.insert(key.into(), value)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<AnnotationValue> {
        self.0.remove(key)
    }

    /// Borrow the payload at `key` as a concrete type.
    /// Returns `None` when the key is unset or holds another type.
    #[must_use]
    pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
        self.0.get(key).and_then(|value| value.downcast_ref::<T>())
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // payloads are opaque; only keys are printable
        f.debug_set().entries(self.0.keys()).finish()
    }
}
