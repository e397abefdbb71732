//! Single-slot "latest value" cell shared between a producer thread and the
//! render loop.
//!
//! Producers overwrite; readers take whatever was published last.  There is
//! no queue, so a slow reader simply skips intermediate values and a slow
//! producer leaves the reader looking at a stale one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Slot<T> {
    value:      Option<Arc<T>>,
    generation: u64,
}

/// Clonable handle to one shared slot.
pub struct Latest<T> {
    inner: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Latest { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Latest { inner: Arc::new(Mutex::new(Slot { value: None, generation: 0 })) }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored value.
    pub fn publish(&self, value: T) {
        let mut slot = self.lock();
        slot.value = Some(Arc::new(value));
        slot.generation += 1;
    }

    /// Most recently published value, `None` before the first publish.
    pub fn get(&self) -> Option<Arc<T>> {
        self.lock().value.clone()
    }

    /// Number of publishes so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    // A panicking producer must not take the render loop down with it.
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
