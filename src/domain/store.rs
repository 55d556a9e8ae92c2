use crate::error::ProcessingError;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A record kept in a [`MemoryStore`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in log lines and not-found messages.
    const NAME: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);
}

/// Concurrent in-memory repository with a monotonically increasing id
/// sequence starting at 1.
pub struct MemoryStore<T: Entity> {
    records: DashMap<u64, T>,
    sequence: AtomicU64,
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }
}

impl<T: Entity> fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entity", &T::NAME)
            .field("len", &self.records.len())
            .finish()
    }
}

impl<T: Entity> MemoryStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id and store the entity. Any id already set is
    /// overwritten.
    pub fn save(&self, mut entity: T) -> T {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        entity.set_id(id);
        self.records.insert(id, entity.clone());
        debug!(entity = T::NAME, id, "Entity saved");
        entity
    }

    pub fn find_by_id(&self, id: u64) -> Result<T, ProcessingError> {
        self.records
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or_else(|| ProcessingError::NotFound(format!("{} {id} not found", T::NAME)))
    }

    /// All entities ordered by id.
    #[must_use]
    pub fn find_all(&self) -> Vec<T> {
        let mut all: Vec<T> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(T::id);
        all
    }

    /// Replace the stored entity with `id`, keeping that id.
    pub fn update(&self, id: u64, mut entity: T) -> Result<T, ProcessingError> {
        let mut slot = self
            .records
            .get_mut(&id)
            .ok_or_else(|| ProcessingError::NotFound(format!("{} {id} not found", T::NAME)))?;
        entity.set_id(id);
        *slot = entity.clone();
        debug!(entity = T::NAME, id, "Entity updated");
        Ok(entity)
    }

    /// Remove every entity. The id sequence keeps counting.
    pub fn clear(&self) {
        self.records.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u64,
        text: String,
    }

    impl Entity for Note {
        const NAME: &'static str = "note";

        fn id(&self) -> u64 {
            self.id
        }

        fn set_id(&mut self, id: u64) {
            self.id = id;
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: 0,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let store = MemoryStore::new();
        assert_eq!(store.save(note("a")).id, 1);
        assert_eq!(store.save(note("b")).id, 2);
        assert_eq!(store.find_by_id(2).unwrap().text, "b");
    }

    #[test]
    fn test_find_all_sorted() {
        let store = MemoryStore::new();
        for t in ["a", "b", "c"] {
            store.save(note(t));
        }
        let ids: Vec<_> = store.find_all().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let store: MemoryStore<Note> = MemoryStore::new();
        let err = store.find_by_id(9).unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "note 9 not found");
    }

    #[test]
    fn test_update_keeps_id() {
        let store = MemoryStore::new();
        let saved = store.save(note("a"));
        let updated = store.update(saved.id, note("z")).unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(store.find_by_id(saved.id).unwrap().text, "z");
        assert!(store.update(42, note("x")).is_err());
    }

    #[test]
    fn test_clear_keeps_sequence() {
        let store = MemoryStore::new();
        store.save(note("a"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.save(note("b")).id, 2);
    }

    #[test]
    fn test_concurrent_saves_get_unique_ids() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.save(note(&format!("{t}-{i}")));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let all = store.find_all();
        assert_eq!(all.len(), 200);
        assert_eq!(all.last().map(|n| n.id), Some(200));
    }
}
