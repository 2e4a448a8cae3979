// ── Reactive entity collection ──
//
// Concurrent storage with O(1) lookups by id and push-based change
// notification via `watch` channels. Snapshots keep insertion order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::EntityId;

/// Shared, ordered view of every entity in a collection.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// A concurrent, reactive collection for a single entity type.
///
/// Every mutation rebuilds the snapshot that subscribers receive.
pub(crate) struct EntityCollection<T: Send + Sync + 'static> {
    /// id -> (insertion sequence, entity).
    by_id: DashMap<EntityId, (u64, Arc<T>)>,

    next_seq: AtomicU64,

    /// Full snapshot in insertion order, rebuilt on mutation.
    snapshot: watch::Sender<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            next_seq: AtomicU64::new(0),
            snapshot,
        }
    }

    /// Insert or replace an entity. Replacing keeps its original position.
    /// Returns `true` if the id was new.
    pub(crate) fn upsert(&self, id: EntityId, entity: T) -> bool {
        let existing = self.by_id.get(&id).map(|entry| entry.0);
        let is_new = existing.is_none();
        let seq = existing.unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::Relaxed));

        self.by_id.insert(id, (seq, Arc::new(entity)));

        self.rebuild_snapshot();

        is_new
    }

    /// Remove an entity. Returns it if it existed.
    pub(crate) fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        let removed = self.by_id.remove(id).map(|(_, (_, v))| v);
        if removed.is_some() {
            self.rebuild_snapshot();
        }
        removed
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.by_id.get(id).map(|entry| Arc::clone(&entry.1))
    }

    /// Whether any live entity matches, read from the map rather than the
    /// published snapshot.
    pub(crate) fn any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.by_id.iter().any(|r| predicate(&r.value().1))
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// The map is read while the watch write lock is held, so the last
    /// writer to publish always sees every insert made before it.
    fn rebuild_snapshot(&self) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| {
            let mut entries: Vec<(u64, Arc<T>)> = self
                .by_id
                .iter()
                .map(|r| (r.value().0, Arc::clone(&r.value().1)))
                .collect();
            entries.sort_by_key(|(seq, _)| *seq);
            *snap = Arc::new(entries.into_iter().map(|(_, v)| v).collect());
        });
    }
}
