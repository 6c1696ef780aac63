//! Writer cache and commit grouping.

use std::collections::HashMap;

use strata_storage::TableWriter;

/// Stable handle to a [`WriterCache`] entry.
///
/// Slots are never reused while the cache lives, so comparing the slot
/// returned by `lookup` against the slot bound on the previous line is the
/// "same table as last line" test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(usize);

/// Lifecycle of a table name within this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLifecycle {
    /// Status has not been resolved against the engine yet.
    #[default]
    Unresolved,
    /// The engine reported the table exists.
    Known,
    /// The name resolved to something unusable; terminal.
    Unusable,
}

/// Per-table state held for the lifetime of the ingest core.
#[derive(Default)]
pub struct CacheEntry {
    pub writer: Option<Box<dyn TableWriter>>,
    pub state: TableLifecycle,
}

/// Content-addressed map from table name to cached per-table state.
#[derive(Default)]
pub struct WriterCache {
    entries: Vec<CacheEntry>,
    index: HashMap<String, Slot>,
}

impl WriterCache {
    pub fn lookup(&self, name: &str) -> Option<Slot> {
        self.index.get(name).copied()
    }

    /// Inserts a fresh empty entry under an owned copy of `name`.
    pub fn insert(&mut self, name: &str) -> Slot {
        let slot = Slot(self.entries.len());
        self.entries.push(CacheEntry::default());
        self.index.insert(name.to_string(), slot);
        slot
    }

    pub fn entry(&self, slot: Slot) -> &CacheEntry {
        &self.entries[slot.0]
    }

    pub fn entry_mut(&mut self, slot: Slot) -> &mut CacheEntry {
        &mut self.entries[slot.0]
    }

    pub fn writer_mut(&mut self, slot: Slot) -> Option<&mut (dyn TableWriter + '_)> {
        match &mut self.entries[slot.0].writer {
            Some(b) => Some(b.as_mut()),
            None => None,
        }
    }

    /// Drops every cached writer, releasing their leases.
    pub fn release_all(&mut self) {
        for entry in &mut self.entries {
            entry.writer = None;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Writers displaced from the active slot since the last `commit_all`,
/// keyed by writer name so a twice-displaced writer commits once.
#[derive(Debug, Default)]
pub struct CommitList {
    slots: HashMap<String, Slot>,
}

impl CommitList {
    pub fn add(&mut self, name: &str, slot: Slot) {
        self.slots.insert(name.to_string(), slot);
    }

    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.values().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
