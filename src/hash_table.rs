//! HashTable: prime-sized bucket array over an arena of chained entries.

use crate::error::{Error, Result};
use crate::hasher::{hash_bytes, KeyRef};
use crate::prime::next_prime_at_least;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Entries allowed per bucket before a resize; the table grows as soon as
/// `len * LOAD_FACTOR >= bucket_count`.
pub const LOAD_FACTOR: usize = 2;

/// Size hint used by `HashTable::new` and `Default`.
pub const DEFAULT_SIZE_HINT: usize = 0;

new_key_type! {
    /// Arena slot of one entry.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    pub(crate) next: Option<EntryKey>,
}

/// Byte-keyed dictionary with separate chaining.
///
/// Each bucket holds the arena key of its chain head and each entry holds
/// the arena key of its successor, so chains are singly linked lists
/// without owning pointers. New entries are pushed at the chain head.
pub struct HashTable<V> {
    pub(crate) buckets: Vec<Option<EntryKey>>,
    pub(crate) slots: SlotMap<EntryKey, Entry<V>>,
    // Bumped on every resize; cursors carry the epoch they started in.
    pub(crate) epoch: u64,
    // Process-unique; cursors carry the id of the table that made them.
    pub(crate) id: u64,
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
thread_local! {
    // Makes the next bucket allocations on this thread fail.
    static FAIL_BUCKET_ALLOC: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

fn alloc_buckets(count: usize) -> Result<Vec<Option<EntryKey>>> {
    #[cfg(test)]
    let count = if FAIL_BUCKET_ALLOC.with(|f| f.get()) {
        usize::MAX
    } else {
        count
    };
    let mut buckets = Vec::new();
    if let Err(e) = buckets.try_reserve_exact(count) {
        log::debug!("failed to allocate {count} buckets: {e}");
        return Err(Error::AllocFailed(e));
    }
    buckets.resize(count, None);
    Ok(buckets)
}

fn copy_key(key_ref: KeyRef<'_>) -> Result<Box<[u8]>> {
    let mut key = Vec::new();
    if let Err(e) = key.try_reserve_exact(key_ref.len()) {
        log::debug!("failed to allocate {}-byte key: {e}", key_ref.len());
        return Err(Error::AllocFailed(e));
    }
    key.extend(key_ref.bytes());
    Ok(key.into_boxed_slice())
}

impl<V> HashTable<V> {
    /// Empty table with `next_prime_at_least(DEFAULT_SIZE_HINT)` buckets.
    pub fn new() -> Self {
        Self {
            buckets: vec![None; next_prime_at_least(DEFAULT_SIZE_HINT)],
            slots: SlotMap::with_key(),
            epoch: 0,
            id: next_table_id(),
        }
    }

    /// Empty table with `next_prime_at_least(size_hint)` buckets.
    ///
    /// Fails with [`Error::AllocFailed`] if the bucket array cannot be
    /// allocated.
    pub fn with_size_hint(size_hint: usize) -> Result<Self> {
        Ok(Self {
            buckets: alloc_buckets(next_prime_at_least(size_hint))?,
            slots: SlotMap::with_key(),
            epoch: 0,
            id: next_table_id(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets. Always prime.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket index and arena key of the entry matching `key_ref`.
    pub(crate) fn lookup(&self, key_ref: KeyRef<'_>) -> Option<(usize, EntryKey)> {
        if key_ref.is_empty() {
            return None;
        }
        let bucket = key_ref.bucket(self.buckets.len());
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            let entry = &self.slots[k];
            if key_ref.matches(&entry.key) {
                return Some((bucket, k));
            }
            cur = entry.next;
        }
        None
    }

    pub fn has(&self, key: &[u8]) -> bool {
        self.lookup(KeyRef::raw(key)).is_some()
    }

    pub fn has_str(&self, key: &str) -> bool {
        self.lookup(KeyRef::string(key)).is_some()
    }

    /// Value stored under `key`, or `None` on a miss. An empty key always
    /// misses.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.lookup(KeyRef::raw(key))
            .map(|(_, k)| &self.slots[k].value)
    }

    pub fn get_str(&self, key: &str) -> Option<&V> {
        self.lookup(KeyRef::string(key))
            .map(|(_, k)| &self.slots[k].value)
    }

    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let (_, k) = self.lookup(KeyRef::raw(key))?;
        Some(&mut self.slots[k].value)
    }

    pub fn get_mut_str(&mut self, key: &str) -> Option<&mut V> {
        let (_, k) = self.lookup(KeyRef::string(key))?;
        Some(&mut self.slots[k].value)
    }

    /// Store `value` under a copy of `key`.
    ///
    /// Returns the replaced value when `key` was already present; the key
    /// bytes and the entry count are left alone in that case. Inserting a
    /// new key may resize the table before returning.
    ///
    /// Fails with [`Error::EmptyKey`] for an empty key and with
    /// [`Error::AllocFailed`] when the key copy or a grown bucket array
    /// cannot be allocated. The table is unchanged on failure.
    pub fn set(&mut self, key: &[u8], value: V) -> Result<Option<V>> {
        self.set_keyed(KeyRef::raw(key), value)
    }

    /// String flavor of [`HashTable::set`]; the stored key is the string's
    /// bytes up to its first NUL, followed by one NUL.
    pub fn set_str(&mut self, key: &str, value: V) -> Result<Option<V>> {
        self.set_keyed(KeyRef::string(key), value)
    }

    fn set_keyed(&mut self, key_ref: KeyRef<'_>, value: V) -> Result<Option<V>> {
        if key_ref.is_empty() {
            return Err(Error::EmptyKey);
        }
        if let Some((_, k)) = self.lookup(key_ref) {
            return Ok(Some(std::mem::replace(&mut self.slots[k].value, value)));
        }

        let key = copy_key(key_ref)?;
        // Allocate the grown bucket array before linking anything so an
        // allocation failure leaves the table untouched.
        let entries = self.len() + 1;
        let grown = if entries * LOAD_FACTOR >= self.buckets.len() {
            Some(alloc_buckets(next_prime_at_least(entries * LOAD_FACTOR))?)
        } else {
            None
        };

        let bucket = key_ref.bucket(self.buckets.len());
        let next = self.buckets[bucket];
        let k = self.slots.insert(Entry { key, value, next });
        self.buckets[bucket] = Some(k);

        if let Some(buckets) = grown {
            self.rehash_into(buckets);
        }
        Ok(None)
    }

    /// Rebuild the bucket array at `next_prime_at_least(len * LOAD_FACTOR)`
    /// buckets and relink every entry under the new bucket count.
    ///
    /// Invalidates outstanding [`Cursor`](crate::Cursor)s. Fails with
    /// [`Error::AllocFailed`], leaving the table as it was, if the new
    /// bucket array cannot be allocated.
    pub fn resize(&mut self) -> Result<()> {
        let buckets = alloc_buckets(next_prime_at_least(self.len() * LOAD_FACTOR))?;
        self.rehash_into(buckets);
        Ok(())
    }

    fn rehash_into(&mut self, mut buckets: Vec<Option<EntryKey>>) {
        let old_count = self.buckets.len();
        let new_count = buckets.len();
        log::trace!(
            "rehashing {} entries from {old_count} to {new_count} buckets",
            self.len()
        );

        // Old buckets in ascending order, each chain head to tail, each entry
        // pushed at the head of its new chain.
        let old = std::mem::take(&mut self.buckets);
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let entry = &mut self.slots[k];
                cur = entry.next;
                let bucket = hash_bytes(&entry.key, new_count);
                entry.next = buckets[bucket];
                buckets[bucket] = Some(k);
            }
        }

        self.buckets = buckets;
        self.epoch = self.epoch.wrapping_add(1);
        log::trace!("rehash done: {} entries in {new_count} buckets", self.len());
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
