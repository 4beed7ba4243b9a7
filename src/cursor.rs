//! Table-order traversal: explicit cursors, borrowing iterators, and the
//! key-based `key_after` primitive.
//!
//! Order is buckets ascending, each chain from head to tail. All three
//! forms walk the same order, so for an unmodified table they visit every
//! key exactly once.

use crate::error::{Error, Result};
use crate::hash_table::{EntryKey, HashTable};
use crate::hasher::KeyRef;
use core::iter::FusedIterator;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Position {
    Start,
    At(usize, EntryKey),
    Done,
}

/// Detached iteration state returned by [`HashTable::begin`].
///
/// A cursor does not borrow the table. Inserting between calls to
/// [`HashTable::advance`] is allowed as long as it does not resize: a new
/// key linked ahead of the cursor is visited, one linked behind it is not.
/// After a resize the cursor is rejected with [`Error::StaleCursor`], and
/// on any table other than the one that created it with
/// [`Error::ForeignCursor`].
#[derive(Copy, Clone, Debug)]
pub struct Cursor {
    table: u64,
    epoch: u64,
    pos: Position,
}

impl<V> HashTable<V> {
    fn first_occupied_from(&self, start: usize) -> Option<(usize, EntryKey)> {
        self.buckets
            .get(start..)?
            .iter()
            .enumerate()
            .find_map(|(i, head)| head.map(|k| (start + i, k)))
    }

    /// Position following `pos` in table order: the chain successor if
    /// there is one, else the head of the next non-empty bucket.
    fn successor(&self, pos: Option<(usize, EntryKey)>) -> Option<(usize, EntryKey)> {
        match pos {
            None => self.first_occupied_from(0),
            Some((bucket, k)) => match self.slots.get(k).and_then(|e| e.next) {
                Some(next) => Some((bucket, next)),
                None => self.first_occupied_from(bucket + 1),
            },
        }
    }

    fn step(&self, pos: Position) -> Position {
        let next = match pos {
            Position::Start => self.successor(None),
            Position::At(bucket, k) => self.successor(Some((bucket, k))),
            Position::Done => None,
        };
        match next {
            Some((bucket, k)) => Position::At(bucket, k),
            None => Position::Done,
        }
    }

    fn entry_at(&self, pos: Position) -> Option<(&[u8], &V)> {
        match pos {
            Position::At(_, k) => self.slots.get(k).map(|e| (&*e.key, &e.value)),
            Position::Start | Position::Done => None,
        }
    }

    /// A cursor positioned before the first key.
    pub fn begin(&self) -> Cursor {
        Cursor {
            table: self.id,
            epoch: self.epoch,
            pos: Position::Start,
        }
    }

    /// Move `cursor` to the next key and return it with its value, or
    /// `Ok(None)` once every key has been visited.
    pub fn advance(&self, cursor: &mut Cursor) -> Result<Option<(&[u8], &V)>> {
        if cursor.table != self.id {
            return Err(Error::ForeignCursor);
        }
        if cursor.epoch != self.epoch {
            return Err(Error::StaleCursor);
        }
        cursor.pos = self.step(cursor.pos);
        Ok(self.entry_at(cursor.pos))
    }

    /// Key following `prev` in table order.
    ///
    /// With `prev == None`, or a `prev` that is not in the table, this
    /// returns the first key. Returns `None` after the last key.
    /// Each call re-hashes `prev`; prefer [`HashTable::iter`] or a
    /// [`Cursor`] for full traversals.
    pub fn key_after(&self, prev: Option<&[u8]>) -> Option<&[u8]> {
        let pos = prev.and_then(|k| self.lookup(KeyRef::raw(k)));
        self.successor(pos).map(|(_, k)| &*self.slots[k].key)
    }

    /// String flavor of [`HashTable::key_after`]. Returned keys are the
    /// stored bytes, so keys set through the string API carry their NUL.
    pub fn key_after_str(&self, prev: Option<&str>) -> Option<&[u8]> {
        let pos = prev.and_then(|k| self.lookup(KeyRef::string(k)));
        self.successor(pos).map(|(_, k)| &*self.slots[k].key)
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            table: self,
            pos: Position::Start,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { it: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V> {
        Values { it: self.iter() }
    }
}

/// Iterator over `(key, value)` pairs in table order.
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    pos: Position,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.pos = self.table.step(self.pos);
        let item = self.table.entry_at(self.pos)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}

/// Iterator over keys in table order.
pub struct Keys<'a, V> {
    it: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a [u8];
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}
impl<V> FusedIterator for Keys<'_, V> {}

/// Iterator over values in table order.
pub struct Values<'a, V> {
    it: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}
impl<V> FusedIterator for Values<'_, V> {}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
