//! chain-dict: a byte-keyed dictionary over a prime-sized hash table with
//! separately chained buckets.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small dictionary whose structural invariants can be checked
//!   directly: prime bucket counts, load-factor-triggered rehashing, and a
//!   traversal order defined by the bucket layout.
//! - Pieces:
//!   - `hasher`: one-at-a-time hash reduced modulo the bucket count, with
//!     the string-key convention (bytes + NUL).
//!   - `prime`: `next_prime_at_least`, used for the initial size and every
//!     resize.
//!   - `HashTable<V>`: bucket array of chain heads over an entry arena.
//!   - `cursor`: explicit cursors, borrowing iterators and `key_after`.
//!
//! Storage
//! - Entries live in a `slotmap::SlotMap`; buckets and entries hold arena
//!   keys, so a chain is a singly linked list with no owning pointers.
//! - Each entry owns a copy of its key bytes. Keys are never rewritten.
//! - New entries are linked at the head of their chain.
//!
//! Keys
//! - Byte keys are compared by exact (length, bytes). Empty keys are
//!   invalid.
//! - String keys are the string's bytes up to its first NUL plus one NUL,
//!   so `"ab"` and `b"ab\0"` name the same entry while `b"ab"` does not.
//!
//! Growth
//! - `LOAD_FACTOR` is 2. Inserting a new key that makes
//!   `len * LOAD_FACTOR >= bucket_count` rehashes into
//!   `next_prime_at_least(len * LOAD_FACTOR)` buckets before `set` returns.
//! - The grown bucket array is allocated before the entry is linked, so a
//!   failed allocation leaves the table unchanged.
//!
//! Values
//! - The table never inspects, clones or compares `V`. A replaced value is
//!   returned from `set`. Store `&T`, `Rc<T>` or raw pointers as `V` to keep
//!   ownership with the caller.
//! - A miss is `None`; there is no sentinel value.
//!
//! Notes and non-goals
//! - Single-threaded; no interior mutability, `&mut self` for mutation.
//! - No single-entry removal.
//! - A `Cursor` is detached from the table and is rejected after a resize.

mod cursor;
mod error;
mod hash_table;
mod hash_table_proptest;
pub mod hasher;
pub mod prime;

// Public surface
pub use cursor::{Cursor, Iter, Keys, Values};
pub use error::{Error, Result};
pub use hash_table::{HashTable, DEFAULT_SIZE_HINT, LOAD_FACTOR};
