//! Bucket hashing for byte and string keys.
//!
//! String keys are hashed and compared as their bytes followed by one NUL,
//! so a `&str` key and the equivalent NUL-terminated byte key address the
//! same entry.

/// Bob Jenkins' one-at-a-time hash over `bytes`.
///
/// Bytes are mixed as unsigned values, so keys containing bytes >= 0x80
/// hash (and iterate) differently from C code that reads them as signed
/// `char`.
#[inline]
pub fn one_at_a_time(bytes: impl IntoIterator<Item = u8>) -> u32 {
    let mut hash = 0u32;
    for b in bytes {
        hash = hash.wrapping_add(u32::from(b));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

/// Bucket index of a byte key, in `[0, bucket_count)`.
///
/// # Panics
/// If `bucket_count` is zero.
#[inline]
pub fn hash_bytes(key: &[u8], bucket_count: usize) -> usize {
    one_at_a_time(key.iter().copied()) as usize % bucket_count
}

/// Bucket index of a string key. Equal to `hash_bytes` over the string's
/// bytes (up to its first NUL) plus a terminating NUL.
#[inline]
pub fn hash_str(key: &str, bucket_count: usize) -> usize {
    KeyRef::string(key).bucket(bucket_count)
}

/// A borrowed lookup key: a byte body, optionally followed by an implied NUL.
///
/// Lets the string API search the table without allocating a terminated copy.
#[derive(Copy, Clone, Debug)]
pub(crate) struct KeyRef<'a> {
    body: &'a [u8],
    terminated: bool,
}

impl<'a> KeyRef<'a> {
    pub(crate) fn raw(body: &'a [u8]) -> Self {
        KeyRef {
            body,
            terminated: false,
        }
    }

    pub(crate) fn string(s: &'a str) -> Self {
        let bytes = s.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        KeyRef {
            body: &bytes[..end],
            terminated: true,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.body.len() + usize::from(self.terminated)
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub(crate) fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        let body = self.body;
        let tail: &'static [u8] = if self.terminated { &[0] } else { &[] };
        body.iter().copied().chain(tail.iter().copied())
    }

    #[inline]
    pub(crate) fn bucket(&self, bucket_count: usize) -> usize {
        one_at_a_time(self.bytes()) as usize % bucket_count
    }

    /// Exact (length, bytes) match against a stored key.
    #[inline]
    pub(crate) fn matches(&self, stored: &[u8]) -> bool {
        if stored.len() != self.len() {
            return false;
        }
        if self.terminated {
            let (last, head) = match stored.split_last() {
                Some(split) => split,
                None => return false,
            };
            *last == 0 && head == self.body
        } else {
            stored == self.body
        }
    }
}
