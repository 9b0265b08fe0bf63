//! Symbol hashing.
//!
//! Every name in the runtime (variables, functions, map keys, message fields)
//! is identified by a 32-bit FNV-1a hash of its text. `HashValue(0)` is
//! reserved for "no name".
//!
//! Distinct strings that collide are treated as the same identifier. Nothing
//! detects or rejects a collision.

use std::fmt;

/// FNV-1a 32-bit offset basis.
const OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime.
const PRIME_MULTIPLIER: u32 = 0x0100_0193;

/// Golden-ratio constant mixed in by [`combine`].
const GOLDEN_RATIO: u32 = 0x9e37_79b9;

/// Hashed identity of a byte string.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct HashValue(u32);

impl HashValue {
    /// The reserved "no value" hash.
    pub const EMPTY: HashValue = HashValue(0);

    /// Create from a raw hash.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        HashValue(raw)
    }

    /// Get the raw hash.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for the reserved empty hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({:#010x})", self.0)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<HashValue> for u32 {
    fn from(value: HashValue) -> Self {
        value.0
    }
}

const fn fold(mut value: u32, bytes: &[u8]) -> u32 {
    let mut i = 0;
    while i < bytes.len() {
        value = (value ^ bytes[i] as u32).wrapping_mul(PRIME_MULTIPLIER);
        i += 1;
    }
    value
}

/// Hash a byte string. Empty input yields [`HashValue::EMPTY`].
#[inline]
pub const fn hash_bytes(bytes: &[u8]) -> HashValue {
    if bytes.is_empty() {
        return HashValue::EMPTY;
    }
    HashValue(fold(OFFSET_BASIS, bytes))
}

/// Hash a string in a `const` context.
///
/// ```
/// use lull_ir::{const_hash, hash};
/// const FOO: lull_ir::HashValue = const_hash("foo");
/// assert_eq!(FOO, hash("foo"));
/// ```
#[inline]
pub const fn const_hash(text: &str) -> HashValue {
    hash_bytes(text.as_bytes())
}

/// Hash a string.
#[inline]
pub fn hash(text: &str) -> HashValue {
    hash_bytes(text.as_bytes())
}

/// Continue hashing `suffix` from an existing `prefix` hash.
///
/// `hash_with_prefix(hash(a), b) == hash(a + b)`. An empty suffix returns the
/// prefix unchanged; an empty prefix starts over from the offset basis.
pub fn hash_with_prefix(prefix: HashValue, suffix: &str) -> HashValue {
    if suffix.is_empty() {
        return prefix;
    }
    let seed = if prefix.is_empty() {
        OFFSET_BASIS
    } else {
        prefix.0
    };
    HashValue(fold(seed, suffix.as_bytes()))
}

/// Mix two identities into one. Order matters: `combine(a, b)` and
/// `combine(b, a)` differ for distinct inputs.
#[inline]
pub const fn combine(lhs: HashValue, rhs: HashValue) -> HashValue {
    let seed = lhs.0;
    let mixed = rhs
        .0
        .wrapping_add(GOLDEN_RATIO)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2);
    HashValue(seed ^ mixed)
}
