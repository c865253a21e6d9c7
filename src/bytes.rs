//! Bit-level views of trie keys.
//!
//! Keys are read as an infinite stream of bytes: every byte past the end of a
//! key reads as `0`. For NUL-terminated strings this makes the terminator and
//! everything after it indistinguishable, which is what lets a key that is a
//! strict prefix of another key branch off at its terminator.

use crate::CriticalBit;

/// Read the byte at `index`, or `0` if the key is shorter than that.
#[inline]
pub(crate) fn byte_at(key: &[u8], index: usize) -> u8 {
    key.get(index).copied().unwrap_or(0)
}

/// Find the first bit at which `new_key` differs from `existing`.
///
/// Only the first `new_key.len()` bytes are compared. Within a single tree
/// keys are self-delimiting (either NUL-terminated or all the same length), so
/// when no byte in that range differs the two keys are equal. Any bytes stored
/// after the key in `existing` (such as fixed-length values) are never read.
///
/// Returns `None` if the keys are equal.
pub(crate) fn find_critical_bit(existing: &[u8], new_key: &[u8]) -> Option<CriticalBit> {
    new_key
        .iter()
        .enumerate()
        .find_map(|(index, &new_byte)| {
            let existing_byte = byte_at(existing, index);
            (existing_byte != new_byte)
                .then(|| CriticalBit::from_differing_bytes(index, existing_byte, new_byte))
        })
}
