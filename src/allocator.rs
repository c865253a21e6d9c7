//! Allocator plumbing for trie nodes.
//!
//! Every node of a tree is allocated through the tree's [`Allocator`]. All
//! allocations go through the fallible `try_*` APIs of `allocator-api2`, which
//! is what lets an insert report an allocation failure instead of aborting the
//! process.
//!
//! When the `nightly` feature is enabled `allocator-api2` re-exports the
//! unstable `core::alloc` items, so these names are interchangeable with the
//! standard library ones.

pub use allocator_api2::alloc::{AllocError, Allocator, Global};
use allocator_api2::{boxed::Box, vec::Vec};
use core::{alloc::Layout, ptr, ptr::NonNull};

/// Copy the concatenation of `parts` into one exactly-sized buffer owned by
/// `alloc`.
///
/// At most one allocation is made. Nothing is allocated when all parts are
/// empty, and an empty buffer is never handed back to `alloc` either.
pub(crate) fn try_alloc_bytes<A: Allocator>(
    parts: &[&[u8]],
    alloc: A,
) -> Result<Vec<u8, A>, AllocError> {
    let len = parts.iter().map(|part| part.len()).sum();

    let mut buf = Vec::new_in(alloc);
    buf.try_reserve_exact(len).map_err(|_| AllocError)?;
    for part in parts {
        buf.extend_from_slice(part);
    }

    Ok(buf)
}

/// Move the value out of `boxed` and release its allocation.
pub(crate) fn box_into_inner<T, A: Allocator>(boxed: Box<T, A>) -> T {
    let (raw, alloc) = Box::into_raw_with_allocator(boxed);

    // SAFETY: `raw` came from a live `Box<T, A>`, so it is valid for reads and
    // was allocated by `alloc` with the layout of `T`. The value is read exactly
    // once and the box is never used again, so ownership moves to the caller.
    let value = unsafe { ptr::read(raw) };

    let layout = Layout::new::<T>();
    if layout.size() != 0 {
        // SAFETY: `raw` is non-null because it came from a box, and the
        // allocation is released with the same allocator and layout that
        // created it. The value was already moved out above.
        unsafe { alloc.deallocate(NonNull::new_unchecked(raw.cast::<u8>()), layout) };
    }

    value
}
