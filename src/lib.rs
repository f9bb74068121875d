//! # What's this?
//!
//! A **growable list** built on a **table of bounded segments** instead of
//! one contiguous buffer.
//!
//! ## When should I use it?
//!
//! You may want to use a [`PartList`] instead of a `Vec` if:
//! - **...you insert or remove in the middle a lot**. A `Vec` has to shift
//!   every later element on every such call; a `PartList` only shifts within
//!   and across the segments the affected range touches, and never has to
//!   copy the whole backing store to grow.
//! - **...you want a hard cap on any single allocation's size**, regardless
//!   of how large the list grows overall (`max_segment_capacity`).
//!
//! You should *not* use `PartList` if:
//! - **...you need a contiguous slice**. Because a `PartList` is
//!   _segmented_, storing chunks of data at different memory locations, it
//!   cannot hand out `&[T]` over an arbitrary range. You can iterate over
//!   ranges, or copy one out into a `Vec`, but not slice in place.
//! - **...the list is built once and never mutated**. The segment-table
//!   indirection exists to make insertion, removal, and capacity changes
//!   cheap; a `Vec` that's only ever read back is strictly faster to index.

#[cfg(test)]
macro_rules! test_dbg {
    ($x:expr) => {
        dbg!($x)
    };
}

mod error;
mod iter;
mod list;
mod partition;
mod position;
mod read_only;
mod segment;


pub use error::PartListError;
pub use iter::{Iter, IterMut};
pub use list::PartList;
pub use read_only::ReadOnlyPartList;

/// The segment size used by [`PartList::new`] and [`PartList::with_capacity`]
/// when the caller doesn't pick one explicitly. 16 MiB of `usize`-sized
/// elements per segment on a 64-bit target — large enough that ordinary
/// lists stay single-segment, small enough that growth never demands one
/// enormous contiguous allocation.
pub const DEFAULT_MAX_SEGMENT_CAPACITY: usize = 1 << 24;
