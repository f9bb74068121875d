//! The error taxonomy every [`PartList`](crate::list::PartList) write and
//! fallible read validates against before touching the partition (§7).
//!
//! A `thiserror`-derived enum with one variant per applicable error kind,
//! the way `crosstream`'s `AppendError` (`src/ring.rs`) is built.
//!
//! A few error kinds from the wider precondition-violation taxonomy have
//! no Rust realization and are omitted rather than kept as
//! permanently-unreachable variants:
//! - `ArgumentNull` — the type system already forbids passing an absent
//!   closure/iterator/comparator where one is required; there is no null
//!   to reject at runtime.
//! - `NotSupported` — enforced at compile time instead: the read-only view
//!   simply doesn't expose write methods, rather than exposing them and
//!   erroring.
//! - `InvalidOperation` — covered the enumerator being read before its
//!   first advance, after exhaustion, or reset; `Iterator::next` has none
//!   of those failure modes (it just keeps returning `None`), so nothing
//!   here can ever produce this condition.
//!
//! `OutOfMemory` is kept for taxonomy completeness but is effectively
//! unreachable: stable Rust aborts the process on allocator failure rather
//! than returning one — `Segment`'s allocation paths call
//! `std::alloc::handle_alloc_error` on a null allocation for the same
//! reason (see `segment::alloc_buffer`).
use thiserror::Error;

/// The kinds of precondition violation a [`PartList`](crate::list::PartList)
/// operation can report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartListError {
    /// An index was negative, or equalled/exceeded the length where only
    /// `<` is allowed (getters, `remove_at`), or exceeded it by more than
    /// one where `<=` is allowed (`insert`).
    #[error("index {index} out of range for `{arg}` (length {len})")]
    ArgumentOutOfRange {
        arg: &'static str,
        index: i64,
        len: usize,
    },

    /// The combination of an index and a count doesn't fit within the
    /// current length, signalled distinctly from a single-parameter
    /// out-of-range index.
    #[error("range [{index}, {end}) does not fit within length {len}", end = index + count)]
    ArgumentRange {
        index: usize,
        count: usize,
        len: usize,
    },

    /// The underlying allocator refused to grow a segment. Reserved for
    /// taxonomy completeness; see the module documentation above.
    #[error("allocation failed while growing a segment")]
    OutOfMemory,
}
