//! The ordered sequence of segments, and the structural algorithms that
//! cross segment boundaries.
//!
//! `Partition<T>` owns the segment table and the invariant that the
//! partition's logical count equals the sum of its segments' live counts.
//! Every operation here assumes its caller (the [`list`](crate::list)
//! module) has already validated its arguments; preconditions are enforced
//! with `debug_assert!` rather than runtime errors, the same discipline
//! [`Segment`]'s own bounds-assuming accessors follow.

use crate::iter::{Iter, IterMut};
use crate::position::{Position, PositionCache};
use crate::segment::Segment;
use std::cmp::Ordering;

pub(crate) struct Partition<T> {
    max_segment_capacity: usize,
    segments: Vec<Segment<T>>,
    cache: PositionCache,
}

impl<T> Partition<T> {
    pub(crate) fn new(max_segment_capacity: usize) -> Self {
        debug_assert!(max_segment_capacity > 0);
        Self {
            max_segment_capacity,
            segments: vec![Segment::new(max_segment_capacity)],
            cache: PositionCache::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize, max_segment_capacity: usize) -> Self {
        let mut this = Self::new(max_segment_capacity);
        if capacity > 0 {
            this.extend_capacity(capacity);
        }
        this
    }

    #[inline]
    pub(crate) fn max_segment_capacity(&self) -> usize {
        self.max_segment_capacity
    }

    #[inline]
    pub(crate) fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    #[inline]
    pub(crate) fn segments_mut(&mut self) -> &mut [Segment<T>] {
        &mut self.segments
    }

    pub(crate) fn count(&self) -> usize {
        self.segments.iter().map(Segment::count).sum()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.segments.iter().map(Segment::capacity).sum()
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    // === position resolution (§4.2.1) ===

    fn resolve(&self, virtual_index: usize) -> Position {
        let mut remaining = virtual_index;
        let last = self.segments.len() - 1;
        for (si, seg) in self.segments.iter().enumerate() {
            if remaining < seg.count() {
                return Position::new(si, remaining);
            }
            if si == last {
                debug_assert_eq!(remaining, seg.count());
                return Position::new(si, seg.count());
            }
            remaining -= seg.count();
        }
        unreachable!("a partition always has at least one segment")
    }

    /// Resolves a virtual index to its `(segment, element)` position,
    /// consulting and updating the bounded position cache.
    pub(crate) fn get_position(&mut self, virtual_index: usize) -> Position {
        debug_assert!(virtual_index <= self.count());
        if let Some(pos) = self.cache.lookup(virtual_index) {
            return pos;
        }
        let pos = self.resolve(virtual_index);
        self.cache.insert(virtual_index, pos);
        pos
    }

    pub(crate) fn begin(&self) -> Position {
        self.resolve(0)
    }

    pub(crate) fn end(&self) -> Position {
        let last = self.segments.len() - 1;
        Position::new(last, self.segments[last].count())
    }

    /// The position immediately after `pos`. Well-defined for every
    /// interior position and for the before-begin sentinel; undefined
    /// (but memory-safe) past the end position.
    pub(crate) fn next(&self, pos: Position) -> Position {
        if pos.is_before_begin() {
            return self.begin();
        }
        let last = self.segments.len() - 1;
        if pos.element + 1 < self.segments[pos.segment].count() {
            return Position::new(pos.segment, pos.element + 1);
        }
        if pos.segment == last {
            return Position::new(last, self.segments[last].count());
        }
        let mut si = pos.segment + 1;
        while si < last && self.segments[si].count() == 0 {
            si += 1;
        }
        Position::new(si, 0)
    }

    /// The position immediately before `pos`. Yields the before-begin
    /// sentinel if `pos` is the first interior position.
    pub(crate) fn previous(&self, pos: Position) -> Position {
        if pos.element > 0 {
            return Position::new(pos.segment, pos.element - 1);
        }
        if pos.segment == 0 {
            return Position::BEFORE_BEGIN;
        }
        let mut si = pos.segment - 1;
        while si > 0 && self.segments[si].count() == 0 {
            si -= 1;
        }
        if self.segments[si].count() == 0 {
            return Position::BEFORE_BEGIN;
        }
        Position::new(si, self.segments[si].count() - 1)
    }

    // === set / set-range (§4.2.4) ===

    /// Overwrites the live element at `pos`, dropping the value already
    /// there. For filling slots a preceding `make_room` just opened, use
    /// [`Partition::init_item`]/[`Partition::init_item_range`] instead —
    /// those slots hold no live value to drop.
    pub(crate) fn set_item(&mut self, pos: Position, value: T) {
        self.segments[pos.segment].set(pos.element, value);
    }

    /// Writes `value` into the uninitialized slot at `pos` without
    /// dropping whatever was there — for filling a slot that `make_room`
    /// just opened.
    pub(crate) fn init_item(&mut self, pos: Position, value: T) {
        self.segments[pos.segment].init(pos.element, value);
    }

    /// Writes the items of `values` into the uninitialized slots starting
    /// at `pos`, following `next` across segment boundaries, without
    /// dropping whatever was there. Undefined if `values` yields more
    /// items than the reachable suffix holds slots for — the caller must
    /// size the room first via [`Partition::make_room`].
    pub(crate) fn init_item_range(&mut self, pos: Position, values: impl IntoIterator<Item = T>) {
        let mut cur = pos;
        for value in values {
            self.segments[cur.segment].init(cur.element, value);
            cur = self.next(cur);
        }
    }

    // === capacity management (§4.2.2) ===

    pub(crate) fn extend_capacity(&mut self, mut k: usize) {
        if k == 0 {
            return;
        }
        self.cache.invalidate();
        let last = self.segments.len() - 1;
        let want = k.min(self.segments[last].extendable());
        if want > 0 {
            // `extend` may add less capacity than `want` if the segment
            // already had slack (`capacity > count`); `k` must shrink by
            // the capacity actually added, not by the amount requested.
            let added = self.segments[last].extend(want);
            k -= added;
        }
        while k >= self.max_segment_capacity {
            self.segments
                .push(Segment::with_capacity(self.max_segment_capacity, self.max_segment_capacity));
            k -= self.max_segment_capacity;
        }
        if k > 0 {
            self.segments.push(Segment::with_capacity(k, self.max_segment_capacity));
        }
    }

    pub(crate) fn trim_capacity(&mut self, mut k: usize) {
        if k == 0 {
            return;
        }
        self.cache.invalidate();
        for seg in self.segments.iter_mut().rev() {
            if k == 0 {
                break;
            }
            let t = seg.trimmable().min(k);
            if t > 0 {
                seg.trim(t);
                k -= t;
            }
        }
        self.segments.retain(|s| s.capacity() > 0);
        if self.segments.is_empty() {
            self.segments.push(Segment::new(self.max_segment_capacity));
        }
    }

    // === make_room (§4.2.3) ===

    /// Opens a contiguous run of `k` uninitialized slots beginning at
    /// `pos`, reshaping the segment table as needed. The caller must fill
    /// every opened slot (via [`Partition::init_item`] or
    /// [`Partition::init_item_range`]) before any other operation touches
    /// the partition.
    pub(crate) fn make_room(&mut self, pos: Position, mut k: usize) {
        if k == 0 {
            return;
        }
        self.cache.invalidate();
        let si = pos.segment;
        let ei = pos.element;

        if self.segments[si].extendable() >= k {
            self.segments[si].make_room(ei, k);
            return;
        }

        let head_tail = self.segments[si].count() - ei;
        if head_tail > 0 {
            let has_next = si + 1 < self.segments.len();
            let next_extendable = if has_next { self.segments[si + 1].extendable() } else { 0 };
            if has_next && head_tail <= next_extendable {
                self.segments[si + 1].make_room(0, head_tail);
            } else {
                let mut fresh = Segment::with_capacity(head_tail, self.max_segment_capacity);
                fresh.make_room(0, head_tail);
                self.segments.insert(si + 1, fresh);
            }
            let (left, right) = self.segments.split_at_mut(si + 1);
            left[si].move_to(&mut right[0], 0, ei, head_tail);
        }
        debug_assert_eq!(self.segments[si].count(), ei);

        let add = k.min(self.segments[si].extendable());
        if add > 0 {
            self.segments[si].make_room(ei, add);
            k -= add;
        }

        let target = si + 1;
        if k > 0 && target < self.segments.len() {
            let add2 = k.min(self.segments[target].extendable());
            if add2 > 0 {
                self.segments[target].make_room(0, add2);
                k -= add2;
            }
        }

        while k >= self.max_segment_capacity {
            let mut full = Segment::with_capacity(self.max_segment_capacity, self.max_segment_capacity);
            full.make_room(0, self.max_segment_capacity);
            self.segments.insert(target, full);
            k -= self.max_segment_capacity;
        }

        if k > 0 {
            let mut residual = Segment::with_capacity(k, self.max_segment_capacity);
            residual.make_room(0, k);
            self.segments.insert(target, residual);
        }
    }

    // === remove (§4.2.5) ===

    /// Removes `k` live elements starting at `pos`, across however many
    /// segments that spans. The segment table's cardinality is unchanged
    /// — an emptied segment is left behind until a later `trim_capacity`.
    pub(crate) fn remove_range(&mut self, pos: Position, mut k: usize) {
        if k == 0 {
            return;
        }
        self.cache.invalidate();
        let mut si = pos.segment;
        let mut ei = pos.element;
        while k > 0 {
            let take = (self.segments[si].count() - ei).min(k);
            self.segments[si].remove_range(ei, take);
            k -= take;
            si += 1;
            ei = 0;
        }
    }

    /// Removes and returns the single live element at `pos`.
    pub(crate) fn remove_one(&mut self, pos: Position) -> T {
        self.cache.invalidate();
        self.segments[pos.segment].take_and_remove(pos.element)
    }

    // === reverse (§4.2.6) ===

    pub(crate) fn reverse(&mut self, begin: Position, end: Position, count: usize) {
        if count < 2 {
            return;
        }
        self.cache.invalidate();
        let mut lo = begin;
        let mut hi_next = end;
        for _ in 0..count / 2 {
            let hi = self.previous(hi_next);
            self.swap(lo, hi);
            lo = self.next(lo);
            hi_next = hi;
        }
    }

    fn swap(&mut self, a: Position, b: Position) {
        if a.segment == b.segment {
            self.segments[a.segment].swap(a.element, b.element);
            return;
        }
        let (lo, hi) = if a.segment < b.segment { (a, b) } else { (b, a) };
        let (left, right) = self.segments.split_at_mut(hi.segment);
        std::mem::swap(left[lo.segment].get_mut(lo.element), right[0].get_mut(hi.element));
    }

    // === binary search (§4.2.7) ===

    /// Searches the sorted sub-range `[index, index + count)` for `item`.
    /// Returns the element's index if present, or the bitwise complement
    /// of the insertion point otherwise. The midpoint is tracked as a
    /// plain virtual index and re-resolved via `get_position` once per
    /// step, rather than rebalancing position deltas as the bounds move;
    /// same O(log n) behavior, simpler to get right.
    pub(crate) fn binary_search(
        &mut self,
        index: usize,
        count: usize,
        item: &T,
        cmp: &mut impl FnMut(&T, &T) -> Ordering,
    ) -> i64 {
        let mut idx_lo = index as i64;
        let mut idx_hi = (index + count) as i64 - 1;
        while idx_lo <= idx_hi {
            let idx_mid = idx_lo + (idx_hi - idx_lo) / 2;
            let pos_mid = self.get_position(idx_mid as usize);
            let candidate = self.segments[pos_mid.segment].get(pos_mid.element);
            match cmp(item, candidate) {
                Ordering::Equal => return idx_mid,
                Ordering::Less => idx_hi = idx_mid - 1,
                Ordering::Greater => idx_lo = idx_mid + 1,
            }
        }
        -(idx_lo + 1)
    }

    // === whole-partition queries (§4.2.9) ===

    pub(crate) fn get(&self, virtual_index: usize) -> &T {
        let pos = self.resolve(virtual_index);
        self.segments[pos.segment].get(pos.element)
    }

    pub(crate) fn get_mut(&mut self, virtual_index: usize) -> &mut T {
        let pos = self.resolve(virtual_index);
        self.segments[pos.segment].get_mut(pos.element)
    }

    pub(crate) fn clear(&mut self) {
        for seg in &mut self.segments {
            seg.clear();
        }
        self.cache.invalidate();
    }
}

impl<T: Default> Partition<T> {
    /// Builds a partition of `count` default-initialized elements,
    /// populating whole max-capacity segments until the tail segment
    /// (§4.5).
    pub(crate) fn with_count(count: usize, max_segment_capacity: usize) -> Self {
        let mut this = Self::new(max_segment_capacity);
        if count > 0 {
            let begin = this.begin();
            this.make_room(begin, count);
            for i in 0..count {
                let pos = this.get_position(i);
                this.init_item(pos, T::default());
            }
        }
        this
    }
}

impl<T: PartialEq> Partition<T> {
    pub(crate) fn contains(&self, value: &T) -> bool {
        self.segments.iter().any(|s| s.contains(value))
    }

    pub(crate) fn remove(&mut self, value: &T) -> bool {
        for seg in self.segments.iter_mut() {
            if seg.remove(value) {
                self.cache.invalidate();
                return true;
            }
        }
        false
    }

    pub(crate) fn index_of(&mut self, value: &T, start: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let pos = self.get_position(start);
        let mut si = pos.segment;
        let mut ei = pos.element;
        let mut remaining = count;
        let mut virtual_base = start;
        loop {
            if si >= self.segments.len() {
                return None;
            }
            let seg = &self.segments[si];
            let avail = seg.count().saturating_sub(ei);
            let take = avail.min(remaining);
            if take > 0 {
                if let Some(local) = seg.index_of(value, ei, take) {
                    return Some(virtual_base + (local - ei));
                }
            }
            remaining -= take;
            virtual_base += take;
            if remaining == 0 {
                return None;
            }
            si += 1;
            ei = 0;
        }
    }

    pub(crate) fn last_index_of(&mut self, value: &T, start: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let pos = self.get_position(start);
        let mut si = pos.segment;
        let mut ei = pos.element;
        let mut remaining = count;
        let mut virtual_hi = start;
        loop {
            let seg_count = self.segments[si].count();
            let avail = if seg_count == 0 { 0 } else { ei + 1 };
            let take = avail.min(remaining);
            if take > 0 {
                if let Some(local) = self.segments[si].last_index_of(value, ei, take) {
                    return Some(virtual_hi - (ei - local));
                }
            }
            remaining -= take;
            virtual_hi = virtual_hi.saturating_sub(take);
            if remaining == 0 {
                return None;
            }
            if si == 0 {
                return None;
            }
            si -= 1;
            let c = self.segments[si].count();
            ei = if c > 0 { c - 1 } else { 0 };
        }
    }
}

impl<T> Partition<T> {
    pub(crate) fn remove_all(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut total = 0;
        for seg in self.segments.iter_mut() {
            total += seg.remove_all(&mut pred);
        }
        if total > 0 {
            self.cache.invalidate();
        }
        total
    }
}

impl<T: Clone> Partition<T> {
    /// Iterative quicksort over positions, using an explicit LIFO stack of
    /// `(first, last)` ranges (§4.2.8). Requires `T: Clone` to stage the
    /// pivot value aside: a pivot addressed only by position can be
    /// relocated by the very swaps its own comparisons drive, so this
    /// port clones it once per partition step rather than tracking and
    /// repairing a moving pivot position.
    pub(crate) fn sort(
        &mut self,
        begin: Position,
        end: Position,
        count: usize,
        cmp: &mut impl FnMut(&T, &T) -> Ordering,
    ) {
        if count < 2 {
            return;
        }
        self.cache.invalidate();
        let mut stack = vec![(begin, self.previous(end))];
        while let Some((low, high)) = stack.pop() {
            if low > high {
                continue;
            }
            if low.segment == high.segment {
                self.segments[low.segment].sort(low.element, high.element, cmp);
                continue;
            }

            let pivot_seg = (low.segment + high.segment) / 2;
            let seg_count = self.segments[pivot_seg].count();
            let pivot_elem = if pivot_seg == high.segment {
                0
            } else if pivot_seg == low.segment {
                seg_count - 1
            } else {
                seg_count / 2
            };
            let pivot = self.segments[pivot_seg].get(pivot_elem).clone();

            let mut up = self.previous(low);
            let mut down = self.next(high);
            loop {
                loop {
                    up = self.next(up);
                    if self.compare_at(up, &pivot, cmp) != Ordering::Less {
                        break;
                    }
                }
                loop {
                    down = self.previous(down);
                    if self.compare_at(down, &pivot, cmp) != Ordering::Greater {
                        break;
                    }
                }
                if up >= down {
                    let split = down;
                    if low <= split {
                        stack.push((low, split));
                    }
                    let after_split = self.next(split);
                    if after_split <= high {
                        stack.push((after_split, high));
                    }
                    break;
                }
                self.swap(up, down);
            }
        }
    }

    fn compare_at(&self, pos: Position, other: &T, cmp: &mut impl FnMut(&T, &T) -> Ordering) -> Ordering {
        cmp(self.segments[pos.segment].get(pos.element), other)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Partition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("max_segment_capacity", &self.max_segment_capacity)
            .field("segments", &self.segments)
            .finish()
    }
}
