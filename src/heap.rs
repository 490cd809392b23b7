//! An index-tracking binary min-heap.
//!
//! [`IndexedHeap`] is a 0-indexed, array-backed binary heap ordered by an
//! injected comparator.  Every mutating operation takes a
//! [`PositionObserver`] that is told, synchronously, each time an element
//! lands in a new storage slot — on push, on every swap during sift-up or
//! sift-down, and on the relocation during pop.  A caller that records the
//! reported slot can later call [`IndexedHeap::replace_on_index`] to update
//! an element's key in O(log n) instead of searching the whole array, which
//! is what makes decrease-key cheap.
//!
//! The observer runs inline with the mutation and must not itself mutate the
//! heap; re-entrancy is unsupported.
//!
//! Equal elements retain no particular relative order across pops; the heap
//! is not stable.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::mem;

use derivative::Derivative;

use crate::error::HeapError;

/// Receiver for element position changes inside an [`IndexedHeap`].
pub trait PositionObserver<T> {
    /// Called after `value` has been stored at `index`.
    fn position_changed(&mut self, value: &T, index: usize);
}

/// The no-op observer, for callers that do not need position tracking.
impl<T> PositionObserver<T> for () {
    fn position_changed(&mut self, _value: &T, _index: usize) {}
}

/// Adapts a closure into a [`PositionObserver`].
pub struct ObserveFn<F>(pub F);

impl<T, F> PositionObserver<T> for ObserveFn<F>
where
    F: FnMut(&T, usize),
{
    fn position_changed(&mut self, value: &T, index: usize) {
        (self.0)(value, index)
    }
}

/// A binary min-heap over `T`, ordered by a caller-supplied comparator.
///
/// Children of index `i` live at `2i + 1` and `2i + 2`; the parent of `i`
/// lives at `(i - 1) / 2`.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct IndexedHeap<T, C> {
    items: Vec<T>,
    #[derivative(Debug = "ignore")]
    compare: C,
}

impl<T, C> IndexedHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty heap ordered by `compare`.
    pub fn new(compare: C) -> Self {
        IndexedHeap {
            items: Vec::new(),
            compare,
        }
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        IndexedHeap {
            items: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserves capacity for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    /// Gets the minimum element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Gets the element currently stored at `index`, in heap order.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Less
    }

    fn swap(&mut self, a: usize, b: usize, observer: &mut impl PositionObserver<T>) {
        self.items.swap(a, b);
        observer.position_changed(&self.items[a], a);
        observer.position_changed(&self.items[b], b);
    }

    /// Moves the element at `index` up while it is strictly less than its
    /// parent.  A tie does not move.
    fn sift_up(&mut self, mut index: usize, observer: &mut impl PositionObserver<T>) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.swap(index, parent, observer);
            index = parent;
        }
    }

    /// Moves the element at `index` down, at each step swapping with the
    /// smaller child only if that child is strictly less.
    fn sift_down(&mut self, mut index: usize, observer: &mut impl PositionObserver<T>) {
        loop {
            let left = 2 * index + 1;
            if left >= self.items.len() {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < self.items.len() && self.less(right, left) {
                child = right;
            }
            if !self.less(child, index) {
                break;
            }
            self.swap(index, child, observer);
            index = child;
        }
    }

    /// Restores the heap invariant for the element at `index` after its key
    /// changed: sifts up if it now violates the parent relation, otherwise
    /// sifts down.
    fn restore(&mut self, index: usize, observer: &mut impl PositionObserver<T>) {
        if index > 0 && self.less(index, (index - 1) / 2) {
            self.sift_up(index, observer);
        } else {
            self.sift_down(index, observer);
        }
    }

    /// Inserts `value`, reporting every slot it passes through.
    pub fn push(&mut self, value: T, observer: &mut impl PositionObserver<T>) {
        self.items.push(value);
        let last = self.items.len() - 1;
        observer.position_changed(&self.items[last], last);
        self.sift_up(last, observer);
    }

    /// Inserts every element of `values` in order.
    pub fn push_range(
        &mut self,
        values: impl IntoIterator<Item = T>,
        observer: &mut impl PositionObserver<T>,
    ) {
        let values = values.into_iter();
        self.items.reserve(values.size_hint().0);
        for value in values {
            self.push(value, observer);
        }
    }

    /// Removes and returns the minimum element.
    pub fn pop(&mut self, observer: &mut impl PositionObserver<T>) -> Result<T, HeapError> {
        let last = self.items.pop().ok_or(HeapError::Empty)?;
        if self.items.is_empty() {
            return Ok(last);
        }
        let top = mem::replace(&mut self.items[0], last);
        observer.position_changed(&self.items[0], 0);
        self.sift_down(0, observer);
        Ok(top)
    }

    /// Replaces the element at a known slot with its updated value and
    /// restores the heap invariant from there.  This is the decrease-key
    /// path: a caller that tracked the element's slot through its observer
    /// avoids the O(n) search and pays only the O(log n) reordering.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_on_index(
        &mut self,
        index: usize,
        value: T,
        observer: &mut impl PositionObserver<T>,
    ) -> T {
        let old = mem::replace(&mut self.items[index], value);
        observer.position_changed(&self.items[index], index);
        self.restore(index, observer);
        old
    }

    /// Finds the first element matching `predicate`, scanning in storage
    /// order.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    /// Finds all elements matching `predicate`, in storage order.
    pub fn find_all(&self, predicate: impl Fn(&T) -> bool) -> Vec<&T> {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    /// Removes the element at a known slot: swaps it with the last element,
    /// shrinks, and re-heapifies from the vacated slot.  Returns `None` if
    /// `index` is out of bounds.
    pub fn remove_at(
        &mut self,
        index: usize,
        observer: &mut impl PositionObserver<T>,
    ) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let last = self.items.pop().expect("non-empty by the bounds check");
        if index == self.items.len() {
            return Some(last);
        }
        let removed = mem::replace(&mut self.items[index], last);
        observer.position_changed(&self.items[index], index);
        self.restore(index, observer);
        Some(removed)
    }

    /// Removes the first element matching `predicate`, if any.
    pub fn remove(
        &mut self,
        predicate: impl Fn(&T) -> bool,
        observer: &mut impl PositionObserver<T>,
    ) -> Option<T> {
        let index = self.items.iter().position(|item| predicate(item))?;
        self.remove_at(index, observer)
    }

    /// Removes every element matching `predicate`, returning how many were
    /// removed.  Each removal is a swap-with-last plus re-heapify, never a
    /// rebuild.
    pub fn remove_all(
        &mut self,
        predicate: impl Fn(&T) -> bool,
        observer: &mut impl PositionObserver<T>,
    ) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.items.len() {
            if !predicate(&self.items[index]) {
                index += 1;
                continue;
            }
            // Pop matching tail leaves first, so the element swapped into
            // this slot is known not to match.  An unexamined match swapped
            // in here could otherwise sift up into a slot the scan already
            // passed and survive.
            while self.items.len() > index + 1
                && predicate(self.items.last().expect("length checked above"))
            {
                self.items.pop();
                removed += 1;
            }
            self.remove_at(index, observer);
            removed += 1;
            // The element swapped into this slot has not been examined.
        }
        removed
    }

    /// Gets references to all elements in comparator-sorted order, not heap
    /// order.  This is the deterministic view used for equality, hashing,
    /// and display.
    pub fn sorted(&self) -> Vec<&T> {
        let mut items: Vec<&T> = self.items.iter().collect();
        items.sort_by(|a, b| (self.compare)(a, b));
        items
    }
}

impl<T, C> PartialEq for IndexedHeap<T, C>
where
    T: PartialEq,
    C: Fn(&T, &T) -> Ordering,
{
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl<T, C> Hash for IndexedHeap<T, C>
where
    T: Hash,
    C: Fn(&T, &T) -> Ordering,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        for item in self.sorted() {
            item.hash(state);
        }
    }
}

impl<T, C> Display for IndexedHeap<T, C>
where
    T: Display,
    C: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}
