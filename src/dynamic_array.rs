use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::ArrayError;
use crate::sort::SortStrategy;

/// Capacity floor: no array ever holds fewer slots than this.
pub const DEFAULT_CAPACITY: usize = 3;

/// Rank-addressed growable array.
///
/// `capacity` is the number of slots the array has committed to; the backing
/// buffer always has room for at least that many elements. It doubles when an
/// insertion finds the array full and halves once the load factor drops to
/// 25%, never going below `DEFAULT_CAPACITY`.
///
/// Ranks are plain indices. Any insertion, removal or resize invalidates
/// every rank obtained before it.
#[derive(Debug)]
pub struct DynamicArray<T> {
    data: Vec<T>,
    capacity: usize,
    strategy: SortStrategy,
}

impl<T> DynamicArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            strategy: SortStrategy::default(),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        Ok(Self {
            data: allocate(capacity)?,
            capacity,
            strategy: SortStrategy::default(),
        })
    }

    /// Takes ownership of `data` as the initial contents.
    pub fn from_vec(mut data: Vec<T>) -> Self {
        let capacity = data.len().max(DEFAULT_CAPACITY);
        data.reserve_exact(capacity - data.len());
        Self {
            data,
            capacity,
            strategy: SortStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: SortStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn set_strategy(&mut self, strategy: SortStrategy) {
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, rank: usize) -> Option<&T> {
        self.data.get(rank)
    }

    pub fn get_mut(&mut self, rank: usize) -> Option<&mut T> {
        self.data.get_mut(rank)
    }

    pub fn read(&self, rank: usize) -> Result<&T, ArrayError> {
        let size = self.size();
        self.data
            .get(rank)
            .ok_or(ArrayError::IndexOutOfBounds { rank, size })
    }

    /// Overwrites the element at `rank`, returning the previous value.
    pub fn write(&mut self, rank: usize, value: T) -> Result<T, ArrayError> {
        let size = self.size();
        let slot = self
            .data
            .get_mut(rank)
            .ok_or(ArrayError::IndexOutOfBounds { rank, size })?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn front(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn back(&self) -> Option<&T> {
        self.data.last()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn insert(&mut self, rank: usize, value: T) -> Result<usize, ArrayError> {
        if rank > self.size() {
            return Err(ArrayError::IndexOutOfBounds {
                rank,
                size: self.size(),
            });
        }
        self.expand()?;
        self.data.insert(rank, value);
        Ok(rank)
    }

    pub fn push_back(&mut self, value: T) -> Result<usize, ArrayError> {
        self.insert(self.size(), value)
    }

    pub fn remove(&mut self, rank: usize) -> Result<T, ArrayError> {
        if rank >= self.size() {
            return Err(ArrayError::IndexOutOfBounds {
                rank,
                size: self.size(),
            });
        }
        let value = self.data.remove(rank);
        self.shrink();
        Ok(value)
    }

    /// Removes `[lo, hi)` with a single shift of the tail. Returns the number
    /// of elements removed.
    pub fn remove_range(&mut self, lo: usize, hi: usize) -> Result<usize, ArrayError> {
        self.check_range(lo, hi)?;
        if lo == hi {
            return Ok(0);
        }
        self.data.drain(lo..hi);
        self.shrink();
        Ok(hi - lo)
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let value = self.data.pop()?;
        self.shrink();
        Some(value)
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.shrink();
    }

    /// Applies `visit` to every element in rank order.
    pub fn traverse<F: FnMut(&mut T)>(&mut self, mut visit: F) {
        for element in self.data.iter_mut() {
            visit(element);
        }
    }

    pub fn unsort(&mut self) {
        knuth_shuffle(&mut self.data, &mut rand::rng());
    }

    pub fn unsort_range(&mut self, lo: usize, hi: usize) -> Result<(), ArrayError> {
        self.unsort_range_with(lo, hi, &mut rand::rng())
    }

    pub fn unsort_range_with<R: Rng + ?Sized>(
        &mut self,
        lo: usize,
        hi: usize,
        rng: &mut R,
    ) -> Result<(), ArrayError> {
        self.check_range(lo, hi)?;
        knuth_shuffle(&mut self.data[lo..hi], rng);
        Ok(())
    }

    fn check_range(&self, lo: usize, hi: usize) -> Result<(), ArrayError> {
        if lo > hi || hi > self.size() {
            return Err(ArrayError::InvalidRange {
                lo,
                hi,
                size: self.size(),
            });
        }
        Ok(())
    }

    fn expand(&mut self) -> Result<(), ArrayError> {
        let size = self.size();
        if size < self.capacity {
            return Ok(());
        }
        let old_capacity = self.capacity;
        let new_capacity = old_capacity.max(DEFAULT_CAPACITY).saturating_mul(2);
        self.data
            .try_reserve_exact(new_capacity - size)
            .map_err(|source| ArrayError::OutOfMemory {
                requested: new_capacity,
                source,
            })?;
        self.capacity = new_capacity;
        debug!(old_capacity, new_capacity, size, "expanded storage");
        Ok(())
    }

    fn shrink(&mut self) {
        if self.capacity <= DEFAULT_CAPACITY << 1 {
            return;
        }
        let size = self.size();
        if size << 2 > self.capacity {
            return;
        }
        let old_capacity = self.capacity;
        self.capacity >>= 1;
        self.data.shrink_to(self.capacity);
        debug!(old_capacity, new_capacity = self.capacity, size, "shrank storage");
    }
}

impl<T: Clone> DynamicArray<T> {
    /// `size` copies of `value` in an array of at least `capacity` slots.
    pub fn filled(capacity: usize, size: usize, value: T) -> Result<Self, ArrayError> {
        let mut arr = Self::try_with_capacity(capacity.max(size))?;
        arr.data.resize(size, value);
        Ok(arr)
    }

    /// Deep copy of `src[lo..hi]` with room for twice as many elements.
    pub fn from_slice_range(src: &[T], lo: usize, hi: usize) -> Result<Self, ArrayError> {
        if lo > hi || hi > src.len() {
            return Err(ArrayError::InvalidRange {
                lo,
                hi,
                size: src.len(),
            });
        }
        let capacity = (2 * (hi - lo)).max(DEFAULT_CAPACITY);
        let mut data = allocate(capacity)?;
        data.extend_from_slice(&src[lo..hi]);
        Ok(Self {
            data,
            capacity,
            strategy: SortStrategy::default(),
        })
    }

    pub fn from_array_range(src: &DynamicArray<T>, lo: usize, hi: usize) -> Result<Self, ArrayError> {
        Ok(Self::from_slice_range(src.as_slice(), lo, hi)?.with_strategy(src.strategy))
    }
}

impl<T: PartialEq> DynamicArray<T> {
    /// Rank of the last element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize> {
        self.find_unchecked(value, 0, self.size())
    }

    pub fn find_in(&self, value: &T, lo: usize, hi: usize) -> Result<Option<usize>, ArrayError> {
        self.check_range(lo, hi)?;
        Ok(self.find_unchecked(value, lo, hi))
    }

    fn find_unchecked(&self, value: &T, lo: usize, hi: usize) -> Option<usize> {
        self.data[lo..hi]
            .iter()
            .rposition(|element| element == value)
            .map(|offset| lo + offset)
    }

    /// Keeps only the first occurrence of each value. Works on unordered
    /// arrays at quadratic cost; returns the number of elements removed.
    pub fn deduplicate(&mut self) -> usize {
        let old_size = self.size();
        let mut i = 1;
        while i < self.size() {
            if self.find_unchecked(&self.data[i], 0, i).is_some() {
                self.data.remove(i);
                self.shrink();
            } else {
                i += 1;
            }
        }
        let removed = old_size - self.size();
        trace!(removed, "deduplicated");
        removed
    }

    /// Collapses runs of equal elements in a sorted array to their first
    /// element. Returns the number of elements removed.
    pub fn uniquify(&mut self) -> usize {
        let old_size = self.size();
        if old_size == 0 {
            return 0;
        }
        let mut i = 0;
        for j in 1..old_size {
            if self.data[i] != self.data[j] {
                i += 1;
                self.data.swap(i, j);
            }
        }
        self.data.truncate(i + 1);
        self.shrink();
        let removed = old_size - self.size();
        trace!(removed, "uniquified");
        removed
    }
}

impl<T: Ord> DynamicArray<T> {
    /// Binary search over a sorted array. Returns the rank of the rightmost
    /// element strictly less than `value`, i.e. the insertion point minus
    /// one, or `None` when every element is `>= value`.
    pub fn search(&self, value: &T) -> Option<usize> {
        self.search_unchecked(value, 0, self.size())
    }

    pub fn search_in(&self, value: &T, lo: usize, hi: usize) -> Result<Option<usize>, ArrayError> {
        self.check_range(lo, hi)?;
        Ok(self.search_unchecked(value, lo, hi))
    }

    fn search_unchecked(&self, value: &T, lo: usize, hi: usize) -> Option<usize> {
        let (mut a, mut b) = (lo, hi);
        while a < b {
            let mi = a + (b - a) / 2;
            if self.data[mi] < *value {
                a = mi + 1;
            } else {
                b = mi;
            }
        }
        (a > lo).then(|| a - 1)
    }

    /// Number of adjacent pairs out of order; zero iff sorted.
    pub fn disordered(&self) -> usize {
        self.data.windows(2).filter(|pair| pair[0] > pair[1]).count()
    }
}

impl<T: Ord + Default> DynamicArray<T> {
    pub fn sort(&mut self) {
        self.sort_with(self.strategy);
    }

    pub fn sort_with(&mut self, strategy: SortStrategy) {
        trace!(%strategy, size = self.size(), "sorting");
        strategy.sort(&mut self.data);
    }

    pub fn sort_range(&mut self, lo: usize, hi: usize) -> Result<(), ArrayError> {
        self.sort_range_with(lo, hi, self.strategy)
    }

    pub fn sort_range_with(
        &mut self,
        lo: usize,
        hi: usize,
        strategy: SortStrategy,
    ) -> Result<(), ArrayError> {
        self.check_range(lo, hi)?;
        trace!(%strategy, lo, hi, "sorting range");
        strategy.sort(&mut self.data[lo..hi]);
        Ok(())
    }
}

fn allocate<T>(capacity: usize) -> Result<Vec<T>, ArrayError> {
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|source| ArrayError::OutOfMemory {
            requested: capacity,
            source,
        })?;
    Ok(data)
}

fn knuth_shuffle<T, R: Rng + ?Sized>(data: &mut [T], rng: &mut R) {
    for i in (1..=data.len()).rev() {
        data.swap(i - 1, rng.random_range(0..i));
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let capacity = (2 * self.size()).max(DEFAULT_CAPACITY);
        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(&self.data);
        Self {
            data,
            capacity,
            strategy: self.strategy,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // release before reacquiring
        self.data = Vec::new();
        *self = source.clone();
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<usize> for DynamicArray<T> {
    type Output = T;
    fn index(&self, rank: usize) -> &T {
        self.get(rank).expect("rank out of bounds")
    }
}

impl<T> std::ops::IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, rank: usize) -> &mut T {
        self.get_mut(rank).expect("rank out of bounds")
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item).expect("allocation failed while extending");
        }
    }
}

impl<T: fmt::Display> fmt::Display for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, element) in self.data.iter().enumerate() {
            if rank > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
