use std::fmt;
use std::mem;
use std::str::FromStr;

use crate::error::ArrayError;

/// In-place sorting algorithm used over a rank range of a `DynamicArray`.
///
/// Every strategy leaves the range in non-descending order and keeps its
/// multiset of values unchanged. Only `Merge` and `Bubble` preserve the
/// relative order of equal elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortStrategy {
    Bubble,
    Selection,
    #[default]
    Merge,
    Quick,
    Heap,
}

impl SortStrategy {
    pub const ALL: [SortStrategy; 5] = [
        SortStrategy::Bubble,
        SortStrategy::Selection,
        SortStrategy::Merge,
        SortStrategy::Quick,
        SortStrategy::Heap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortStrategy::Bubble => "bubble",
            SortStrategy::Selection => "selection",
            SortStrategy::Merge => "merge",
            SortStrategy::Quick => "quick",
            SortStrategy::Heap => "heap",
        }
    }

    pub fn sort<T: Ord + Default>(self, data: &mut [T]) {
        match self {
            SortStrategy::Bubble => bubble_sort(data),
            SortStrategy::Selection => selection_sort(data),
            SortStrategy::Merge => merge_sort(data),
            SortStrategy::Quick => quick_sort(data),
            SortStrategy::Heap => heap_sort(data),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortStrategy {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ArrayError::UnknownStrategy(s.to_string()))
    }
}

/// Adjacent-swap passes. Each pass ends where the previous one last swapped,
/// so sorted input costs a single pass.
pub fn bubble_sort<T: Ord>(data: &mut [T]) {
    let mut hi = data.len();
    while hi > 1 {
        let mut last_swap = 0;
        for i in 1..hi {
            if data[i - 1] > data[i] {
                data.swap(i - 1, i);
                last_swap = i;
            }
        }
        hi = last_swap;
    }
}

pub fn selection_sort<T: Ord>(data: &mut [T]) {
    let mut hi = data.len();
    while hi > 1 {
        hi -= 1;
        let mx = max_rank(&data[..=hi]);
        data.swap(mx, hi);
    }
}

fn max_rank<T: Ord>(data: &[T]) -> usize {
    let mut mx = 0;
    for i in 1..data.len() {
        if data[i] > data[mx] {
            mx = i;
        }
    }
    mx
}

pub fn merge_sort<T: Ord + Default>(data: &mut [T]) {
    if data.len() < 2 {
        return;
    }
    let mi = data.len() / 2;
    merge_sort(&mut data[..mi]);
    merge_sort(&mut data[mi..]);
    merge(data, mi);
}

/// Merges the sorted runs `[0, mi)` and `[mi, len)`. Only the left run is
/// moved out into a buffer; the right run is consumed in place.
fn merge<T: Ord + Default>(data: &mut [T], mi: usize) {
    if data[mi - 1] <= data[mi] {
        return;
    }
    let mut left: Vec<T> = data[..mi].iter_mut().map(mem::take).collect();
    let right_len = data.len() - mi;
    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() {
        if j < right_len && data[mi + j] < left[i] {
            // slot k was vacated by an earlier move
            data.swap(k, mi + j);
            j += 1;
        } else {
            data[k] = mem::take(&mut left[i]);
            i += 1;
        }
        k += 1;
    }
}

/// Quick sort with a Lomuto partition around the first element. The smaller
/// side is sorted recursively and the larger one iteratively, which bounds
/// stack depth by `log n` even on already-sorted input.
pub fn quick_sort<T: Ord>(mut data: &mut [T]) {
    while data.len() > 1 {
        let p = partition(data);
        let (left, right) = mem::take(&mut data).split_at_mut(p);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort(left);
            data = right;
        } else {
            quick_sort(right);
            data = left;
        }
    }
}

fn partition<T: Ord>(data: &mut [T]) -> usize {
    let mut m = 0;
    for k in 1..data.len() {
        if data[k] < data[0] {
            m += 1;
            data.swap(m, k);
        }
    }
    data.swap(0, m);
    m
}

pub fn heap_sort<T: Ord>(data: &mut [T]) {
    let n = data.len();
    if n < 2 {
        return;
    }
    for i in (0..n / 2).rev() {
        sift_down(data, i, n);
    }
    for end in (1..n).rev() {
        data.swap(0, end);
        sift_down(data, 0, end);
    }
}

fn sift_down<T: Ord>(data: &mut [T], mut idx: usize, len: usize) {
    loop {
        let left = 2 * idx + 1;
        let right = 2 * idx + 2;
        let mut largest = idx;

        if left < len && data[left] > data[largest] {
            largest = left;
        }
        if right < len && data[right] > data[largest] {
            largest = right;
        }

        if largest != idx {
            data.swap(idx, largest);
            idx = largest;
        } else {
            break;
        }
    }
}
