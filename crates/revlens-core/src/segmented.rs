//! Append-only segmented storage.
//!
//! A `Segmented<T>` is a list of immutable, shared slices. Appending pushes a new
//! segment; cloning copies only the segment pointers. A value that has been handed
//! to readers is never mutated: replacing a segment builds a new slice.

use std::fmt;
use std::sync::Arc;

pub struct Segmented<T> {
    segments: Vec<Arc<[T]>>,
    /// Start position of each segment.
    offsets: Vec<usize>,
    len: usize,
}

impl<T> Segmented<T> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            offsets: Vec::new(),
            len: 0,
        }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        let mut out = Self::new();
        out.append(items);
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `items` as one new segment. Empty input is ignored.
    pub fn append(&mut self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        self.offsets.push(self.len);
        self.len += items.len();
        self.segments.push(Arc::from(items));
    }

    pub fn get(&self, pos: usize) -> Option<&T> {
        if pos >= self.len {
            return None;
        }
        let seg = match self.offsets.binary_search(&pos) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        self.segments[seg].get(pos - self.offsets[seg])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.segments.iter().flat_map(|s| s.iter())
    }

    /// The shared segments, in order.
    pub fn segments(&self) -> &[Arc<[T]>] {
        &self.segments
    }

    /// Start position of segment `idx`.
    pub fn segment_offset(&self, idx: usize) -> Option<usize> {
        self.offsets.get(idx).copied()
    }

    /// Replace segment `idx` with a new slice of the same length.
    ///
    /// Returns `false` (and leaves `self` untouched) on index or length mismatch.
    pub fn replace_segment(&mut self, idx: usize, items: Vec<T>) -> bool {
        match self.segments.get(idx) {
            Some(old) if old.len() == items.len() => {
                self.segments[idx] = Arc::from(items);
                true
            }
            _ => false,
        }
    }
}

impl<T: Clone> Segmented<T> {
    /// The first `n` items. Whole segments are shared; a segment cut in the
    /// middle is copied.
    pub fn prefix(&self, n: usize) -> Self {
        if n >= self.len {
            return self.clone();
        }
        let mut out = Self::new();
        for (segment, &offset) in self.segments.iter().zip(&self.offsets) {
            if offset >= n {
                break;
            }
            let end = offset + segment.len();
            if end <= n {
                out.offsets.push(out.len);
                out.len += segment.len();
                out.segments.push(Arc::clone(segment));
            } else {
                out.append(segment[..n - offset].to_vec());
            }
        }
        out
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Clone for Segmented<T> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            offsets: self.offsets.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for Segmented<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Segmented<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segmented")
            .field("len", &self.len)
            .field("segments", &self.segments.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_access_across_segments() {
        let mut s = Segmented::from_vec(vec![0, 1, 2]);
        s.append(vec![3, 4]);
        s.append(vec![]);
        s.append(vec![5]);
        assert_eq!(s.len(), 6);
        assert_eq!(s.segments().len(), 3);
        for i in 0..6 {
            assert_eq!(s.get(i), Some(&i));
        }
        assert_eq!(s.get(6), None);
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn clone_shares_segments() {
        let mut a = Segmented::from_vec(vec![1, 2, 3]);
        let b = a.clone();
        a.append(vec![4]);
        assert_eq!(b.len(), 3);
        assert_eq!(a.len(), 4);
        assert!(Arc::ptr_eq(&a.segments()[0], &b.segments()[0]));
    }

    #[test]
    fn prefix_cuts_inside_a_segment() {
        let mut s = Segmented::from_vec(vec![1, 2, 3]);
        s.append(vec![4, 5, 6]);
        let p = s.prefix(4);
        assert_eq!(p.to_vec(), vec![1, 2, 3, 4]);
        assert!(Arc::ptr_eq(&p.segments()[0], &s.segments()[0]));
        assert_eq!(s.prefix(0).len(), 0);
        assert_eq!(s.prefix(100).len(), 6);
    }

    #[test]
    fn replace_segment_requires_same_length() {
        let mut s = Segmented::from_vec(vec![1, 2]);
        let before = s.clone();
        assert!(!s.replace_segment(0, vec![9]));
        assert!(s.replace_segment(0, vec![7, 8]));
        assert_eq!(s.to_vec(), vec![7, 8]);
        assert_eq!(before.to_vec(), vec![1, 2]);
    }
}
