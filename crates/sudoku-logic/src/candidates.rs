//! Candidate-set arithmetic over the value domain `1..=side`.
//!
//! A `CandidateSet` is a small bitset: bit `v - 1` is set when value `v` is
//! still possible. Sets are `Copy`, so "give the caller a fresh copy of the
//! whole domain" is just a value return.

use serde::{Deserialize, Serialize};

/// Set of domain values (1-based) a cell or unit can still take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateSet(u32);

impl CandidateSet {
    /// The empty set.
    pub const fn empty() -> Self {
        CandidateSet(0)
    }

    /// The full domain `{1..=side}`.
    pub fn full(side: usize) -> Self {
        debug_assert!(side >= 1 && side <= 32);
        CandidateSet(if side == 32 { u32::MAX } else { (1u32 << side) - 1 })
    }

    /// Whether `value` is in the set.
    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        value >= 1 && self.0 & (1u32 << (value - 1)) != 0
    }

    /// Add `value` to the set.
    #[inline]
    pub fn insert(&mut self, value: u8) {
        debug_assert!(value >= 1);
        self.0 |= 1u32 << (value - 1);
    }

    /// Remove `value` from the set.
    #[inline]
    pub fn remove(&mut self, value: u8) {
        debug_assert!(value >= 1);
        self.0 &= !(1u32 << (value - 1));
    }

    /// Set difference.
    #[inline]
    pub fn minus(&self, other: CandidateSet) -> CandidateSet {
        CandidateSet(self.0 & !other.0)
    }

    /// Number of values in the set.
    #[inline]
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The single member, if the set has exactly one.
    #[inline]
    pub fn sole(&self) -> Option<u8> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    /// Iterate members in ascending order.
    pub fn iter(&self) -> CandidateIter {
        CandidateIter(self.0)
    }
}

impl FromIterator<u8> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = CandidateSet::empty();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

/// Ascending iterator over the members of a `CandidateSet`.
pub struct CandidateIter(u32);

impl Iterator for CandidateIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let tz = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(tz as u8 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_domain() {
        let set = CandidateSet::full(9);
        assert_eq!(set.count(), 9);
        for v in 1..=9 {
            assert!(set.contains(v));
        }
        assert!(!set.contains(10));
    }

    #[test]
    fn test_full_is_a_fresh_copy() {
        let mut a = CandidateSet::full(9);
        a.remove(5);
        let b = CandidateSet::full(9);
        assert!(b.contains(5));
    }

    #[test]
    fn test_insert_remove() {
        let mut set = CandidateSet::empty();
        set.insert(3);
        set.insert(7);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert_eq!(set.count(), 2);
        set.remove(3);
        assert!(!set.contains(3));
        // Removing an absent value is a no-op.
        set.remove(3);
        assert_eq!(set.count(), 1);
    }

    #[test]
    fn test_sole() {
        let mut set = CandidateSet::full(9);
        assert_eq!(set.sole(), None);
        for v in 1..=8 {
            set.remove(v);
        }
        assert_eq!(set.sole(), Some(9));
        set.remove(9);
        assert_eq!(set.sole(), None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_iter_ascending() {
        let set: CandidateSet = [9, 2, 5].into_iter().collect();
        let values: Vec<u8> = set.iter().collect();
        assert_eq!(values, vec![2, 5, 9]);
    }

    #[test]
    fn test_minus() {
        let all = CandidateSet::full(4);
        let taken: CandidateSet = [1, 4].into_iter().collect();
        let left: Vec<u8> = all.minus(taken).iter().collect();
        assert_eq!(left, vec![2, 3]);
    }
}
