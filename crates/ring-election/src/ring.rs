//! Directed ring topology

use crate::error::{ElectionError, Result};
use crate::priority::Priority;
use serde::Serialize;
use std::collections::HashSet;

/// Immutable ring of unique node ids.
///
/// Node `i` sends to `(i + 1) mod N` and receives from `(i - 1) mod N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ring {
    ids: Vec<u64>,
}

impl Ring {
    pub fn new(ids: Vec<u64>) -> Result<Self> {
        if ids.is_empty() {
            return Err(ElectionError::EmptyRing);
        }

        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            if !seen.insert(id) {
                return Err(ElectionError::DuplicateId(id));
            }
        }

        Ok(Self { ids })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false, a ring has at least one member
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// # Panics
    ///
    /// Panics if `index` is not a ring position.
    pub fn id_at(&self, index: usize) -> u64 {
        self.ids[index]
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.ids.iter().position(|&v| v == id)
    }

    pub fn successor(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    pub fn predecessor(&self, index: usize) -> usize {
        (index + self.len() - 1) % self.len()
    }

    /// Successor edges as `(from, to)` ids, closing edge last.
    pub fn edges(&self) -> Vec<(u64, u64)> {
        (0..self.len())
            .map(|i| (self.id_at(i), self.id_at(self.successor(i))))
            .collect()
    }

    /// Id the election must converge on under `priority`.
    pub fn winner(&self, priority: Priority) -> u64 {
        priority
            .winner(self.ids.iter().copied())
            .unwrap_or(self.ids[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_and_predecessor_wrap() {
        let ring = Ring::new(vec![5, 3, 9, 1]).unwrap();
        assert_eq!(ring.successor(3), 0);
        assert_eq!(ring.predecessor(0), 3);
        assert_eq!(ring.successor(1), 2);
        assert_eq!(ring.predecessor(2), 1);
    }

    #[test]
    fn test_single_node_ring_points_to_itself() {
        let ring = Ring::new(vec![7]).unwrap();
        assert_eq!(ring.successor(0), 0);
        assert_eq!(ring.predecessor(0), 0);
        assert_eq!(ring.edges(), vec![(7, 7)]);
    }

    #[test]
    fn test_edges_close_the_ring() {
        let ring = Ring::new(vec![5, 3, 9, 1]).unwrap();
        assert_eq!(ring.edges(), vec![(5, 3), (3, 9), (9, 1), (1, 5)]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(Ring::new(vec![]), Err(ElectionError::EmptyRing)));
        assert!(matches!(
            Ring::new(vec![4, 2, 4]),
            Err(ElectionError::DuplicateId(4))
        ));
    }

    #[test]
    fn test_lookup_and_winner() {
        let ring = Ring::new(vec![5, 3, 9, 1]).unwrap();
        assert_eq!(ring.index_of(9), Some(2));
        assert_eq!(ring.index_of(42), None);
        assert_eq!(ring.winner(Priority::Highest), 9);
        assert_eq!(ring.winner(Priority::Lowest), 1);
    }
}
