//! Ordering used when nodes compare candidates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which end of the id range wins the election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// The largest id is elected
    Highest,

    /// The smallest id is elected
    Lowest,
}

impl Priority {
    /// Strict comparison: `a` ranks above `b`.
    pub fn outranks(&self, a: u64, b: u64) -> bool {
        match self {
            Self::Highest => a > b,
            Self::Lowest => a < b,
        }
    }

    /// The id this ordering elects out of `ids`.
    pub fn winner<I>(&self, ids: I) -> Option<u64>
    where
        I: IntoIterator<Item = u64>,
    {
        let ids = ids.into_iter();
        match self {
            Self::Highest => ids.max(),
            Self::Lowest => ids.min(),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Highest
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highest => write!(f, "highest"),
            Self::Lowest => write!(f, "lowest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outranks_is_strict() {
        assert!(Priority::Highest.outranks(9, 5));
        assert!(!Priority::Highest.outranks(5, 5));
        assert!(Priority::Lowest.outranks(1, 3));
        assert!(!Priority::Lowest.outranks(3, 3));
    }

    #[test]
    fn test_winner() {
        let ids = [5, 3, 9, 1];
        assert_eq!(Priority::Highest.winner(ids), Some(9));
        assert_eq!(Priority::Lowest.winner(ids), Some(1));
        assert_eq!(Priority::default().winner(Vec::new()), None);
    }
}
