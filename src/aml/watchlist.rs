use bloomfilter::Bloom;
use std::collections::HashSet;

/// PEP/sanctions name watchlist.
///
/// Uses a bloom filter for fast negative checks, with a hash set for
/// definitive verification. Clean names (the common case) resolve in O(1)
/// without touching the set.
pub struct Watchlist {
    /// Bloom filter for fast negative check
    bloom: Bloom<String>,
    /// Definitive set for positive verification
    names: HashSet<String>,
}

impl Watchlist {
    /// Build a watchlist from raw names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: HashSet<String> = names
            .into_iter()
            .map(|n| Self::normalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();

        let item_count = normalized.len().max(100);
        let fp_rate = 0.01; // 1% false positive rate
        let mut bloom = Bloom::new_for_fp_rate(item_count, fp_rate);

        for name in &normalized {
            bloom.set(name);
        }

        Watchlist { bloom, names: normalized }
    }

    /// Empty watchlist (matches nothing).
    pub fn empty() -> Self {
        Self::from_names(Vec::<String>::new())
    }

    /// Lowercase and collapse internal whitespace so formatting differences
    /// don't defeat a match.
    fn normalize(name: &str) -> String {
        name.split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check whether a name is on the list.
    pub fn contains(&self, name: &str) -> bool {
        let normalized = Self::normalize(name);

        // Fast path: bloom filter says definitely not present
        if !self.bloom.check(&normalized) {
            return false;
        }

        // Slow path: verify in the set (bloom may have a false positive)
        self.names.contains(&normalized)
    }

    /// Number of names on the list.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl std::fmt::Debug for Watchlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchlist").field("names", &self.names.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_case_and_whitespace_insensitive() {
        let list = Watchlist::from_names(["John  Doe", "Jane Roe"]);

        assert!(list.contains("john doe"));
        assert!(list.contains("JOHN DOE"));
        assert!(list.contains("  John   Doe  "));
        assert!(list.contains("Jane Roe"));
    }

    #[test]
    fn test_clean_name() {
        let list = Watchlist::from_names(["John Doe"]);
        assert!(!list.contains("Alice Smith"));
    }

    #[test]
    fn test_empty_list() {
        let list = Watchlist::empty();
        assert!(list.is_empty());
        assert!(!list.contains("anyone"));
    }

    #[test]
    fn test_blank_entries_dropped() {
        let list = Watchlist::from_names(["", "   ", "Real Name"]);
        assert_eq!(list.len(), 1);
    }
}
