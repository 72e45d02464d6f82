//! Run-wide rank → item mapping.

use std::collections::BTreeMap;

use topsites_xml::RankingEntry;
use tracing::debug;

/// Accumulates ranking entries across all windows of a run.
///
/// On a rank collision the later entry wins.
#[derive(Debug, Default)]
pub struct RankingAggregator {
    ranking: BTreeMap<u32, String>,
}

impl RankingAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every entry, returning how many existing ranks were overwritten.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = RankingEntry>) -> usize {
        let mut replaced = 0;
        for RankingEntry { rank, item } in entries {
            if let Some(previous) = self.ranking.insert(rank, item) {
                debug!(rank, previous = %previous, "Rank already present, replacing");
                replaced += 1;
            }
        }
        replaced
    }

    /// The accumulated mapping, ordered by rank.
    #[must_use]
    pub fn snapshot(&self) -> &BTreeMap<u32, String> {
        &self.ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_start_empty() {
        assert!(RankingAggregator::new().snapshot().is_empty());
    }

    #[test]
    fn test_should_let_later_value_win_on_collision() {
        let mut aggregator = RankingAggregator::new();
        assert_eq!(aggregator.merge([RankingEntry::new(1, "a.com")]), 0);
        let replaced = aggregator.merge([
            RankingEntry::new(1, "c.com"),
            RankingEntry::new(2, "d.com"),
        ]);

        assert_eq!(replaced, 1);
        let expected: BTreeMap<u32, String> =
            [(1, "c.com".to_owned()), (2, "d.com".to_owned())].into();
        assert_eq!(aggregator.snapshot(), &expected);
    }

    #[test]
    fn test_should_accept_empty_merge() {
        let mut aggregator = RankingAggregator::new();
        aggregator.merge([RankingEntry::new(3, "x.com")]);
        assert_eq!(aggregator.merge(Vec::new()), 0);
        assert_eq!(aggregator.snapshot().len(), 1);
    }
}
