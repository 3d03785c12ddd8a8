/// Tag frequency index
///
/// Built once per data load. Ranks tags by how many creators carry them
/// (most first), ties broken alphabetically. The same rank orders the
/// filter bar and every card's own tag row.
use std::cmp::Ordering;
use std::collections::HashMap;

use super::data::Creator;

/// Case-insensitive comparison with a case-sensitive tiebreak, so the
/// order is total. Stands in for the browser's locale comparison.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    /// Distinct tags in display order
    order: Vec<String>,
    rank: HashMap<String, usize>,
}

impl TagIndex {
    pub fn build(creators: &[Creator]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tag in creators.iter().flat_map(|c| c.tags.iter()) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }

        let mut tags: Vec<(&str, usize)> = counts.into_iter().collect();
        tags.sort_by(|(a, count_a), (b, count_b)| {
            count_b.cmp(count_a).then_with(|| locale_cmp(a, b))
        });

        let order: Vec<String> = tags.into_iter().map(|(tag, _)| tag.to_string()).collect();
        let rank = order
            .iter()
            .enumerate()
            .map(|(position, tag)| (tag.clone(), position))
            .collect();

        tracing::debug!(tags = order.len(), "Built tag index");
        Self { order, rank }
    }

    /// Tags in display order
    pub fn tags(&self) -> &[String] {
        &self.order
    }

    /// Display rank, or `None` for tags never seen at build time.
    /// `None` sorts after every ranked tag.
    pub fn rank_of(&self, tag: &str) -> Option<usize> {
        self.rank.get(tag).copied()
    }

    /// Order a creator's own tags by global rank. Unknown tags go last,
    /// keeping their relative order.
    pub fn sort_tags(&self, tags: &[String]) -> Vec<String> {
        let mut sorted = tags.to_vec();
        sorted.sort_by_key(|tag| self.rank_of(tag).unwrap_or(usize::MAX));
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
