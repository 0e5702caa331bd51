//! Deterministic, bisection-friendly ordering of grouped candidates.

use std::collections::BTreeMap;

/// Location of one candidate site within the corpus.
///
/// Sites order by `(file, start, end)`; `file` is `None` for every site of
/// a single-file run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SiteKey {
    pub file: Option<usize>,
    pub start: usize,
    pub end: usize,
}

/// Candidate sites accumulated under stable group keys.
///
/// A group collects every site sharing one identity (all declarations and
/// definitions of one function name, say) so the whole group can be
/// realized as a single candidate. `into_ordered` yields groups sorted by
/// the lexicographic comparison of their sorted site vectors: groups whose
/// edits sit close together in the input end up adjacent in the hint list,
/// which is what makes bisection over contiguous hint subsets converge
/// quickly. Groups with identical site vectors may come out in either
/// order.
#[derive(Debug, Default)]
pub struct CandidateGroups {
    groups: BTreeMap<String, Vec<SiteKey>>,
}

impl CandidateGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, site: SiteKey) {
        self.groups.entry(key.to_string()).or_default().push(site);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the accumulator, yielding each group with its sites sorted
    /// and duplicate sites collapsed.
    pub fn into_ordered(self) -> Vec<(String, Vec<SiteKey>)> {
        let mut groups: Vec<(String, Vec<SiteKey>)> = self.groups.into_iter().collect();
        for (_, sites) in &mut groups {
            sites.sort_unstable();
            sites.dedup();
        }
        groups.sort_by(|a, b| a.1.cmp(&b.1));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(file: Option<usize>, start: usize, end: usize) -> SiteKey {
        SiteKey { file, start, end }
    }

    #[test]
    fn test_groups_order_by_site_vectors() {
        let mut groups = CandidateGroups::new();
        groups.add("zeta", site(Some(0), 1, 3));
        groups.add("alpha", site(Some(0), 5, 9));
        let ordered = groups.into_ordered();
        // The earlier site wins over the alphabetically earlier name.
        assert_eq!(ordered[0].0, "zeta");
        assert_eq!(ordered[1].0, "alpha");
    }

    #[test]
    fn test_comparison_is_lexicographic_over_whole_vectors() {
        let mut groups = CandidateGroups::new();
        groups.add("a", site(None, 0, 5));
        groups.add("a", site(None, 10, 20));
        groups.add("b", site(None, 0, 5));
        groups.add("b", site(None, 8, 9));
        let ordered = groups.into_ordered();
        // Shared first site; the second site breaks the tie.
        assert_eq!(ordered[0].0, "b");
    }

    #[test]
    fn test_shorter_prefix_vector_comes_first() {
        let mut groups = CandidateGroups::new();
        groups.add("long", site(None, 0, 5));
        groups.add("long", site(None, 9, 12));
        groups.add("short", site(None, 0, 5));
        let ordered = groups.into_ordered();
        assert_eq!(ordered[0].0, "short");
    }

    #[test]
    fn test_sites_are_sorted_and_deduplicated_within_a_group() {
        let mut groups = CandidateGroups::new();
        groups.add("f", site(None, 30, 40));
        groups.add("f", site(None, 0, 10));
        groups.add("f", site(None, 30, 40));
        let ordered = groups.into_ordered();
        assert_eq!(ordered[0].1, vec![site(None, 0, 10), site(None, 30, 40)]);
    }

    #[test]
    fn test_single_file_sites_precede_multi_file_sites() {
        // `None` orders before any `Some(file)`, and files order by index.
        assert!(site(None, 50, 60) < site(Some(0), 0, 10));
        assert!(site(Some(0), 50, 60) < site(Some(1), 0, 10));
    }
}
