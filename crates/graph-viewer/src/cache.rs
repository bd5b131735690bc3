use crate::store::{ConfidenceSummary, Store};
use crate::versioned::Memoized;

pub struct Cache {
    pub graph_summary: Memoized<Store, (u64, f64), Option<ConfidenceSummary>>,
    pub visible_summary:
        Memoized<Store, (u64, f64), Option<ConfidenceSummary>>,
}

impl Cache {
    pub fn new() -> Self {
        let graph_summary = Memoized::new(
            |s: &Store| {
                (s.graph.version(), s.criteria.significance_threshold)
            },
            |s: &Store| s.graph_summary_uncached(),
        );

        let visible_summary = Memoized::new(
            |s: &Store| {
                (s.visible_version(), s.criteria.significance_threshold)
            },
            |s: &Store| s.visible_summary_uncached(),
        );

        Self {
            graph_summary,
            visible_summary,
        }
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
