//! Revisit bounding.

use rustc_hash::FxHashMap;

use crate::emulation::VisitBudget;

/// Counts accepted visits and enforces the revisit ceiling.
///
/// Under [`VisitBudget::PerAddress`] every visit of an address draws from one budget.
/// Under [`VisitBudget::PerEdge`] each predecessor address gets its own budget for the
/// address, so two loops sharing a join block are bounded separately.
#[derive(Debug)]
pub(crate) struct VisitTracker {
    budget: VisitBudget,
    limit: usize,
    counts: FxHashMap<(Option<u32>, u32), usize>,
}

impl VisitTracker {
    pub(crate) fn new(budget: VisitBudget, limit: usize) -> Self {
        VisitTracker {
            budget,
            limit,
            counts: FxHashMap::default(),
        }
    }

    /// Accepts a visit of `address` reached from `predecessor`.
    ///
    /// Returns `false` without counting if the visit would exceed the ceiling.
    pub(crate) fn accept(&mut self, predecessor: Option<u32>, address: u32) -> bool {
        let key = match self.budget {
            VisitBudget::PerAddress => (None, address),
            VisitBudget::PerEdge => (predecessor, address),
        };
        let count = self.counts.entry(key).or_default();
        if *count >= self.limit {
            return false;
        }
        *count += 1;
        true
    }
}
