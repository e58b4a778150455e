use serde::{Deserialize, Serialize};

use crate::event::{DiffEvent, Side};

/// Counts collected over one diff pass.
///
/// Only final once both cursors are exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Entries visited in store A.
    pub count_a: u64,
    /// Entries visited in store B.
    pub count_b: u64,
    pub value_mismatches: u64,
    pub only_in_a: u64,
    pub only_in_b: u64,
}

impl DiffSummary {
    /// Total number of events emitted.
    pub fn events(&self) -> u64 {
        self.value_mismatches + self.only_in_a + self.only_in_b
    }

    /// `true` if any divergence at all was found.
    pub fn any_mismatch(&self) -> bool {
        self.events() > 0
    }

    pub(crate) fn record(&mut self, event: &DiffEvent) {
        match event {
            DiffEvent::ValueMismatch { .. } => self.value_mismatches += 1,
            DiffEvent::OnlyIn { side: Side::A, .. } => self.only_in_a += 1,
            DiffEvent::OnlyIn { side: Side::B, .. } => self.only_in_b += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvdiff_store::Entry;

    #[test]
    fn empty_summary_has_no_mismatch() {
        let s = DiffSummary::default();
        assert_eq!(s.events(), 0);
        assert!(!s.any_mismatch());
    }

    #[test]
    fn record_tallies_by_kind() {
        let mut s = DiffSummary::default();
        let e = Entry::new("k", "v", 0);
        s.record(&DiffEvent::only_in(Side::A, &e));
        s.record(&DiffEvent::only_in(Side::B, &e));
        s.record(&DiffEvent::only_in(Side::B, &e));
        s.record(&DiffEvent::value_mismatch(&e, &e));

        assert_eq!(s.only_in_a, 1);
        assert_eq!(s.only_in_b, 2);
        assert_eq!(s.value_mismatches, 1);
        assert_eq!(s.events(), 4);
        assert!(s.any_mismatch());
    }
}
