//! Locally edited membership sets.

use std::collections::BTreeSet;

/// Membership toggled locally and diffed against the last server state.
///
/// The baseline only changes through [`AssignmentDraft::reset`], which is
/// called with freshly fetched data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDraft<Id: Ord + Copy> {
    baseline: BTreeSet<Id>,
    current: BTreeSet<Id>,
}

impl<Id: Ord + Copy> Default for AssignmentDraft<Id> {
    fn default() -> Self {
        Self {
            baseline: BTreeSet::new(),
            current: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Copy> AssignmentDraft<Id> {
    pub fn new(assigned: impl IntoIterator<Item = Id>) -> Self {
        let baseline: BTreeSet<Id> = assigned.into_iter().collect();
        Self {
            current: baseline.clone(),
            baseline,
        }
    }

    /// Start over from server state, dropping local edits.
    pub fn reset(&mut self, assigned: impl IntoIterator<Item = Id>) {
        *self = Self::new(assigned);
    }

    /// Flip membership and return the new state.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.current.remove(&id) {
            false
        } else {
            self.current.insert(id);
            true
        }
    }

    pub fn is_assigned(&self, id: Id) -> bool {
        self.current.contains(&id)
    }

    pub fn assigned_count(&self) -> usize {
        self.current.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.baseline != self.current
    }

    pub fn to_add(&self) -> Vec<Id> {
        self.current.difference(&self.baseline).copied().collect()
    }

    pub fn to_remove(&self) -> Vec<Id> {
        self.baseline.difference(&self.current).copied().collect()
    }
}
