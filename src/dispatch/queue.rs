//! Dispatch queue
//!
//! Unassigned emergencies split into severity tiers. Within a tier, order is
//! arrival order, except that a case bumped by a redirection goes back to the
//! front of its tier.

use std::collections::VecDeque;

use crate::model::{Emergency, EmergencyId, Severity};

/// Position of a pending case: its tier and index within the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSlot {
    pub severity: Severity,
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct DispatchQueue {
    tiers: [VecDeque<Emergency>; Severity::ALL.len()],
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, em: Emergency) {
        self.tiers[em.severity.tier()].push_back(em);
    }

    /// Puts a bumped case back at the head of its tier.
    pub fn reinsert_front(&mut self, em: Emergency) {
        self.tiers[em.severity.tier()].push_front(em);
    }

    pub fn tier(&self, severity: Severity) -> &VecDeque<Emergency> {
        &self.tiers[severity.tier()]
    }

    /// Highest-priority tier holding at least one case.
    pub fn top_tier(&self) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .find(|sev| !self.tiers[sev.tier()].is_empty())
    }

    pub fn get(&self, slot: QueueSlot) -> Option<&Emergency> {
        self.tiers[slot.severity.tier()].get(slot.index)
    }

    pub fn take(&mut self, slot: QueueSlot) -> Option<Emergency> {
        self.tiers[slot.severity.tier()].remove(slot.index)
    }

    pub fn take_id(&mut self, id: EmergencyId) -> Option<Emergency> {
        for tier in &mut self.tiers {
            if let Some(idx) = tier.iter().position(|em| em.id == id) {
                return tier.remove(idx);
            }
        }
        None
    }

    /// Every pending case with its slot, highest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (QueueSlot, &Emergency)> {
        Severity::ALL.into_iter().flat_map(move |severity| {
            self.tiers[severity.tier()]
                .iter()
                .enumerate()
                .map(move |(index, em)| (QueueSlot { severity, index }, em))
        })
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(VecDeque::is_empty)
    }

    /// Queue length per tier, in [`Severity::ALL`] order.
    pub fn lengths(&self) -> Vec<usize> {
        self.tiers.iter().map(VecDeque::len).collect()
    }
}
