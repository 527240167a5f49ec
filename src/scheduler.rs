//! Virtual-time queue of delayed lifecycle transitions.
//!
//! Delays are counted in ticks. Nothing here runs on its own: the owner
//! calls [`TransitionQueue::pop_due`] after advancing its clock and applies
//! whatever comes back. Transitions due on the same tick fire in the order
//! they were scheduled.

use crate::server::ServerId;
use std::collections::BTreeMap;

/// Transition waiting for its timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTransition {
    /// `starting` -> `online` after a cold start
    FinishStart,
    /// `stopping` -> `offline`
    FinishStop,
    /// `stopping` -> `starting`, first leg of a restart
    RestartBoot,
    /// `starting` -> `online`, second leg of a restart
    FinishRestart,
}

/// A transition that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTransition {
    pub id: ServerId,
    pub transition: PendingTransition,
    pub due: u64,
}

#[derive(Debug, Default)]
pub struct TransitionQueue {
    // Keyed by (due tick, sequence) so iteration order is firing order
    entries: BTreeMap<(u64, u64), (ServerId, PendingTransition)>,
    next_seq: u64,
}

impl TransitionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `transition` for `id` at tick `due`
    pub fn schedule(&mut self, id: ServerId, transition: PendingTransition, due: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due, seq), (id, transition));
    }

    /// Remove and return the earliest transition due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<DueTransition> {
        let (&(due, seq), _) = self.entries.first_key_value()?;
        if due > now {
            return None;
        }
        self.entries
            .remove(&(due, seq))
            .map(|(id, transition)| DueTransition { id, transition, due })
    }

    /// Pending transition for a server, with its due tick
    pub fn pending_for(&self, id: ServerId) -> Option<(PendingTransition, u64)> {
        self.entries
            .iter()
            .find(|(_, (entry_id, _))| *entry_id == id)
            .map(|(&(due, _), &(_, transition))| (transition, due))
    }

    /// Drop everything scheduled for a server, returning how many entries went
    pub fn cancel_all(&mut self, id: ServerId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (entry_id, _)| *entry_id != id);
        before - self.entries.len()
    }

    /// Tick of the earliest pending transition
    pub fn next_due(&self) -> Option<u64> {
        self.entries.first_key_value().map(|(&(due, _), _)| due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
