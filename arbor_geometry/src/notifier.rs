// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification for transforms.

/// A change notifier that records notifications until its owner drains them.
///
/// Rather than holding callbacks, a `Notifier` counts how many times it fired
/// since the last [`Notifier::take`]. The owner of the transform (the scene)
/// drains it after each mutation and performs the explicit tree walk that
/// invalidates dependent state. This keeps the cascade visible and testable
/// in isolation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notifier {
    pending: u32,
    total: u64,
}

impl Notifier {
    /// Create a notifier with nothing pending.
    pub const fn new() -> Self {
        Self {
            pending: 0,
            total: 0,
        }
    }

    /// Fire the notifier once.
    pub fn notify(&mut self) {
        self.pending = self.pending.saturating_add(1);
        self.total = self.total.wrapping_add(1);
    }

    /// Returns true if a notification is waiting to be drained.
    pub fn is_pending(&self) -> bool {
        self.pending > 0
    }

    /// Drain pending notifications and return how many there were.
    pub fn take(&mut self) -> u32 {
        core::mem::take(&mut self.pending)
    }

    /// Number of notifications fired over the notifier's lifetime.
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_pending_but_keeps_total() {
        let mut n = Notifier::new();
        assert!(!n.is_pending());
        n.notify();
        n.notify();
        assert_eq!(n.take(), 2);
        assert!(!n.is_pending(), "take must drain");
        assert_eq!(n.take(), 0);
        assert_eq!(n.total(), 2);
    }
}
