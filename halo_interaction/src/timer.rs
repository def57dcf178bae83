// Copyright 2025 the Halo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual-time timer queue.
//!
//! Deadlines are measured on the host clock. Timers fire in deadline order; ties
//! fire in scheduling order.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle of a scheduled timer. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Hover exit debounce elapsed.
    HoverExit(String),
    /// Fade window elapsed; the overlay goes back to the pool.
    FadeOut(String),
    /// Selection pulse finished.
    PulseEnd(String),
    /// Teardown grace period elapsed.
    Teardown,
}

impl TimerKind {
    /// Node the timer belongs to.
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::HoverExit(n) | Self::FadeOut(n) | Self::PulseEnd(n) => Some(n),
            Self::Teardown => None,
        }
    }
}

/// Pending timers ordered by deadline.
#[derive(Debug, Default)]
pub struct TimerQueue {
    queue: BTreeMap<(Duration, TimerId), TimerKind>,
    deadlines: BTreeMap<TimerId, Duration>,
    next_id: u64,
}

impl TimerQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `at`.
    pub fn schedule(&mut self, at: Duration, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let _ = self.queue.insert((at, id), kind);
        let _ = self.deadlines.insert(id, at);
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(at) => self.queue.remove(&(at, id)).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, Duration, TimerKind)> {
        let entry = self.queue.first_entry()?;
        let (at, id) = *entry.key();
        if at > now {
            return None;
        }
        let kind = entry.remove();
        let _ = self.deadlines.remove(&id);
        Some((id, at, kind))
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        let late = q.schedule(ms(120), TimerKind::FadeOut("B".into()));
        let first = q.schedule(ms(50), TimerKind::HoverExit("A".into()));
        let tie = q.schedule(ms(50), TimerKind::PulseEnd("A".into()));
        assert_eq!(q.next_deadline(), Some(ms(50)));

        assert!(q.pop_due(ms(49)).is_none());
        assert_eq!(q.pop_due(ms(200)).map(|t| t.0), Some(first));
        assert_eq!(q.pop_due(ms(200)).map(|t| t.0), Some(tie));
        assert_eq!(q.pop_due(ms(200)).map(|t| t.0), Some(late));
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let id = q.schedule(ms(10), TimerKind::Teardown);
        assert!(q.is_pending(id));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(q.pop_due(ms(100)).is_none());
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(1), TimerKind::Teardown);
        q.clear();
        let b = q.schedule(ms(1), TimerKind::Teardown);
        assert_ne!(a, b);
        assert_eq!(q.len(), 1);
        assert_eq!(TimerKind::HoverExit("X".into()).node(), Some("X"));
    }
}
