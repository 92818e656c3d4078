//! Fixed-capacity timer queue
//!
//! Time only moves forward when the host ticks the queue. While due timers
//! are being drained the queue clock is set to each timer's deadline, so a
//! callback that schedules a follow-up step does so relative to when it was
//! due, not to when the tick happened to arrive.

use super::{TimerAction, TimerError, TimerId, TimerKey};
use crate::solenoid::SolenoidId;

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: TimerId,
    due_ms: u64,
    seq: u32,
    action: TimerAction,
}

/// Timer queue with `N` slots
#[derive(Debug)]
pub struct TimerQueue<const N: usize> {
    slots: [Option<Entry>; N],
    now_ms: u64,
    next_seq: u32,
}

impl<const N: usize> Default for TimerQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimerQueue<N> {
    /// Create an empty queue at time zero
    pub const fn new() -> Self {
        Self {
            slots: [None; N],
            now_ms: 0,
            next_seq: 0,
        }
    }

    /// Current queue time (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `action` to run `delay_ms` from now
    ///
    /// A timer already pending under `id` is cancelled and replaced.
    pub fn schedule(
        &mut self,
        id: TimerId,
        delay_ms: u32,
        action: TimerAction,
    ) -> Result<(), TimerError> {
        let entry = Entry {
            id,
            due_ms: self.now_ms + delay_ms as u64,
            seq: self.next_seq,
            action,
        };

        let slot = match self.find(id) {
            Some(i) => i,
            None => self
                .slots
                .iter()
                .position(|s| s.is_none())
                .ok_or(TimerError::Full)?,
        };

        self.next_seq = self.next_seq.wrapping_add(1);
        self.slots[slot] = Some(entry);
        Ok(())
    }

    /// Cancel a pending timer
    ///
    /// Returns true if a timer was pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.find(id) {
            Some(i) => {
                self.slots[i] = None;
                true
            }
            None => false,
        }
    }

    /// Check if a timer is pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.find(id).is_some()
    }

    /// Action of a pending timer
    pub fn pending_action(&self, id: TimerId) -> Option<TimerAction> {
        self.find(id).and_then(|i| self.slots[i].map(|e| e.action))
    }

    /// Number of pending timers
    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Earliest pending deadline (ms)
    pub fn next_deadline(&self) -> Option<u64> {
        self.slots.iter().flatten().map(|e| e.due_ms).min()
    }

    /// Remove and return the earliest timer due at or before `now_ms`
    ///
    /// Ties are broken by scheduling order. The queue clock moves to the
    /// returned timer's deadline.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, TimerAction)> {
        let (index, entry) = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|e| (i, e)))
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq.wrapping_sub(self.next_seq)))?;

        self.slots[index] = None;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some((entry.id, entry.action))
    }

    /// Move the queue clock forward to `now_ms`
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Key-only view of the timers owned by one solenoid
    pub fn for_owner(&mut self, owner: SolenoidId) -> OwnerTimers<'_, N> {
        OwnerTimers { owner, queue: self }
    }

    fn find(&self, id: TimerId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, Some(e) if e.id == id))
    }
}

/// Timers of a single solenoid, addressed by key
pub struct OwnerTimers<'a, const N: usize> {
    owner: SolenoidId,
    queue: &'a mut TimerQueue<N>,
}

impl<const N: usize> OwnerTimers<'_, N> {
    /// Schedule under `key`, replacing any pending timer with that key
    pub fn schedule(
        &mut self,
        key: TimerKey,
        delay_ms: u32,
        action: TimerAction,
    ) -> Result<(), TimerError> {
        self.queue
            .schedule(TimerId::new(self.owner, key), delay_ms, action)
    }

    /// Cancel the timer under `key`
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.queue.cancel(TimerId::new(self.owner, key))
    }

    /// Check if a timer is pending under `key`
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.queue.is_pending(TimerId::new(self.owner, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(owner: u8, key: TimerKey) -> TimerId {
        TimerId::new(SolenoidId::new(owner), key)
    }

    #[test]
    fn test_schedule_and_fire() {
        let mut queue: TimerQueue<4> = TimerQueue::new();
        queue
            .schedule(id(0, TimerKey::StartHold), 500, TimerAction::HoldLevel)
            .unwrap();

        assert!(queue.pop_due(499).is_none());
        assert_eq!(
            queue.pop_due(500),
            Some((id(0, TimerKey::StartHold), TimerAction::HoldLevel))
        );
        assert_eq!(queue.pending_count(), 0);
        assert_eq!(queue.now_ms(), 500);
    }

    #[test]
    fn test_same_key_replaces() {
        let mut queue: TimerQueue<4> = TimerQueue::new();
        let timer = id(1, TimerKey::Interlock);
        queue
            .schedule(timer, 100, TimerAction::InterlockRetry { state: true })
            .unwrap();
        queue
            .schedule(timer, 300, TimerAction::InterlockRetry { state: false })
            .unwrap();

        assert_eq!(queue.pending_count(), 1);
        assert!(queue.pop_due(200).is_none());
        assert_eq!(
            queue.pop_due(300),
            Some((timer, TimerAction::InterlockRetry { state: false }))
        );
    }

    #[test]
    fn test_cancel() {
        let mut queue: TimerQueue<4> = TimerQueue::new();
        let timer = id(0, TimerKey::LatchPulse);
        queue.schedule(timer, 10, TimerAction::LatchSettle).unwrap();

        assert!(queue.cancel(timer));
        assert!(!queue.cancel(timer));
        assert!(!queue.is_pending(timer));
        assert!(queue.pop_due(1000).is_none());
    }

    #[test]
    fn test_full() {
        let mut queue: TimerQueue<2> = TimerQueue::new();
        queue
            .schedule(id(0, TimerKey::Interlock), 10, TimerAction::LatchRedo)
            .unwrap();
        queue
            .schedule(id(1, TimerKey::Interlock), 10, TimerAction::LatchRedo)
            .unwrap();

        assert_eq!(
            queue.schedule(id(2, TimerKey::Interlock), 10, TimerAction::LatchRedo),
            Err(TimerError::Full)
        );
        // Replacing an existing timer still works when full
        assert!(queue
            .schedule(id(1, TimerKey::Interlock), 20, TimerAction::LatchRest)
            .is_ok());
    }

    #[test]
    fn test_pop_order_by_deadline_then_schedule_order() {
        let mut queue: TimerQueue<4> = TimerQueue::new();
        queue
            .schedule(id(0, TimerKey::StartHold), 200, TimerAction::HoldLevel)
            .unwrap();
        queue
            .schedule(id(1, TimerKey::StartHold), 100, TimerAction::HoldLevel)
            .unwrap();
        queue
            .schedule(id(2, TimerKey::StartHold), 100, TimerAction::HoldLevel)
            .unwrap();

        assert_eq!(queue.next_deadline(), Some(100));
        assert_eq!(queue.pop_due(1000).unwrap().0.owner, SolenoidId::new(1));
        assert_eq!(queue.pop_due(1000).unwrap().0.owner, SolenoidId::new(2));
        assert_eq!(queue.pop_due(1000).unwrap().0.owner, SolenoidId::new(0));
    }

    #[test]
    fn test_delay_relative_to_fired_deadline() {
        let mut queue: TimerQueue<4> = TimerQueue::new();
        let timer = id(0, TimerKey::LatchPulse);
        queue.schedule(timer, 300, TimerAction::LatchSettle).unwrap();

        // Late tick: the follow-up is scheduled relative to t=300
        let _ = queue.pop_due(1000).unwrap();
        queue.schedule(timer, 200, TimerAction::LatchRedo).unwrap();
        assert_eq!(queue.next_deadline(), Some(500));

        queue.advance(1000);
        assert_eq!(queue.now_ms(), 1000);
    }

    #[test]
    fn test_owner_view() {
        let mut queue: TimerQueue<4> = TimerQueue::new();
        let owner = SolenoidId::new(3);
        {
            let mut timers = queue.for_owner(owner);
            timers
                .schedule(TimerKey::LatchPulse, 30, TimerAction::LatchSettle)
                .unwrap();
            assert!(timers.is_pending(TimerKey::LatchPulse));
            assert!(!timers.is_pending(TimerKey::Interlock));
        }
        assert!(queue.is_pending(TimerId::new(owner, TimerKey::LatchPulse)));
        assert!(!queue.is_pending(TimerId::new(SolenoidId::new(2), TimerKey::LatchPulse)));
    }
}
