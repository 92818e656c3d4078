//! State publication

use heapless::Deque;

use crate::solenoid::SolenoidId;

/// Published events kept before the oldest is dropped
pub const EVENT_QUEUE_LEN: usize = 16;

/// A solenoid published a new logical state
///
/// Published when the drive sequence starts, not when the outputs settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchEvent {
    /// Solenoid that changed
    pub id: SolenoidId,
    /// New logical state
    pub state: bool,
}

/// Bounded event queue, drops the oldest event when full
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: Deque<SwitchEvent, EVENT_QUEUE_LEN>,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: SwitchEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        // Cannot fail: a slot was just freed
        let _ = self.events.push_back(event);
    }

    pub(crate) fn pop(&mut self) -> Option<SwitchEvent> {
        self.events.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_oldest_when_full() {
        let mut queue = EventQueue::default();
        for i in 0..(EVENT_QUEUE_LEN as u8 + 2) {
            queue.push(SwitchEvent {
                id: SolenoidId::new(i),
                state: true,
            });
        }

        assert_eq!(queue.len(), EVENT_QUEUE_LEN);
        assert_eq!(queue.pop().unwrap().id, SolenoidId::new(2));
    }
}
