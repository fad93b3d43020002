//! Outbound Event Queue
//!
//! Engines push domain events here; the host drains them after each tick.

use social_events::{generate_event_id, EventRecord, SimTime, SocialEvent};

/// Stamped events waiting to be drained, in emission order
#[derive(Debug)]
pub struct EventQueue {
    records: Vec<EventRecord>,
    next_sequence: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp an event with the next id and the given time
    pub fn push(&mut self, at: SimTime, event: SocialEvent) {
        let id = generate_event_id(self.next_sequence);
        self.next_sequence += 1;
        self.records.push(EventRecord::new(id, at, event));
    }

    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Total number of events ever pushed
    pub fn emitted(&self) -> u64 {
        self.next_sequence - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use social_events::{AgentId, EmotionalState};

    fn contagion() -> SocialEvent {
        SocialEvent::EmotionalContagion {
            source: AgentId(1),
            target: AgentId(2),
            state: EmotionalState::Happy,
        }
    }

    #[test]
    fn test_ids_keep_counting_across_drains() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());

        queue.push(SimTime::new(0, 0.0), contagion());
        queue.push(SimTime::new(0, 0.0), contagion());
        let first = queue.drain();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].event_id, "evt_00000001");
        assert!(queue.is_empty());

        queue.push(SimTime::new(3, 3.0), contagion());
        let second = queue.drain();
        assert_eq!(second[0].event_id, "evt_00000003");
        assert_eq!(second[0].tick, 3);
        assert_eq!(queue.emitted(), 3);
    }
}
