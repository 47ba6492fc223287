//! Priority-ordered, idempotent propagator scheduling (spec §4.4): a propagator scheduled more
//! than once before it runs is still only enqueued once; propagators run in priority order and
//! FIFO within a priority.

use std::collections::BinaryHeap;

/// Handle into the solver's propagator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropagatorId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledEntry {
    priority: u32,
    sequence: u64,
    propagator_id: PropagatorId,
}

impl Ord for ScheduledEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; we want the lowest priority number to run first and, within a
        // priority, the one scheduled earliest (smallest sequence number) to run first, so both
        // comparisons are reversed.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for ScheduledEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct PropagatorQueue {
    heap: BinaryHeap<ScheduledEntry>,
    is_scheduled: Vec<bool>,
    next_sequence: u64,
}

impl PropagatorQueue {
    pub fn register_propagator(&mut self) {
        self.is_scheduled.push(false);
    }

    /// Schedules `propagator_id` at `priority` unless it is already pending.
    pub fn schedule(&mut self, propagator_id: PropagatorId, priority: u32) {
        let index = propagator_id.0 as usize;
        if self.is_scheduled[index] {
            return;
        }
        self.is_scheduled[index] = true;
        self.heap.push(ScheduledEntry {
            priority,
            sequence: self.next_sequence,
            propagator_id,
        });
        self.next_sequence += 1;
    }

    pub fn pop(&mut self) -> Option<PropagatorId> {
        let entry = self.heap.pop()?;
        self.is_scheduled[entry.propagator_id.0 as usize] = false;
        Some(entry.propagator_id)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.is_scheduled.iter_mut().for_each(|flag| *flag = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_is_idempotent() {
        let mut queue = PropagatorQueue::default();
        queue.register_propagator();
        queue.schedule(PropagatorId(0), 5);
        queue.schedule(PropagatorId(0), 5);
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn lower_priority_number_runs_first() {
        let mut queue = PropagatorQueue::default();
        queue.register_propagator();
        queue.register_propagator();
        queue.schedule(PropagatorId(0), 10);
        queue.schedule(PropagatorId(1), 1);
        assert_eq!(queue.pop(), Some(PropagatorId(1)));
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
    }

    #[test]
    fn fifo_within_same_priority() {
        let mut queue = PropagatorQueue::default();
        queue.register_propagator();
        queue.register_propagator();
        queue.schedule(PropagatorId(1), 3);
        queue.schedule(PropagatorId(0), 3);
        assert_eq!(queue.pop(), Some(PropagatorId(1)));
        assert_eq!(queue.pop(), Some(PropagatorId(0)));
    }
}
