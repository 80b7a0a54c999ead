use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::propagation::Priority;
use crate::engine::propagation::PropagatorId;
use crate::ganache_assert_moderate;

/// The agenda of awakened propagators, ordered by [`Priority`].
///
/// A propagator that is already enqueued is not enqueued twice; only its
/// pending event mask is OR-merged. Within a priority level the order is
/// first-in first-out.
#[derive(Debug)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    pending_events: KeyedVec<PropagatorId, EnumSet<IntDomainEvent>>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue {
            queues: vec![VecDeque::new(); Priority::NUM_LEVELS as usize],
            is_enqueued: KeyedVec::default(),
            pending_events: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    /// Enqueue `propagator_id` at `priority`, merging `events` into its
    /// pending mask.
    pub(crate) fn enqueue(
        &mut self,
        propagator_id: PropagatorId,
        priority: Priority,
        events: EnumSet<IntDomainEvent>,
    ) {
        ganache_assert_moderate!((priority as usize) < self.queues.len());

        self.is_enqueued.accomodate(propagator_id, false);
        self.pending_events.accomodate(propagator_id, EnumSet::empty());

        self.pending_events[propagator_id] |= events;

        if !self.is_enqueued[propagator_id] {
            self.is_enqueued[propagator_id] = true;
            self.num_enqueued += 1;

            if self.queues[priority as usize].is_empty() {
                self.present_priorities.push(Reverse(priority as u32));
            }
            self.queues[priority as usize].push_back(propagator_id);
        }
    }

    /// Pop the next propagator and its accumulated event mask.
    pub(crate) fn pop(&mut self) -> Option<(PropagatorId, EnumSet<IntDomainEvent>)> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        ganache_assert_moderate!(!self.queues[top_priority].is_empty());

        let propagator_id = self.queues[top_priority]
            .pop_front()
            .expect("a present priority has a non-empty queue");

        self.is_enqueued[propagator_id] = false;
        self.num_enqueued -= 1;

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        let events = std::mem::take(&mut self.pending_events[propagator_id]);
        Some((propagator_id, events))
    }

    pub(crate) fn is_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }

    /// Remove every queued propagator, e.g. when a contradiction aborts the
    /// fixpoint.
    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present_priorities.pop() {
            self.queues[priority as usize].clear();
        }
        for is_enqueued in self.is_enqueued.iter_mut() {
            *is_enqueued = false;
        }
        for events in self.pending_events.iter_mut() {
            *events = EnumSet::empty();
        }
        self.num_enqueued = 0;
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;

    #[test]
    fn propagators_are_popped_by_priority_then_fifo() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue(PropagatorId(1), Priority::High, EnumSet::empty());
        queue.enqueue(PropagatorId(0), Priority::Medium, EnumSet::empty());
        queue.enqueue(PropagatorId(3), Priority::VeryLow, EnumSet::empty());
        queue.enqueue(PropagatorId(4), Priority::Low, EnumSet::empty());

        assert_eq!(PropagatorId(1), queue.pop().unwrap().0);
        assert_eq!(PropagatorId(0), queue.pop().unwrap().0);
        assert_eq!(PropagatorId(4), queue.pop().unwrap().0);
        assert_eq!(PropagatorId(3), queue.pop().unwrap().0);
        assert_eq!(None, queue.pop().map(|(id, _)| id));
    }

    #[test]
    fn enqueueing_twice_merges_the_event_masks() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue(
            PropagatorId(0),
            Priority::High,
            enum_set!(IntDomainEvent::LowerBound),
        );
        queue.enqueue(
            PropagatorId(0),
            Priority::High,
            enum_set!(IntDomainEvent::Assign),
        );

        let (id, events) = queue.pop().unwrap();
        assert_eq!(PropagatorId(0), id);
        assert_eq!(
            events,
            enum_set!(IntDomainEvent::LowerBound | IntDomainEvent::Assign)
        );
        assert!(queue.is_empty());
    }
}
