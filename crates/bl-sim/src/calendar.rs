//! `EventCalendar`: time-ordered queue of scheduled actions.
//!
//! # Ordering
//!
//! Events pop in ascending `time`.  Events at the same minute pop in the
//! order they were added: every event gets a monotonically increasing `id`
//! on insertion and the heap orders by `(time, id)`.  Equal-time visits
//! therefore run exactly as the timetable scheduled them, which keeps
//! boarding order and all statistics deterministic.
//!
//! # Performance note
//!
//! A day of service is at most a few thousand events (buses × stops).
//! `BinaryHeap` gives O(log n) insert and pop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bl_core::Minute;

/// One scheduled action.  Never mutated after insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event<A> {
    pub time:   Minute,
    pub id:     u64,
    pub action: A,
}

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the earliest
/// `(time, id)` first.
struct Entry<A>(Event<A>);

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.0.time == other.0.time && self.0.id == other.0.id
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.0.time, other.0.id).cmp(&(self.0.time, self.0.id))
    }
}

/// Priority queue of [`Event`]s keyed by `(time, insertion order)`.
pub struct EventCalendar<A> {
    heap:    BinaryHeap<Entry<A>>,
    next_id: u64,
}

impl<A> Default for EventCalendar<A> {
    fn default() -> Self {
        Self { heap: BinaryHeap::new(), next_id: 0 }
    }
}

impl<A> EventCalendar<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(capacity), next_id: 0 }
    }

    /// Schedule `action` at `time` and return the id assigned to it.
    pub fn add_event(&mut self, time: Minute, action: A) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Entry(Event { time, id, action }));
        id
    }

    /// Remove and return the earliest event, or `None` if the calendar is
    /// empty.
    pub fn next_event(&mut self) -> Option<Event<A>> {
        self.heap.pop().map(|e| e.0)
    }

    /// Time of the earliest event without removing it.
    pub fn peek_time(&self) -> Option<Minute> {
        self.heap.peek().map(|e| e.0.time)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
