//! Deferred simulation events
//!
//! Fuses, burst shots, trap ticks, lifetimes and wave timers are entries in a
//! min-heap keyed by fire time and polled once per logic tick. Every entry
//! belongs to an owner entity; destroying the owner cancels everything it
//! scheduled. Cancelled entries are dropped lazily when they surface.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use super::state::EntityId;

/// Handle to one scheduled entry. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// An entry whose time has come
#[derive(Debug, Clone, PartialEq)]
pub struct Due<T> {
    pub handle: TimerHandle,
    pub owner: EntityId,
    pub fire_at: f32,
    pub payload: T,
}

struct Entry<T> {
    fire_at: f32,
    handle: TimerHandle,
    owner: EntityId,
    payload: T,
}

// Reversed so BinaryHeap pops the earliest entry; ties resolve in
// scheduling order.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

pub struct Scheduler<T> {
    heap: BinaryHeap<Entry<T>>,
    /// Pending handles and their owners
    live: HashMap<TimerHandle, EntityId>,
    next_handle: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_handle: 1,
        }
    }
}

impl<T> std::fmt::Debug for Scheduler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.live.len())
            .finish()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at simulation time `fire_at`
    pub fn schedule(&mut self, owner: EntityId, fire_at: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle, owner);
        self.heap.push(Entry {
            fire_at,
            handle,
            owner,
            payload,
        });
        handle
    }

    /// Cancel one entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle).is_some()
    }

    /// Cancel everything `owner` scheduled
    pub fn cancel_owner(&mut self, owner: EntityId) -> usize {
        let before = self.live.len();
        self.live.retain(|_, o| *o != owner);
        before - self.live.len()
    }

    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Fire time of the earliest live entry
    pub fn next_due(&mut self) -> Option<f32> {
        self.discard_cancelled();
        self.heap.peek().map(|e| e.fire_at)
    }

    /// Pop the earliest live entry due at or before `now`
    pub fn pop_due(&mut self, now: f32) -> Option<Due<T>> {
        loop {
            self.discard_cancelled();
            let top = self.heap.peek()?;
            if top.fire_at > now {
                return None;
            }
            let entry = self.heap.pop()?;
            if self.live.remove(&entry.handle).is_some() {
                return Some(Due {
                    handle: entry.handle,
                    owner: entry.owner,
                    fire_at: entry.fire_at,
                    payload: entry.payload,
                });
            }
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    fn discard_cancelled(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.live.contains_key(&top.handle) {
                break;
            }
            self.heap.pop();
        }
    }
}
