#![forbid(unsafe_code)]

//! Cooperative timers and animation-frame requests.
//!
//! Everything here is single-threaded: "starting a timer" schedules a payload
//! for a future [`Timestamp`] and returns immediately. The owner of the queue
//! advances virtual time and pops due payloads one at a time, so callbacks
//! always run to completion before the next is dispatched.
//!
//! # Invariants
//!
//! 1. Due entries pop in `(deadline, insertion order)` order.
//! 2. A cancelled handle never pops.
//! 3. A frame key is pending at most once until the queue is drained
//!    (the `is_scheduled` guard).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::ops::Add;
use std::time::Duration;

/// Event-loop time in whole milliseconds since the loop started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// `self + duration`, saturating at `u64::MAX` milliseconds.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(ms))
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is later.
    #[must_use]
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}ms", self.0)
    }
}

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub handle: TimerHandle,
    pub deadline: Timestamp,
    pub payload: T,
}

/// Deadline-ordered queue of pending payloads.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(Timestamp, u64), T>,
    deadlines: HashMap<u64, Timestamp>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Timestamp, payload: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((deadline, seq), payload);
        self.deadlines.insert(seq, deadline);
        TimerHandle(seq)
    }

    /// Cancel a pending timer, returning its payload. Cancelling a fired or
    /// already cancelled handle returns `None`.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let deadline = self.deadlines.remove(&handle.0)?;
        self.entries.remove(&(deadline, handle.0))
    }

    /// Cancel every pending timer whose payload matches `pred`.
    ///
    /// Returns the number of timers removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let doomed: Vec<(Timestamp, u64)> = self
            .entries
            .iter()
            .filter(|(_, payload)| pred(payload))
            .map(|(key, _)| *key)
            .collect();
        for key in &doomed {
            self.entries.remove(key);
            self.deadlines.remove(&key.1);
        }
        doomed.len()
    }

    /// Pop the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<Fired<T>> {
        let (&(deadline, seq), _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        let payload = self.entries.remove(&(deadline, seq))?;
        self.deadlines.remove(&seq);
        Some(Fired {
            handle: TimerHandle(seq),
            deadline,
            payload,
        })
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Whether `handle` is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Iterate pending payloads in firing order.
    pub fn pending(&self) -> impl Iterator<Item = (Timestamp, &T)> {
        self.entries.iter().map(|((deadline, _), payload)| (*deadline, payload))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deduplicated animation-frame requests.
///
/// Repeated requests for the same key before the next frame collapse into
/// one callback.
#[derive(Debug, Clone)]
pub struct FrameQueue<K> {
    order: Vec<K>,
    scheduled: HashSet<K>,
}

impl<K> Default for FrameQueue<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            scheduled: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> FrameQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame callback for `key`. Returns false if one is already
    /// scheduled.
    pub fn request(&mut self, key: K) -> bool {
        if !self.scheduled.insert(key) {
            return false;
        }
        self.order.push(key);
        true
    }

    /// Whether a callback for `key` is pending.
    #[must_use]
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.scheduled.contains(key)
    }

    /// Take every pending request in request order and clear the guards.
    pub fn drain(&mut self) -> Vec<K> {
        self.scheduled.clear();
        std::mem::take(&mut self.order)
    }

    /// Drop pending requests matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) {
        let scheduled = &mut self.scheduled;
        self.order.retain(|key| {
            if pred(key) {
                scheduled.remove(key);
                false
            } else {
                true
            }
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_then_insertion_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Timestamp::from_millis(20), "b");
        queue.schedule(Timestamp::from_millis(10), "a");
        queue.schedule(Timestamp::from_millis(20), "c");

        let now = Timestamp::from_millis(25);
        let order: Vec<_> = std::iter::from_fn(|| queue.pop_due(now))
            .map(|fired| fired.payload)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn not_due_stays_pending() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Timestamp::from_millis(100), ());
        assert!(queue.pop_due(Timestamp::from_millis(99)).is_none());
        assert!(queue.is_pending(handle));
        assert!(queue.pop_due(Timestamp::from_millis(100)).is_some());
        assert!(!queue.is_pending(handle));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Timestamp::from_millis(5), 7);
        assert_eq!(queue.cancel(handle), Some(7));
        assert_eq!(queue.cancel(handle), None);
        assert!(queue.pop_due(Timestamp::from_millis(10)).is_none());
    }

    #[test]
    fn cancel_where_filters_payloads() {
        let mut queue = TimerQueue::new();
        queue.schedule(Timestamp::from_millis(1), 1);
        queue.schedule(Timestamp::from_millis(2), 2);
        queue.schedule(Timestamp::from_millis(3), 3);
        assert_eq!(queue.cancel_where(|v| v % 2 == 1), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(Timestamp::from_millis(2)));
    }

    #[test]
    fn frame_requests_are_deduplicated() {
        let mut frames = FrameQueue::new();
        assert!(frames.request(1));
        assert!(!frames.request(1));
        assert!(frames.request(2));
        assert_eq!(frames.drain(), vec![1, 2]);
        assert!(frames.request(1));
    }

    #[test]
    fn frame_cancel_releases_guard() {
        let mut frames = FrameQueue::new();
        frames.request(('a', 1));
        frames.request(('b', 1));
        frames.cancel_where(|(c, _)| *c == 'a');
        assert!(!frames.is_scheduled(&('a', 1)));
        assert_eq!(frames.drain(), vec![('b', 1)]);
    }

    #[test]
    fn timestamp_arithmetic_saturates() {
        let t = Timestamp::from_millis(u64::MAX - 1);
        assert_eq!(t + Duration::from_millis(10), Timestamp::from_millis(u64::MAX));
        assert_eq!(
            Timestamp::from_millis(5).saturating_duration_since(Timestamp::from_millis(9)),
            Duration::ZERO
        );
    }
}
