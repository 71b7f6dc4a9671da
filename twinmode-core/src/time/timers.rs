//! Pending-timer set for the null clock.
//!
//! Timers are keyed by `(deadline, seq)` so iteration order is exactly the
//! firing order: earliest deadline first, insertion order within a deadline.

use std::collections::{BTreeMap, HashMap};

pub(crate) type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct TimerKey {
    pub deadline: u64,
    pub seq: u64,
}

pub(crate) struct TimerQueue {
    now: u64,
    next_seq: u64,
    pending: BTreeMap<TimerKey, TimerCallback>,
    deadlines: HashMap<u64, u64>,
}

impl TimerQueue {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: start_ms,
            next_seq: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Inserts a timer and returns its sequence number, which doubles as its id.
    pub fn schedule(&mut self, delay_ms: u64, callback: TimerCallback) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now.saturating_add(delay_ms);
        self.pending.insert(TimerKey { deadline, seq }, callback);
        self.deadlines.insert(seq, deadline);
        seq
    }

    /// Removes a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, seq: u64) -> bool {
        match self.deadlines.remove(&seq) {
            Some(deadline) => self.pending.remove(&TimerKey { deadline, seq }).is_some(),
            None => false,
        }
    }

    /// Takes every timer sharing the earliest deadline, provided that deadline
    /// is not past `limit`, and moves `now` forward to it.
    pub fn pop_next_deadline(&mut self, limit: Option<u64>) -> Vec<(TimerKey, TimerCallback)> {
        let deadline = match self.pending.keys().next() {
            Some(key) if limit.map_or(true, |limit| key.deadline <= limit) => key.deadline,
            _ => return Vec::new(),
        };

        let mut due = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().deadline != deadline {
                break;
            }
            let (key, callback) = entry.remove_entry();
            self.deadlines.remove(&key.seq);
            due.push((key, callback));
        }

        self.now = self.now.max(deadline);
        due
    }

    /// Moves `now` forward. Time never goes backwards.
    pub fn advance_to(&mut self, target: u64) {
        self.now = self.now.max(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn noop() -> TimerCallback {
        Box::new(|| {})
    }

    #[test]
    fn orders_by_deadline_then_insertion() {
        let mut queue = TimerQueue::new(0);
        let late = queue.schedule(20, noop());
        let first = queue.schedule(10, noop());
        let second = queue.schedule(10, noop());

        let group: Vec<u64> = queue
            .pop_next_deadline(None)
            .into_iter()
            .map(|(key, _)| key.seq)
            .collect();
        assert_eq!(group, vec![first, second]);
        assert_eq!(queue.now(), 10);

        let group: Vec<u64> = queue
            .pop_next_deadline(None)
            .into_iter()
            .map(|(key, _)| key.seq)
            .collect();
        assert_eq!(group, vec![late]);
        assert_eq!(queue.now(), 20);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut queue = TimerQueue::new(0);
        let seq = queue.schedule(5, noop());
        assert!(queue.cancel(seq));
        assert!(!queue.cancel(seq));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn respects_limit() {
        let mut queue = TimerQueue::new(100);
        queue.schedule(50, noop());
        assert!(queue.pop_next_deadline(Some(149)).is_empty());
        assert_eq!(queue.now(), 100);
        assert_eq!(queue.pop_next_deadline(Some(150)).len(), 1);
        assert_eq!(queue.now(), 150);
    }

    #[test]
    fn popped_callbacks_are_runnable() {
        let hits = Arc::new(Mutex::new(0));
        let mut queue = TimerQueue::new(0);
        let counter = hits.clone();
        queue.schedule(1, Box::new(move || *counter.lock().unwrap() += 1));
        for (_, callback) in queue.pop_next_deadline(None) {
            callback();
        }
        assert_eq!(*hits.lock().unwrap(), 1);
    }
}
