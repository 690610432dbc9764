//! Keyed one-shot timers polled from a component's `tick`.

/// Pending deadlines, at most one per key. Scheduling a key that is already
/// pending replaces its deadline, which gives debounce behavior for free.
#[derive(Debug)]
pub struct TimerQueue<K> {
    pending: Vec<(K, f64)>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `key` once `delay` seconds after `now`.
    pub fn schedule(&mut self, key: K, now: f64, delay: f64) {
        self.cancel(key);
        self.pending.push((key, now + delay));
    }

    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != key);
        self.pending.len() != before
    }

    /// Removes and returns every key whose deadline is at or before `now`, earliest first.
    pub fn due(&mut self, now: f64) -> Vec<K> {
        let mut fired: Vec<(K, f64)> = Vec::new();
        self.pending.retain(|&(key, deadline)| {
            if deadline <= now {
                fired.push((key, deadline));
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| a.1.total_cmp(&b.1));
        fired.into_iter().map(|(key, _)| key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Key {
        A,
        B,
    }

    #[test]
    fn test_due_returns_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(Key::A, 0.0, 0.3);
        timers.schedule(Key::B, 0.0, 0.1);

        assert!(timers.due(0.05).is_empty());
        assert_eq!(timers.due(0.5), vec![Key::B, Key::A]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_debounces() {
        let mut timers = TimerQueue::new();
        timers.schedule(Key::A, 0.0, 0.15);
        timers.schedule(Key::A, 0.1, 0.15);

        assert!(timers.due(0.2).is_empty());
        assert_eq!(timers.due(0.25), vec![Key::A]);
    }

    #[test]
    fn test_cancel_and_clear() {
        let mut timers = TimerQueue::new();
        timers.schedule(Key::A, 0.0, 1.0);
        timers.schedule(Key::B, 0.0, 1.0);

        assert!(timers.cancel(Key::A));
        assert!(!timers.cancel(Key::A));
        assert_eq!(timers.due(1.0), vec![Key::B]);

        timers.clear();
        assert!(timers.due(10.0).is_empty());
    }
}
