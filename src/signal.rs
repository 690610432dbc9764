//! Versioned values and observers that notice when they change.

/// A value with a version counter that bumps on every write, even when the
/// new value equals the old one, so observers see repeated requests.
#[derive(Debug, Clone)]
pub struct Signal<T> {
    value: T,
    version: u64,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Remembers the last version of a signal it has seen.
#[derive(Debug, Clone, Default)]
pub struct Observer {
    seen: u64,
}

impl Observer {
    /// Starts out up to date with `signal`; only later writes are reported.
    pub fn following<T>(signal: &Signal<T>) -> Self {
        Self {
            seen: signal.version(),
        }
    }

    /// Returns the value if the signal was written since the last call.
    pub fn changed<'a, T>(&mut self, signal: &'a Signal<T>) -> Option<&'a T> {
        if signal.version() == self.seen {
            return None;
        }
        self.seen = signal.version();
        Some(signal.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_sees_each_write_once() {
        let mut signal = Signal::new(None);
        let mut observer = Observer::following(&signal);
        assert_eq!(observer.changed(&signal), None);

        signal.set(Some(3));
        assert_eq!(observer.changed(&signal), Some(&Some(3)));
        assert_eq!(observer.changed(&signal), None);
    }

    #[test]
    fn test_rewriting_same_value_still_notifies() {
        let mut signal = Signal::new(1);
        let mut observer = Observer::default();
        signal.set(1);
        assert_eq!(observer.changed(&signal), Some(&1));
        signal.set(1);
        assert_eq!(observer.changed(&signal), Some(&1));
    }
}
