use parking_lot::Mutex;

use crate::clock::{ClockCallback, ClockSource, Subscribers, SubscriptionId};

/// A deterministic [`ClockSource`]: ticks only when told to.
///
/// # Example
/// ```
/// use stagecraft::clock::{ClockSource, ManualClock};
///
/// let clock = ManualClock::default();
/// clock.subscribe(Box::new(|previous, now| println!("{:?} -> {}", previous, now)));
/// clock.advance(16.0); // None -> 16
/// clock.advance(16.0); // Some(16) -> 32
/// ```
#[derive(Default)]
pub struct ManualClock {
    subscribers: Subscribers,
    now: Mutex<Option<f64>>,
}

impl ManualClock {
    /// Ticks `delta` milliseconds after the last tick (or after 0 for the first one).
    pub fn advance(&self, delta: f64) {
        let timestamp = self.now.lock().unwrap_or(0.0) + delta;
        self.tick_at(timestamp);
    }

    /// Ticks at the given timestamp.
    pub fn tick_at(&self, timestamp: f64) {
        let previous = self.now.lock().replace(timestamp);
        self.subscribers.dispatch(previous, timestamp);
    }

    /// The timestamp of the last tick.
    pub fn get_time(&self) -> Option<f64> {
        *self.now.lock()
    }

    pub fn count_subscribers(&self) -> usize {
        self.subscribers.len()
    }
}

impl ClockSource for ManualClock {
    fn subscribe(&self, callback: ClockCallback) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::default();
        let trace = Arc::new(Mutex::new(Vec::<(Option<f64>, f64)>::new()));
        let trace_clone = trace.clone();
        let id = clock.subscribe(Box::new(move |previous, now| {
            trace_clone.lock().push((previous, now))
        }));
        assert_eq!(clock.get_time(), None);

        clock.advance(10.0);
        clock.advance(16.0);
        clock.tick_at(100.0);
        assert_eq!(clock.get_time(), Some(100.0));
        assert_eq!(
            *trace.lock(),
            vec![(None, 10.0), (Some(10.0), 26.0), (Some(26.0), 100.0)]
        );

        assert_eq!(clock.count_subscribers(), 1);
        assert!(clock.unsubscribe(id));
        clock.advance(16.0);
        assert_eq!(trace.lock().len(), 3);
    }
}
