//! Defines the time sources timelines are driven by.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

pub use crate::clock::frame::FrameClock;
pub use crate::clock::manual::ManualClock;

mod frame;
mod manual;

/// Identifies a subscription to a [`ClockSource`].
pub type SubscriptionId = usize;

/// A tick callback: receives the previous timestamp (`None` on the first tick) and the current
/// one, both in milliseconds.
pub type ClockCallback = Box<dyn FnMut(Option<f64>, f64) + Send>;

/// Represents a source of ticks.
pub trait ClockSource: Send + Sync {
    fn subscribe(&self, callback: ClockCallback) -> SubscriptionId;
    /// Removes a subscription: returns `false` if it was unknown. A callback may unsubscribe
    /// itself (or any other) while being called.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// A registry of tick callbacks, shared by the clock implementations.
#[derive(Default)]
pub struct Subscribers {
    state: Mutex<SubscribersState>,
    /// Held for a whole dispatch: ticks are delivered one at a time.
    dispatching: Mutex<()>,
    next_id: AtomicUsize,
}

#[derive(Default)]
struct SubscribersState {
    active: Vec<(SubscriptionId, ClockCallback)>,
    /// Subscriptions taken out for a dispatch.
    in_flight: Vec<SubscriptionId>,
    /// Subscriptions removed during a dispatch.
    cancelled: HashSet<SubscriptionId>,
}

impl Subscribers {
    pub fn subscribe(&self, callback: ClockCallback) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.state.lock().active.push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        if let Some(position) = state.active.iter().position(|(known, _)| *known == id) {
            state.active.remove(position);
            return true;
        }
        match state.in_flight.contains(&id) {
            true => state.cancelled.insert(id),
            false => false,
        }
    }

    /// Calls every subscriber in subscription order.
    ///
    /// The callbacks run outside of the registry lock: they are free to subscribe or unsubscribe,
    /// but must not dispatch on the same registry. Concurrent dispatches run one after the other.
    pub fn dispatch(&self, previous: Option<f64>, now: f64) {
        let _dispatching = self.dispatching.lock();
        let mut callbacks = {
            let mut state = self.state.lock();
            let callbacks = std::mem::take(&mut state.active);
            state.in_flight = callbacks.iter().map(|(id, _)| *id).collect();
            callbacks
        };

        for (id, callback) in callbacks.iter_mut() {
            if self.state.lock().cancelled.contains(id) {
                continue;
            }
            callback(previous, now);
        }

        let mut state = self.state.lock();
        let cancelled = std::mem::take(&mut state.cancelled);
        state.in_flight.clear();
        callbacks.retain(|(id, _)| !cancelled.contains(id));
        // Subscribed while dispatching: after the others.
        callbacks.append(&mut state.active);
        state.active = callbacks;
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.active.len() + state.in_flight.len() - state.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_dispatch_in_order() {
        let subscribers = Subscribers::default();
        let trace = Arc::new(Mutex::new(Vec::<(usize, Option<f64>, f64)>::new()));

        for index in 0..3 {
            let trace = trace.clone();
            subscribers.subscribe(Box::new(move |previous, now| {
                trace.lock().push((index, previous, now));
            }));
        }
        assert_eq!(subscribers.len(), 3);

        subscribers.dispatch(None, 10.0);
        subscribers.dispatch(Some(10.0), 26.0);
        assert_eq!(
            *trace.lock(),
            vec![
                (0, None, 10.0),
                (1, None, 10.0),
                (2, None, 10.0),
                (0, Some(10.0), 26.0),
                (1, Some(10.0), 26.0),
                (2, Some(10.0), 26.0),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let subscribers = Subscribers::default();
        let id = subscribers.subscribe(Box::new(|_, _| {}));
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id), "Already gone.");
        assert!(subscribers.is_empty());
    }

    #[test]
    fn test_unsubscribe_while_dispatching() {
        let subscribers = Arc::new(Subscribers::default());
        let calls = Arc::new(Mutex::new(Vec::<&str>::new()));

        // The first subscriber cancels itself and the next one.
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));
        let weak = Arc::downgrade(&subscribers);
        let own_id_clone = own_id.clone();
        let calls_clone = calls.clone();
        let first = subscribers.subscribe(Box::new(move |_, _| {
            calls_clone.lock().push("first");
            if let (Some(subscribers), Some(id)) = (weak.upgrade(), *own_id_clone.lock()) {
                assert!(subscribers.unsubscribe(id));
                assert!(subscribers.unsubscribe(id + 1));
            }
        }));
        *own_id.lock() = Some(first);

        let calls_clone = calls.clone();
        subscribers.subscribe(Box::new(move |_, _| calls_clone.lock().push("second")));
        let calls_clone = calls.clone();
        subscribers.subscribe(Box::new(move |_, _| calls_clone.lock().push("third")));

        subscribers.dispatch(None, 0.0);
        subscribers.dispatch(Some(0.0), 16.0);
        assert_eq!(*calls.lock(), vec!["first", "third", "third"]);
        assert_eq!(subscribers.len(), 1);
    }

    #[test]
    fn test_concurrent_dispatches() {
        let subscribers = Arc::new(Subscribers::default());
        let weak = Arc::downgrade(&subscribers);
        let calls = Arc::new(Mutex::new(0u8));

        let calls_clone = calls.clone();
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));
        let own_id_clone = own_id.clone();
        let id = subscribers.subscribe(Box::new(move |_, _| {
            *calls_clone.lock() += 1;
            std::thread::sleep(std::time::Duration::from_millis(20));
            if let (Some(subscribers), Some(id)) = (weak.upgrade(), *own_id_clone.lock()) {
                subscribers.unsubscribe(id);
            }
        }));
        *own_id.lock() = Some(id);

        let threads: Vec<_> = (0..4)
            .map(|index| {
                let subscribers = subscribers.clone();
                std::thread::spawn(move || subscribers.dispatch(None, index as f64))
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(*calls.lock(), 1, "Unsubscribed during the first dispatch.");
        assert!(subscribers.is_empty());
    }

    #[test]
    fn test_subscribe_while_dispatching() {
        let subscribers = Arc::new(Subscribers::default());
        let weak = Arc::downgrade(&subscribers);
        let count = Arc::new(Mutex::new(0u8));

        let count_clone = count.clone();
        subscribers.subscribe(Box::new(move |_, _| {
            if let Some(subscribers) = weak.upgrade() {
                let count = count_clone.clone();
                subscribers.subscribe(Box::new(move |_, _| *count.lock() += 1));
            }
        }));

        subscribers.dispatch(None, 0.0);
        assert_eq!(*count.lock(), 0, "New subscribers wait for the next tick.");
        assert_eq!(subscribers.len(), 2);

        subscribers.dispatch(Some(0.0), 16.0);
        assert_eq!(*count.lock(), 1);
        assert_eq!(subscribers.len(), 3);
    }
}
