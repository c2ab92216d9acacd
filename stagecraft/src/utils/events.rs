//! Defines Stagecraft event manager system.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

type SyncedCallbackMap = Mutex<HashMap<String, Vec<CallbackWrapper>>>;
pub type EventHandler = usize;

/// A string-keyed registry of typed callbacks.
///
/// Callbacks run synchronously, in registration order, on the thread that emits the event.
/// Timelines emit from inside their tick: a callback must therefore not try to lock the
/// [`Scene`](crate::animations::Scene) that emitted it.
#[derive(Clone, Default)]
pub struct EventManager {
    callbacks: Arc<SyncedCallbackMap>,
    next_id: Arc<AtomicUsize>,
}

struct CallbackWrapper {
    id: EventHandler,
    callback: Box<dyn FnMut(Arc<dyn Any + Send + Sync>) + Send>,
}

impl EventManager {
    /// Registers an event handler for a specific event name.
    ///
    /// # Parameters
    /// * `event` - The event name (any type that matches an `Into<String>`)
    /// * `callback` - A callback that accepts a single parameter. Several values can be
    ///   passed by turning them into a tuple.
    ///
    /// # Return
    /// Returns an `EventHandler` that can be used by the `unregister()` method.
    ///
    /// # Errors
    /// A callback whose parameter type does not match the emitted payload type is skipped
    /// (with a warning).
    ///
    /// # Example
    ///
    /// ```
    /// use stagecraft::utils::EventManager;
    ///
    /// let events: EventManager = Default::default();
    /// events.on("complete", |name: String| println!("{} is done", name));
    /// events.emit("complete", String::from("intro"));
    /// ```
    pub fn on<S, F, T>(&self, event: S, mut callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) + Send + 'static,
    {
        let event_name = event.into();
        let callback_event = event_name.clone();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let boxed_callback = Box::new(move |arg: Arc<dyn Any + Send + Sync>| {
            match arg.downcast::<T>() {
                Ok(arg) => (callback)((*arg).clone()),
                Err(_) => log::warn!(
                    "The callback for event '{}' could not be called because parameter does not match",
                    callback_event
                ),
            }
        });

        self.callbacks
            .lock()
            .entry(event_name)
            .or_default()
            .push(CallbackWrapper {
                id,
                callback: boxed_callback,
            });

        id
    }

    /// Invokes all event handlers registered for a specific event name whose declared
    /// parameter type matches the payload.
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static + Send + Sync,
    {
        let payload_any: Arc<dyn Any + Send + Sync> = Arc::new(payload);
        if let Some(callbacks) = self.callbacks.lock().get_mut(&event.into()) {
            for wrapper in callbacks.iter_mut() {
                (wrapper.callback)(payload_any.clone());
            }
        }
    }

    /// Unregisters a given handler if found.
    pub fn unregister(&self, handler: EventHandler) {
        self.callbacks
            .lock()
            .values_mut()
            .for_each(|v| v.retain(|cb| cb.id != handler));
    }

    /// Counts the handlers registered for an event.
    pub fn count<S: Into<String>>(&self, event: S) -> usize {
        self.callbacks
            .lock()
            .get(&event.into())
            .map_or(0, |callbacks| callbacks.len())
    }
}

impl Debug for EventManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let callbacks = self.callbacks.lock();
        f.debug_struct("EventManager")
            .field("events", &callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU8};

    use super::*;

    #[test]
    fn test_register_and_emit_event() {
        let events: EventManager = Default::default();
        let payload = Arc::new(AtomicBool::new(false));

        events.on("register", |flag: Arc<AtomicBool>| {
            flag.store(true, Ordering::SeqCst);
        });
        events.emit("register", payload.clone());

        assert!(
            payload.load(Ordering::SeqCst),
            "The flag is set synchronously by the emit."
        );
    }

    #[test]
    fn test_unregister_event_handler() {
        let events: EventManager = Default::default();
        let flag = Arc::new(AtomicBool::new(false));

        let handler = events.on("unregister", |flag: Arc<AtomicBool>| {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(events.count("unregister"), 1);

        events.unregister(handler);
        events.emit("unregister", flag.clone());

        assert_eq!(events.count("unregister"), 0);
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_multiple_handlers_in_order() {
        let events: EventManager = Default::default();
        let trace = Arc::new(Mutex::new(Vec::<u8>::new()));

        events.on("multiple", |trace: Arc<Mutex<Vec<u8>>>| trace.lock().push(1));
        events.on("multiple", |trace: Arc<Mutex<Vec<u8>>>| trace.lock().push(2));
        events.on("multiple", |(_, trace): (u8, Arc<Mutex<Vec<u8>>>)| {
            trace.lock().push(3)
        });

        events.emit("multiple", trace.clone());
        assert_eq!(*trace.lock(), vec![1, 2], "Mismatching handler is skipped.");
    }

    #[test]
    fn test_event_with_complex_payload() {
        let events: EventManager = Default::default();
        let flag = Arc::new(AtomicU8::new(0));

        events.on(
            "payload",
            |(number1, number2, container): (u8, u8, Arc<AtomicU8>)| {
                container.store(number1 + number2, Ordering::SeqCst);
            },
        );
        events.emit("payload", (42u8, 69u8, flag.clone()));

        assert_eq!(flag.load(Ordering::SeqCst), 111);
    }

    #[test]
    fn test_no_handlers_for_event() {
        let events: EventManager = Default::default();
        events.emit("no_event", ());
        assert_eq!(events.count("no_event"), 0);
        assert_eq!(format!("{:?}", events), "EventManager { events: [] }");
    }
}
