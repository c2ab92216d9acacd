use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};

use crate::clock::{ClockCallback, ClockSource, Subscribers, SubscriptionId};
use crate::errors::{ClockError, Error};
use crate::utils::task;
use crate::utils::task::TaskHandler;

/// A real-time [`ClockSource`]: ticks at a fixed rate from a runtime task.
///
/// Timestamps are the milliseconds elapsed since the clock started.
///
/// # Example
/// ```
/// use stagecraft::clock::{ClockSource, FrameClock};
/// use stagecraft::pause;
///
/// #[stagecraft::runtime]
/// async fn main() {
///     let clock = FrameClock::new(30);
///     clock.subscribe(Box::new(|previous, now| println!("{:?} -> {}", previous, now)));
///     clock.start().unwrap();
///     pause!(100);
///     clock.stop();
/// }
/// ```
#[derive(Clone)]
pub struct FrameClock {
    fps: u16,
    subscribers: Arc<Subscribers>,
    running: Arc<AtomicBool>,
    handler: Arc<Mutex<Option<TaskHandler>>>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameClock {
    /// Creates a stopped clock ticking `fps` times per second (at least once).
    pub fn new(fps: u16) -> Self {
        Self {
            fps: fps.max(1),
            subscribers: Arc::new(Subscribers::default()),
            running: Arc::new(AtomicBool::new(false)),
            handler: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts ticking.
    ///
    /// # Errors
    /// Fails if the clock is already running, or when called outside a tokio runtime.
    pub fn start(&self) -> Result<(), Error> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ClockError::AlreadyRunning.into());
        }

        let subscribers = self.subscribers.clone();
        let running = self.running.clone();
        let period = Duration::from_secs_f64(1.0 / self.fps as f64);

        let handler = task::run(async move {
            let origin = Instant::now();
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut previous = None;
            while running.load(Ordering::SeqCst) {
                interval.tick().await;
                let now = origin.elapsed().as_secs_f64() * 1000.0;
                subscribers.dispatch(previous, now);
                previous = Some(now);
            }
        });

        match handler {
            Ok(handler) => {
                *self.handler.lock() = Some(handler);
                debug!("Clock started at {} fps", self.fps);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    /// Stops ticking: subscriptions are kept for a later start.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handler) = self.handler.lock().take() {
            handler.abort();
            debug!("Clock stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn get_fps(&self) -> u16 {
        self.fps
    }
}

impl ClockSource for FrameClock {
    fn subscribe(&self, callback: ClockCallback) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

impl Debug for FrameClock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("fps", &self.fps)
            .field("running", &self.is_running())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::pause;

    #[serial_test::serial]
    #[tokio::test]
    async fn test_frame_clock_ticks() {
        let clock = FrameClock::new(100);
        let ticks = Arc::new(AtomicUsize::new(0));
        let first = Arc::new(Mutex::new(None::<Option<f64>>));

        let ticks_clone = ticks.clone();
        let first_clone = first.clone();
        clock.subscribe(Box::new(move |previous, _| {
            first_clone.lock().get_or_insert(previous);
            ticks_clone.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(!clock.is_running());
        clock.start().unwrap();
        assert!(clock.is_running());
        pause!(200);
        clock.stop();
        assert!(!clock.is_running());

        let count = ticks.load(Ordering::SeqCst);
        assert!(count >= 5, "Ticked {} times", count);
        assert_eq!(*first.lock(), Some(None), "No previous timestamp on the first tick.");

        pause!(50);
        assert_eq!(ticks.load(Ordering::SeqCst), count, "No tick once stopped.");
    }

    #[serial_test::serial]
    #[tokio::test]
    async fn test_frame_clock_start_twice() {
        let clock = FrameClock::default();
        assert_eq!(clock.get_fps(), 60);
        clock.start().unwrap();
        let result = clock.start();
        assert_eq!(
            result.unwrap_err().to_string(),
            "Clock error: Clock is already running."
        );
        clock.stop();
        assert!(clock.start().is_ok(), "Restartable.");
        clock.stop();
    }

    #[test]
    fn test_frame_clock_debug() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.get_fps(), 1);
        clock.subscribe(Box::new(|_, _| {}));
        assert_eq!(
            format!("{:?}", clock),
            "FrameClock { fps: 1, running: false, subscribers: 1 }"
        );
    }
}
