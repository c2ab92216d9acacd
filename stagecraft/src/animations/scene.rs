use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::{debug, error};
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::animations::{Descriptor, Entry, Flow, Playable, Span, Timeline};
use crate::clock::{ClockSource, SubscriptionId};
use crate::utils::EventHandler;

/// A root [`Timeline`] subscribed to a [`ClockSource`].
///
/// The scene is a shared handle: clones control the same timeline. It subscribes once, when
/// created, and unsubscribes once, when its timeline is no longer animating and its actor has
/// been destroyed (or when [`Scene::detach`] is called).
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use stagecraft::actors::{Actor, Puppet};
/// use stagecraft::animations::{Descriptor, Scene, Timeline};
/// use stagecraft::clock::ManualClock;
///
/// let clock = Arc::new(ManualClock::default());
/// let puppet = Puppet::new("box").with_property("left", 0);
/// let scene = Scene::new(
///     clock.clone(),
///     Timeline::new(puppet.clone()).with_descriptor(Descriptor::new(100).with_property("left", 100)),
/// );
///
/// scene.play();
/// for _ in 0..8 {
///     clock.advance(16.0);
/// }
/// assert_eq!(puppet.get_property("left").as_integer(), 100);
/// ```
#[derive(Clone)]
pub struct Scene {
    timeline: Arc<RwLock<Timeline>>,
    subscription: Arc<Mutex<Option<SubscriptionId>>>,
    clock: Arc<dyn ClockSource>,
}

impl Scene {
    /// Subscribes the timeline to the clock.
    pub fn new(clock: Arc<dyn ClockSource>, timeline: Timeline) -> Self {
        let scene = Self {
            timeline: Arc::new(RwLock::new(timeline)),
            subscription: Arc::new(Mutex::new(None)),
            clock,
        };
        scene.attach();
        scene
    }

    fn attach(&self) {
        let mut slot = self.subscription.lock();

        let timeline = self.timeline.clone();
        let subscription = self.subscription.clone();
        let clock = Arc::downgrade(&self.clock);

        let id = self.clock.subscribe(Box::new(move |previous, now| {
            let flow = timeline.write().tick(previous, now);
            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Detach) => {
                    if let (Some(id), Some(clock)) = (subscription.lock().take(), clock.upgrade()) {
                        clock.unsubscribe(id);
                        debug!("Timeline #{} detached from its clock", timeline.read().get_id());
                    }
                }
                Err(err) => error!("Timeline tick failed: {}", err),
            }
        }));
        *slot = Some(id);
        debug!(
            "Timeline #{} subscribed to its clock",
            self.timeline.read().get_id()
        );
    }

    /// Unsubscribes from the clock (no-op when already detached).
    pub fn detach(&self) -> bool {
        match self.subscription.lock().take() {
            Some(id) => self.clock.unsubscribe(id),
            None => false,
        }
    }

    /// Indicates if the scene still receives clock ticks.
    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    // ########################################
    // Playback.

    pub fn play(&self) -> &Self {
        self.timeline.write().play();
        self
    }

    pub fn resume(&self) -> &Self {
        self.timeline.write().resume();
        self
    }

    pub fn pause(&self) -> &Self {
        self.timeline.write().pause();
        self
    }

    pub fn reverse(&self) -> &Self {
        self.timeline.write().reverse();
        self
    }

    pub fn stop(&self) -> &Self {
        self.timeline.write().stop();
        self
    }

    pub fn seek(&self, time: f64) -> &Self {
        self.timeline.write().seek(time);
        self
    }

    pub fn seek_animate(&self, delta: f64) -> &Self {
        self.timeline.write().seek_animate(delta);
        self
    }

    // ########################################
    // Composition.

    /// See [`Timeline::set_animation`].
    pub fn set_animation(&self, descriptor: Descriptor) {
        self.timeline.write().set_animation(descriptor);
    }

    /// See [`Timeline::add_animation`].
    pub fn add_animation<E: Into<Entry>, S: Into<Span>>(&self, entry: E, span: S, duration: f64) {
        self.timeline.write().add_animation(entry, span, duration);
    }

    /// See [`Timeline::add_scene`].
    pub fn add_scene(&self, child: Timeline) {
        self.timeline.write().add_scene(child);
    }

    /// Registers a callback for a [`TimelineEvent`](crate::animations::TimelineEvent).
    ///
    /// Callbacks run while the timeline is locked: they must not use the scene.
    pub fn on<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) + Send + 'static,
    {
        self.timeline.read().on(event, callback)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Timeline> {
        self.timeline.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Timeline> {
        self.timeline.write()
    }
}

impl Display for Scene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scene {}", self.timeline.read())
    }
}
