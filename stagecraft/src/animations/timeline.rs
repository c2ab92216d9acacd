use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, trace};

use crate::actors::{Actor, Properties};
use crate::animations::{
    Descriptor, Entry, FillMode, Interpolator, Lookup, Options, Playable, Playback, Pose, Span,
    Tween,
};
use crate::errors::Error;
use crate::utils::{EventHandler, EventManager};

/// The longest elapsed time (in milliseconds) a single tick accounts for.
pub const FRAME_BUDGET: f64 = 16.6;

static TIMELINE_ID: AtomicUsize = AtomicUsize::new(1);

/// Lists all events a Timeline can emit/listen.
///
/// Callbacks receive the timeline actor: `Option<Box<dyn Actor>>`.
pub enum TimelineEvent {
    /// Triggered after each advance that drove the entries.
    OnStep,
    /// Triggered when a new pass starts.
    OnRepeat,
    /// Triggered when the timeline completes.
    OnComplete,
}

/// Convert events to string to facilitate usage with [`EventManager`].
impl From<TimelineEvent> for String {
    fn from(event: TimelineEvent) -> Self {
        let event = match event {
            TimelineEvent::OnStep => "step",
            TimelineEvent::OnRepeat => "repeat",
            TimelineEvent::OnComplete => "complete",
        };
        event.into()
    }
}

/// What a clock subscriber should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flow {
    Continue,
    /// The timeline is done with its clock: its actor has been destroyed.
    Detach,
}

/// Represents a timeline: an ordered list of [`Entry`] (poses or nested timelines) played
/// against a local time.
///
/// - Entries are either chained (sequence mode, the default) or all begin at 0.
/// - On each advance, every entry whose `(begin, span]` range contains the local time is driven:
///   poses through the [`Interpolator`], nested timelines recursively (they inherit the speed,
///   direction and layers handling of their parent).
/// - Past its total span, a timeline starts a new pass or completes, according to its
///   [`Repeat`](crate::animations::Repeat) and [`FillMode`].
///
/// # Example
/// ```
/// use stagecraft::actors::Puppet;
/// use stagecraft::animations::{Descriptor, Playable, Timeline};
///
/// let puppet = Puppet::new("box").with_property("left", 0);
/// let mut timeline = Timeline::new(puppet.clone())
///     .with_descriptor(Descriptor::new(100).with_property("left", 100));
///
/// timeline.play();
/// for _ in 0..4 {
///     timeline.advance(16.0).unwrap();
/// }
/// assert_eq!(timeline.playback().get_local_time(), 64.0);
/// ```
#[derive(Clone, Debug)]
pub struct Timeline {
    id: usize,
    playback: Playback,
    /// Placement within a parent timeline.
    begin: f64,
    /// End of the placement within a parent timeline: its own total span when unset.
    span: Option<f64>,
    entries: Vec<Entry>,
    actor: Option<Box<dyn Actor>>,
    engine: Arc<dyn Interpolator>,
    events: EventManager,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            id: TIMELINE_ID.fetch_add(1, Ordering::Relaxed),
            playback: Playback::default(),
            begin: 0.0,
            span: None,
            entries: vec![],
            actor: None,
            engine: Arc::new(Tween),
            events: Default::default(),
        }
    }
}

impl From<Box<dyn Actor>> for Timeline {
    fn from(actor: Box<dyn Actor>) -> Self {
        Self {
            actor: Some(actor),
            ..Default::default()
        }
    }
}

impl Timeline {
    /// Creates a timeline driving the given actor.
    pub fn new<A: Actor + 'static>(actor: A) -> Self {
        Self::from(Box::new(actor) as Box<dyn Actor>)
    }

    /// Applies playback options: must be called before any entry is added.
    pub fn set_options(mut self, options: Options) -> Self {
        self.playback.repeat = options.get_repeat();
        self.playback.remaining = None;
        self.playback.fill_mode = options.get_fill_mode();
        self.playback.handle_layers = options.is_handle_layers();
        self.playback.is_sequence = options.is_sequence();
        if options.is_auto_play() {
            self.play();
        }
        self
    }

    /// Sets the interpolation engine, for this timeline and the nested ones.
    pub fn set_engine<I: Interpolator + 'static>(self, engine: I) -> Self {
        self.set_shared_engine(Arc::new(engine))
    }

    fn set_shared_engine(mut self, engine: Arc<dyn Interpolator>) -> Self {
        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|entry| match entry {
                Entry::Timeline(child) => {
                    Entry::Timeline(Box::new((*child).set_shared_engine(engine.clone())))
                }
                pose => pose,
            })
            .collect();
        self.engine = engine;
        self
    }

    /// Adds the poses of a descriptor: an empty pose first when it has a delay.
    ///
    /// Percentage spans resolve against the actor duration.
    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        let reference = self.get_reference_duration();
        if let Some(delay) = descriptor.get_delay() {
            if delay.resolve(reference) != 0.0 {
                self.add_animation(Pose::default(), delay, reference);
            }
        }
        let duration = descriptor.get_duration();
        self.add_animation(Pose::from(descriptor), duration, reference);
        self
    }

    pub fn with_descriptors<I: IntoIterator<Item = Descriptor>>(self, descriptors: I) -> Self {
        descriptors
            .into_iter()
            .fold(self, |timeline, descriptor| timeline.with_descriptor(descriptor))
    }

    /// Adds a nested timeline.
    pub fn with_scene(mut self, child: Timeline) -> Self {
        self.add_scene(child);
        self
    }

    /// Registers a callback for a [`TimelineEvent`].
    pub fn on<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Send + Sync + Clone,
        F: FnMut(T) + Send + 'static,
    {
        self.events.on(event, callback)
    }

    // ########################################
    // Composition.

    /// Appends an entry lasting `span`: a percentage span is taken from `duration`.
    ///
    /// In sequence mode the entry begins where the last one ends. A nested timeline lasts its
    /// own total span (see [`Timeline::add_scene`]).
    pub fn add_animation<E: Into<Entry>, S: Into<Span>>(&mut self, entry: E, span: S, duration: f64) {
        match entry.into() {
            Entry::Timeline(child) => self.add_scene(*child),
            Entry::Pose(mut pose) => {
                let mut span = span.into().resolve(duration);
                let mut begin = 0.0;
                if self.playback.is_sequence {
                    if let Some(last) = self.entries.last() {
                        begin = last.get_span();
                        span += begin;
                    }
                }
                pose.place(begin, span);
                self.entries.push(Entry::Pose(pose));
                self.playback.total_span = span;
            }
        }
    }

    /// Appends a nested timeline: in sequence mode it is placed after the last entry.
    pub fn add_scene(&mut self, mut child: Timeline) {
        let mut span = child.playback.total_span;
        if self.playback.is_sequence {
            if let Some(last) = self.entries.last() {
                let previous = last.get_span();
                span += previous;
                child.begin = previous;
                child.span = Some(span);
            }
        }
        self.entries.push(Entry::Timeline(Box::new(child)));
        self.playback.total_span = span;
    }

    /// Returns the entry at `index`: any negative index gives a [`Lookup::Sentinel`].
    pub fn get_animation(&self, index: isize) -> Option<Lookup<'_>> {
        match usize::try_from(index) {
            Err(_) => Some(Lookup::Sentinel),
            Ok(index) => self.entries.get(index).map(Lookup::Entry),
        }
    }

    /// Injects an animation starting at the current local time.
    ///
    /// The pose running now is clipped (it keeps the values reached so far), every later entry is
    /// dropped and the new animation is appended. Timelines holding nested timelines forward the
    /// injection to each of them, at their own local time.
    pub fn set_animation(&mut self, descriptor: Descriptor) {
        let duration = descriptor
            .get_duration()
            .resolve(self.get_reference_duration());
        let pose = Pose::from(descriptor);
        self.inject(&pose, duration);
    }

    fn inject(&mut self, pose: &Pose, duration: f64) {
        let has_children = self
            .entries
            .iter()
            .any(|entry| matches!(entry, Entry::Timeline(_)));

        if has_children {
            for entry in self.entries.iter_mut() {
                if let Entry::Timeline(child) = entry {
                    child.inject(pose, duration);
                }
            }
        } else {
            let time = self.playback.local_time;
            let found = self
                .entries
                .iter()
                .position(|entry| entry.get_begin() <= time && time <= entry.get_span());
            if let Some(index) = found {
                if let Entry::Pose(current) = &mut self.entries[index] {
                    current.clip(time);
                }
                self.entries.truncate(index + 1);

                let mut injected = pose.clone();
                injected.place(time, time + duration);
                self.entries.push(Entry::Pose(injected));
                debug!(
                    "Timeline #{} injected an animation at {:.1}ms for {:.1}ms",
                    self.id, time, duration
                );
            }
        }
        self.refresh_spans();
    }

    /// Recomputes nested placements and the total span after the entries changed.
    fn refresh_spans(&mut self) {
        let is_sequence = self.playback.is_sequence;
        let mut previous: Option<f64> = None;
        for entry in self.entries.iter_mut() {
            if let Entry::Timeline(child) = entry {
                let own = child.playback.total_span;
                match (is_sequence, previous) {
                    (true, Some(end)) => {
                        child.begin = end;
                        child.span = Some(end + own);
                    }
                    _ => {
                        if child.span.is_some() {
                            child.span = Some(child.begin + own);
                        }
                    }
                }
            }
            previous = Some(entry.get_span());
        }
        if let Some(end) = previous {
            self.playback.total_span = end;
        }
    }

    // ########################################
    // Per-tick resolution.

    /// Handles a clock tick: `previous` is `None` on the first one.
    ///
    /// The elapsed time is capped to [`FRAME_BUDGET`].
    pub fn tick(&mut self, previous: Option<f64>, now: f64) -> Result<Flow, Error> {
        if self.playback.animating {
            let elapsed = match previous {
                Some(previous) => (now - previous).clamp(0.0, FRAME_BUDGET),
                None => 0.0,
            };
            self.advance(elapsed)?;
        } else if self.actor.as_ref().is_some_and(|actor| actor.is_destroyed()) {
            return Ok(Flow::Detach);
        }
        Ok(Flow::Continue)
    }

    /// Moves the timeline by `elapsed` milliseconds and drives whatever is active.
    pub fn advance(&mut self, elapsed: f64) -> Result<(), Error> {
        if !self.is_active() {
            return Ok(());
        }

        let previous = self.playback.local_time;
        let time = self.playback.forward(elapsed);
        if !time.is_finite() {
            return Ok(());
        }
        trace!("Timeline #{} at {:.1}ms", self.id, time);

        if time <= self.playback.total_span {
            self.drive(previous, time)?;
            self.events.emit(TimelineEvent::OnStep, self.actor.clone());
        } else {
            self.settle(previous, time)?;
            self.overrun()?;
        }
        Ok(())
    }

    /// Indicates if the timeline can advance: a timeline without actor always can.
    pub fn is_active(&self) -> bool {
        match &self.actor {
            Some(actor) => actor.is_generated(),
            None => true,
        }
    }

    fn drive(&mut self, previous: f64, time: f64) -> Result<(), Error> {
        let Timeline {
            playback,
            entries,
            actor,
            engine,
            ..
        } = self;

        for entry in entries.iter_mut() {
            match entry {
                Entry::Timeline(child) => {
                    let slice = child.overlap(previous, time);
                    if slice > 0.0 {
                        child.inherit(playback);
                        child.advance(slice)?;
                    }
                }
                Entry::Pose(pose) => {
                    if pose.is_active_at(time) {
                        Self::update(engine, actor, playback, pose, time)?;
                    } else if previous < pose.get_span() && pose.get_span() < time {
                        // A frame went past the end of the pose.
                        let end = pose.get_span();
                        Self::update(engine, actor, playback, pose, end)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Drives the entries whose end got skipped by a last frame running past the total span.
    fn settle(&mut self, previous: f64, time: f64) -> Result<(), Error> {
        let Timeline {
            playback,
            entries,
            actor,
            engine,
            ..
        } = self;

        for entry in entries.iter_mut() {
            match entry {
                Entry::Timeline(child) => {
                    // Lets a nested timeline reach (and settle) its own end.
                    let slice = child.overlap(previous, time);
                    if slice > 0.0 {
                        child.inherit(playback);
                        child.advance(slice)?;
                    }
                }
                Entry::Pose(pose) => {
                    if previous < pose.get_span() && pose.get_span() < time {
                        let end = pose.get_span();
                        Self::update(engine, actor, playback, pose, end)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn update(
        engine: &Arc<dyn Interpolator>,
        actor: &mut Option<Box<dyn Actor>>,
        playback: &mut Playback,
        pose: &mut Pose,
        time: f64,
    ) -> Result<(), Error> {
        let actor = match actor.as_mut() {
            Some(actor) => actor,
            None => {
                trace!("No actor to drive {}", pose);
                return Ok(());
            }
        };

        if !pose.is_initialized() {
            engine.init(&**actor, pose);
            // The baseline doubles as the initialization marker.
            if !pose.is_initialized() {
                pose.set_start_state(Properties::new());
            }
            if playback.handle_layers {
                playback.layered = true;
            }
        }

        let since = (time - pose.get_begin()).max(0.0);
        let duration = pose.get_duration();
        let ratio = match duration != 0.0 && since <= duration {
            true => since / duration,
            false => 1.0,
        };
        engine.step(&mut **actor, pose, ratio as f32, duration)
    }

    fn overrun(&mut self) -> Result<(), Error> {
        if self.playback.finished {
            return Ok(());
        }

        match self.playback.next_pass() {
            true => {
                self.playback.local_time = 0.0;
                self.rewind_children();
                self.restore_initial_state()?;
                debug!("Timeline #{} starts a new pass", self.id);
                self.events.emit(TimelineEvent::OnRepeat, self.actor.clone());
            }
            false => {
                self.playback.local_time = self.playback.total_span;
                if self.playback.fill_mode == FillMode::Backwards {
                    self.restore_initial_state()?;
                }
                self.halt();
            }
        }
        Ok(())
    }

    fn halt(&mut self) {
        self.playback.speed = 0;
        if self.playback.handle_layers && self.playback.layered {
            if let Some(actor) = self.actor.as_mut() {
                self.engine.halt(&mut **actor);
            }
            self.playback.layered = false;
        }
        self.playback.animating = false;
        self.playback.finished = true;
        debug!("Timeline #{} completed", self.id);
        self.events
            .emit(TimelineEvent::OnComplete, self.actor.clone());
    }

    fn restore_initial_state(&mut self) -> Result<(), Error> {
        if let Some(actor) = self.actor.as_mut() {
            let initial = actor.get_initial_state();
            if !initial.is_empty() {
                actor.add_styles(&initial)?;
            }
        }
        Ok(())
    }

    fn inherit(&mut self, parent: &Playback) {
        self.playback.speed = parent.speed;
        self.playback.direction = parent.direction;
        self.playback.handle_layers = parent.handle_layers;
    }

    /// How much of the parent frame `previous -> time` lies within this timeline's slot.
    fn overlap(&self, previous: f64, time: f64) -> f64 {
        let (from, to) = match previous <= time {
            true => (previous, time),
            false => (time, previous),
        };
        to.min(self.get_span()) - from.max(self.begin)
    }

    fn rewind_children(&mut self) {
        for entry in self.entries.iter_mut() {
            if let Entry::Timeline(child) = entry {
                child.rewind();
            }
        }
    }

    /// The duration percentage spans resolve against.
    fn get_reference_duration(&self) -> f64 {
        self.actor
            .as_ref()
            .map_or(0.0, |actor| actor.get_duration())
    }

    // ########################################
    // Setters and Getters.

    pub fn get_id(&self) -> usize {
        self.id
    }

    /// Placement start within the parent timeline.
    pub fn get_begin(&self) -> f64 {
        self.begin
    }

    /// Placement end within the parent timeline.
    pub fn get_span(&self) -> f64 {
        self.span
            .unwrap_or(self.begin + self.playback.total_span)
    }

    pub fn get_entries(&self) -> &Vec<Entry> {
        &self.entries
    }

    pub fn get_actor(&self) -> Option<&dyn Actor> {
        self.actor.as_deref()
    }

    pub fn get_engine(&self) -> Arc<dyn Interpolator> {
        self.engine.clone()
    }

    pub fn get_events(&self) -> &EventManager {
        &self.events
    }
}

impl Playable for Timeline {
    fn playback(&self) -> &Playback {
        &self.playback
    }

    fn playback_mut(&mut self) -> &mut Playback {
        &mut self.playback
    }

    fn rewind(&mut self) {
        self.playback.reset();
        self.rewind_children();
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Timeline #{} ({} entries) {}",
            self.id,
            self.entries.len(),
            self.playback
        )?;
        if let Some(actor) = &self.actor {
            write!(f, " for {}", actor)?;
        }
        Ok(())
    }
}
