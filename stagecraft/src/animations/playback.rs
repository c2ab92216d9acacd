use std::fmt::{Display, Formatter};

/// How many times a timeline plays its entries.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Repeat {
    /// A single pass.
    #[default]
    Once,
    /// Loops until stopped.
    Forever,
    /// A given number of passes (0 is handled as a single pass).
    Count(u32),
}

impl Repeat {
    /// The number of passes: `None` when unbounded.
    pub fn passes(&self) -> Option<u32> {
        match self {
            Repeat::Once => Some(1),
            Repeat::Forever => None,
            Repeat::Count(count) => Some((*count).max(1)),
        }
    }
}

impl From<bool> for Repeat {
    fn from(value: bool) -> Self {
        match value {
            true => Repeat::Forever,
            false => Repeat::Once,
        }
    }
}

impl From<u32> for Repeat {
    fn from(value: u32) -> Self {
        Repeat::Count(value)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Flag(bool),
    Count(u32),
}

#[cfg(feature = "serde")]
impl serde::Serialize for Repeat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Repeat::Once => RepeatRepr::Flag(false),
            Repeat::Forever => RepeatRepr::Flag(true),
            Repeat::Count(count) => RepeatRepr::Count(*count),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Repeat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RepeatRepr::deserialize(deserializer)? {
            RepeatRepr::Flag(flag) => Repeat::from(flag),
            RepeatRepr::Count(count) => Repeat::from(count),
        })
    }
}

/// What happens to the actor when a timeline completes.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum FillMode {
    /// The actor initial snapshot is reapplied.
    Backwards,
    /// The actor keeps its last computed state.
    Forwards,
    /// Same as forwards.
    #[default]
    Default,
    /// Same as forwards.
    None,
}

/// The playback state of a timeline.
///
/// Local time moves by `elapsed * speed * direction` on each advance: `pause()` zeroes the
/// direction and leaves the speed untouched, `seek_animate()` plays with the speed only.
#[derive(Clone, Debug)]
pub struct Playback {
    pub(crate) local_time: f64,
    pub(crate) total_span: f64,
    pub(crate) speed: i8,
    pub(crate) direction: i8,
    pub(crate) repeat: Repeat,
    /// Passes left, armed on the first overrun.
    pub(crate) remaining: Option<u32>,
    pub(crate) fill_mode: FillMode,
    pub(crate) handle_layers: bool,
    /// Raised when a pose got initialized while layers are handled.
    pub(crate) layered: bool,
    pub(crate) is_sequence: bool,
    pub(crate) animating: bool,
    pub(crate) seek_target: Option<f64>,
    /// Raised on completion, until rewound.
    pub(crate) finished: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            local_time: 0.0,
            total_span: 0.0,
            speed: 0,
            direction: 0,
            repeat: Repeat::default(),
            remaining: None,
            fill_mode: FillMode::default(),
            handle_layers: false,
            layered: false,
            is_sequence: true,
            animating: false,
            seek_target: None,
            finished: false,
        }
    }
}

impl Playback {
    /// Moves the local time by the given elapsed milliseconds and returns it.
    ///
    /// A pending animated seek stops the motion exactly on its target once crossed. The local
    /// time never goes below 0.
    pub(crate) fn forward(&mut self, elapsed: f64) -> f64 {
        self.local_time += elapsed * self.speed as f64 * self.direction as f64;

        if let Some(target) = self.seek_target {
            if (target - self.local_time) * (self.speed as f64) < 0.0 {
                self.local_time = target;
                self.seek_target = None;
                self.speed = 0;
            }
        }

        if self.local_time < 0.0 {
            self.local_time = 0.0;
        }
        self.local_time
    }

    /// Consumes a pass and tells if another one should start.
    pub(crate) fn next_pass(&mut self) -> bool {
        match self.repeat.passes() {
            None => true,
            Some(passes) => {
                let left = self.remaining.unwrap_or(passes).saturating_sub(1);
                self.remaining = Some(left);
                left > 0
            }
        }
    }

    /// Returns to the beginning: local time, pass counter, pending seek and completion.
    pub(crate) fn reset(&mut self) {
        self.local_time = 0.0;
        self.remaining = None;
        self.seek_target = None;
        self.finished = false;
    }

    pub fn get_local_time(&self) -> f64 {
        self.local_time
    }

    /// The span of the last entry.
    pub fn get_total_span(&self) -> f64 {
        self.total_span
    }

    pub fn get_speed(&self) -> i8 {
        self.speed
    }

    pub fn get_direction(&self) -> i8 {
        self.direction
    }

    pub fn get_repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn get_fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn is_handle_layers(&self) -> bool {
        self.handle_layers
    }

    pub fn is_layered(&self) -> bool {
        self.layered
    }

    pub fn is_sequence(&self) -> bool {
        self.is_sequence
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// The target of the pending animated seek, if any.
    pub fn get_seek_target(&self) -> Option<f64> {
        self.seek_target
    }

    /// Indicates if the timeline completed (and was not rewound since).
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Display for Playback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1}/{:.1}ms [speed={}, direction={}, repeat={:?}, animating={}]",
            self.local_time,
            self.total_span,
            self.speed,
            self.direction,
            self.repeat,
            self.animating
        )
    }
}

/// Playback controls, provided for anything embedding a [`Playback`] record.
pub trait Playable: Sized {
    fn playback(&self) -> &Playback;
    fn playback_mut(&mut self) -> &mut Playback;

    /// Resets the playback state to the beginning. Implementors holding nested playables
    /// rewind them too.
    fn rewind(&mut self) {
        self.playback_mut().reset();
    }

    /// Starts (or restarts) playing forward.
    ///
    /// An invalid local time falls back to 0. A completed playback is rewound first.
    fn play(&mut self) -> &mut Self {
        if self.playback().finished {
            self.rewind();
        }
        let playback = self.playback_mut();
        playback.speed = 1;
        playback.direction = 1;
        if !playback.local_time.is_finite() || playback.local_time < 0.0 {
            playback.local_time = 0.0;
        }
        playback.animating = true;
        self
    }

    /// Moves forward again after a pause or a reverse.
    fn resume(&mut self) -> &mut Self {
        self.playback_mut().direction = 1;
        self
    }

    /// Freezes the local time: the speed is left as is.
    fn pause(&mut self) -> &mut Self {
        self.playback_mut().direction = 0;
        self
    }

    /// Moves backward.
    fn reverse(&mut self) -> &mut Self {
        self.playback_mut().direction = -1;
        self
    }

    /// Halts and goes back to the beginning.
    fn stop(&mut self) -> &mut Self {
        self.rewind();
        self.playback_mut().speed = 0;
        self
    }

    /// Jumps to the given local time: nothing is interpolated in between.
    fn seek(&mut self, time: f64) -> &mut Self {
        let playback = self.playback_mut();
        playback.local_time = time;
        playback.finished = false;
        self
    }

    /// Plays towards `local time + delta` and stops there.
    ///
    /// A target before the beginning stops the playback right away.
    fn seek_animate(&mut self, delta: f64) -> &mut Self {
        if delta >= 0.0 {
            if !self.playback().animating {
                self.play();
            }
            self.playback_mut().speed = 1;
        } else {
            self.playback_mut().speed = -1;
        }

        let playback = self.playback_mut();
        let target = playback.local_time + delta;
        if target < 0.0 {
            playback.speed = 0;
            playback.seek_target = None;
        } else {
            playback.seek_target = Some(target);
        }
        self
    }
}

impl Playable for Playback {
    fn playback(&self) -> &Playback {
        self
    }

    fn playback_mut(&mut self) -> &mut Playback {
        self
    }
}
