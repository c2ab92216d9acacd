use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::warn;

use crate::actors::Properties;
use crate::animations::{Descriptor, Easing, Timeline};
use crate::errors::{Error, InvalidSpan};
use crate::utils::{Scalable, State};

/// A length of time: absolute milliseconds or a percentage of a reference duration.
///
/// # Example
/// ```
/// use stagecraft::animations::Span;
///
/// assert_eq!(Span::from("50%").resolve(200.0), 100.0);
/// assert_eq!(Span::from(300).resolve(200.0), 300.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Span {
    Absolute(f64),
    Percent(f64),
}

impl Default for Span {
    fn default() -> Self {
        Span::Absolute(0.0)
    }
}

impl Span {
    /// Computes the milliseconds this span represents for the given reference duration.
    pub fn resolve(&self, duration: f64) -> f64 {
        match *self {
            Span::Absolute(ms) => ms,
            Span::Percent(percent) => percent.scale(0.0, 100.0, 0.0, duration),
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Span::Absolute(ms) => write!(f, "{}ms", ms),
            Span::Percent(percent) => write!(f, "{}%", percent),
        }
    }
}

impl FromStr for Span {
    type Err = Error;

    /// Parses `"250"` (or `"250ms"`) as milliseconds and `"50%"` as a percentage.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || InvalidSpan {
            value: s.to_string(),
        };
        match text.strip_suffix('%') {
            Some(percent) => percent
                .trim()
                .parse::<f64>()
                .map(Span::Percent)
                .map_err(|_| invalid()),
            None => text
                .strip_suffix("ms")
                .unwrap_or(text)
                .trim()
                .parse::<f64>()
                .map(Span::Absolute)
                .map_err(|_| invalid()),
        }
    }
}

impl From<&str> for Span {
    /// Lenient conversion: an unparsable text is logged and counts as 0.
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|err: Error| {
            warn!("{}", err);
            Span::default()
        })
    }
}

impl From<String> for Span {
    fn from(value: String) -> Self {
        Span::from(value.as_str())
    }
}

macro_rules! impl_span_from_number {
    ($($T:ty),*) => {
        $(
            impl From<$T> for Span {
                fn from(value: $T) -> Self {
                    Span::Absolute(value as f64)
                }
            }
        )*
    };
}

impl_span_from_number!(u8, u16, u32, u64, i32, i64, f32, f64);

#[cfg(feature = "serde")]
impl serde::Serialize for Span {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Span::Absolute(ms) => serializer.serialize_f64(*ms),
            Span::Percent(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Span {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum SpanRepr {
            Number(f64),
            Text(String),
        }

        match SpanRepr::deserialize(deserializer)? {
            SpanRepr::Number(ms) => Ok(Span::Absolute(ms)),
            SpanRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A segment of animation: target properties reached between `begin` and `span`.
///
/// The offsets are relative to the owning timeline local time. The transient states are managed
/// by the interpolation engine:
/// - `start_state`: the actor values captured when the pose is first driven (also marks the
///   pose as initialized),
/// - `current_state`: the last computed values,
/// - `end_state`: the values the pose was at when a newly injected animation clipped it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    animate: Properties,
    begin: f64,
    span: f64,
    easing: Easing,

    // ########################################
    // # Volatile utility data.
    start_state: Option<Properties>,
    current_state: Option<Properties>,
    end_state: Option<Properties>,
}

impl Pose {
    pub fn new(animate: Properties) -> Self {
        Self {
            animate,
            ..Default::default()
        }
    }

    /// Adds a target property.
    pub fn with_property<S: Into<String>, V: Into<State>>(mut self, name: S, value: V) -> Self {
        self.animate.insert(name.into(), value.into());
        self
    }

    pub fn set_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Indicates if `time` lies within `(begin, span]`.
    pub fn is_active_at(&self, time: f64) -> bool {
        self.begin < time && time <= self.span
    }

    /// Indicates if the engine initialized the pose.
    pub fn is_initialized(&self) -> bool {
        self.start_state.is_some()
    }

    pub(crate) fn place(&mut self, begin: f64, span: f64) {
        self.begin = begin;
        self.span = span;
    }

    /// Stops the pose at `time`, keeping the values reached so far as its final ones.
    pub(crate) fn clip(&mut self, time: f64) {
        self.span = time;
        self.end_state = self.current_state.clone();
    }

    // ########################################
    // Setters and Getters.

    pub fn get_animate(&self) -> &Properties {
        &self.animate
    }

    pub fn get_begin(&self) -> f64 {
        self.begin
    }

    pub fn get_span(&self) -> f64 {
        self.span
    }

    pub fn get_duration(&self) -> f64 {
        self.span - self.begin
    }

    pub fn get_easing(&self) -> Easing {
        self.easing
    }

    pub fn get_start_state(&self) -> Option<&Properties> {
        self.start_state.as_ref()
    }

    pub fn set_start_state(&mut self, state: Properties) {
        self.start_state = Some(state);
    }

    pub fn get_current_state(&self) -> Option<&Properties> {
        self.current_state.as_ref()
    }

    pub fn set_current_state(&mut self, state: Properties) {
        self.current_state = Some(state);
    }

    pub fn get_end_state(&self) -> Option<&Properties> {
        self.end_state.as_ref()
    }
}

impl From<Descriptor> for Pose {
    fn from(descriptor: Descriptor) -> Self {
        Pose::new(descriptor.get_animate().clone()).set_easing(descriptor.get_easing())
    }
}

impl Display for Pose {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.animate.keys().collect();
        names.sort();
        write!(
            f,
            "Pose [{}-{}ms, easing={}]: {}",
            self.begin,
            self.span,
            self.easing,
            names
                .iter()
                .map(|name| format!("{}={}", name, self.animate[*name]))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

/// An item of a timeline: a plain pose or a nested timeline.
#[derive(Clone, Debug)]
pub enum Entry {
    Pose(Pose),
    Timeline(Box<Timeline>),
}

impl Entry {
    pub fn get_begin(&self) -> f64 {
        match self {
            Entry::Pose(pose) => pose.get_begin(),
            Entry::Timeline(timeline) => timeline.get_begin(),
        }
    }

    pub fn get_span(&self) -> f64 {
        match self {
            Entry::Pose(pose) => pose.get_span(),
            Entry::Timeline(timeline) => timeline.get_span(),
        }
    }

    /// Indicates if `time` lies within `(begin, span]`.
    pub fn is_active_at(&self, time: f64) -> bool {
        self.get_begin() < time && time <= self.get_span()
    }

    pub fn as_pose(&self) -> Option<&Pose> {
        match self {
            Entry::Pose(pose) => Some(pose),
            Entry::Timeline(_) => None,
        }
    }

    pub fn as_timeline(&self) -> Option<&Timeline> {
        match self {
            Entry::Pose(_) => None,
            Entry::Timeline(timeline) => Some(&**timeline),
        }
    }
}

impl From<Pose> for Entry {
    fn from(pose: Pose) -> Self {
        Entry::Pose(pose)
    }
}

impl From<Properties> for Entry {
    fn from(animate: Properties) -> Self {
        Entry::Pose(Pose::new(animate))
    }
}

impl From<Timeline> for Entry {
    fn from(timeline: Timeline) -> Self {
        Entry::Timeline(Box::new(timeline))
    }
}

/// The result of [`Timeline::get_animation`].
#[derive(Clone, Copy, Debug)]
pub enum Lookup<'a> {
    /// Returned for any negative index.
    Sentinel,
    Entry(&'a Entry),
}

impl<'a> Lookup<'a> {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Lookup::Sentinel)
    }

    pub fn entry(&self) -> Option<&'a Entry> {
        match *self {
            Lookup::Sentinel => None,
            Lookup::Entry(entry) => Some(entry),
        }
    }
}
