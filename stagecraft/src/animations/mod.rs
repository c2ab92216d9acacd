//! Defines timelines: poses composed in time and played against a clock.

mod composer;
mod descriptor;
mod easing;
mod playback;
mod pose;
mod scene;
mod timeline;
mod tween;

pub use composer::{animate, compose, Cast};
pub use descriptor::{Descriptor, Options};
pub use easing::Easing;
pub use playback::{FillMode, Playable, Playback, Repeat};
pub use pose::{Entry, Lookup, Pose, Span};
pub use scene::Scene;
pub use timeline::{Flow, Timeline, TimelineEvent, FRAME_BUDGET};
pub use tween::{Interpolator, Tween};
