#![doc(html_root_url = "https://docs.rs/stagecraft/0.1.0")]

//! <h1 align="center">STAGECRAFT - Hierarchical animation scheduling</h1>
//! <div style="text-align:center;font-style:italic;">Stagecraft composes animation segments into timelines and drives them against a shared clock.</div>
//! <br/>
//!
//! # Features
//!
//! **Stagecraft** is a Rust library that schedules animations: it does not know what the animated
//! properties mean, nor how they are rendered. It only decides, tick after tick, which segments
//! are active and hands them over to an interpolation engine.
//!
//! - Describe animated subjects with the [`Actor`](actors::Actor) trait (or use the in-memory [`Puppet`](actors::Puppet))
//! - Compose [`Pose`](animations::Pose)s into [`Timeline`](animations::Timeline)s, sequentially or overlapping,
//!   and nest timelines into one another
//! - Control playback: play, pause, reverse, seek (instant or animated), stop
//! - Repeat once, a given count or forever, and choose the fill behaviour on completion
//! - Inject a new animation into a running timeline with [`set_animation`](animations::Timeline::set_animation)
//! - Drive everything from a [`ClockSource`](clock::ClockSource): a real-time [`FrameClock`](clock::FrameClock)
//!   or a deterministic [`ManualClock`](clock::ManualClock)
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! stagecraft = "0.1.0"
//! ```
//!
//! The following code fades a puppet in then moves it to the right, both in 500ms.
//! ```rust
//! use std::sync::Arc;
//!
//! use stagecraft::actors::Puppet;
//! use stagecraft::animations::{animate, Cast, Descriptor, Options, TimelineEvent};
//! use stagecraft::clock::FrameClock;
//! use stagecraft::pause;
//!
//! #[stagecraft::runtime]
//! async fn main() {
//!     let clock = Arc::new(FrameClock::default());
//!     clock.start().unwrap();
//!
//!     let puppet = Puppet::new("box");
//!     let scene = animate(
//!         clock.clone(),
//!         Cast::solo(puppet.clone()),
//!         vec![
//!             Descriptor::new(500).with_property("opacity", 1.0),
//!             Descriptor::new(500).with_property("left", 200),
//!         ],
//!         Options::default().set_auto_play(true),
//!     );
//!
//!     scene.on(TimelineEvent::OnComplete, |_: Option<Box<dyn stagecraft::actors::Actor>>| {
//!         println!("Done");
//!     });
//!
//!     pause!(1100);
//!     clock.stop();
//! }
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for descriptors, options and states.
//! - **mocks** -- Provides mocked actors and engines (useful for tests mostly).

pub mod actors;
pub mod animations;
pub mod clock;
pub mod errors;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod utils;

pub use stagecraft_macros::runtime;
