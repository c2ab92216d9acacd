use std::sync::Arc;

use crate::actors::Actor;
use crate::animations::{Descriptor, Options, Scene, Timeline};
use crate::clock::ClockSource;

/// The actor(s) an animation is composed for.
#[derive(Clone, Debug)]
pub enum Cast {
    Solo(Box<dyn Actor>),
    Ensemble(Vec<Box<dyn Actor>>),
}

impl Cast {
    pub fn solo<A: Actor + 'static>(actor: A) -> Self {
        Cast::Solo(Box::new(actor))
    }

    pub fn ensemble<A: Actor + 'static, I: IntoIterator<Item = A>>(actors: I) -> Self {
        Cast::Ensemble(
            actors
                .into_iter()
                .map(|actor| Box::new(actor) as Box<dyn Actor>)
                .collect(),
        )
    }
}

impl From<Box<dyn Actor>> for Cast {
    fn from(actor: Box<dyn Actor>) -> Self {
        Cast::Solo(actor)
    }
}

impl From<Vec<Box<dyn Actor>>> for Cast {
    fn from(actors: Vec<Box<dyn Actor>>) -> Self {
        Cast::Ensemble(actors)
    }
}

/// Builds the timeline animating a cast.
///
/// - A single actor gets one timeline holding the descriptors, with the given options.
/// - An ensemble gets a parent timeline (with the given options) holding one nested timeline per
///   actor, each built from the same descriptors with default options.
///
/// With `auto_play`, the returned timeline is already playing.
pub fn compose(cast: Cast, descriptors: Vec<Descriptor>, options: Options) -> Timeline {
    match cast {
        Cast::Solo(actor) => Timeline::from(actor)
            .set_options(options)
            .with_descriptors(descriptors),
        Cast::Ensemble(actors) => actors.into_iter().fold(
            Timeline::default().set_options(options),
            |parent, actor| {
                parent.with_scene(Timeline::from(actor).with_descriptors(descriptors.clone()))
            },
        ),
    }
}

/// Composes the timeline of a cast (see [`compose`]) and subscribes it to a clock.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use stagecraft::actors::Puppet;
/// use stagecraft::animations::{animate, Cast, Descriptor, Options, Playable};
/// use stagecraft::clock::ManualClock;
///
/// let clock = Arc::new(ManualClock::default());
/// let scene = animate(
///     clock.clone(),
///     Cast::ensemble([Puppet::new("a"), Puppet::new("b")]),
///     vec![Descriptor::new(100).with_property("opacity", 1.0)],
///     Options::default().set_auto_play(true),
/// );
/// assert!(scene.read().playback().is_animating());
/// assert_eq!(scene.read().playback().get_total_span(), 200.0);
/// ```
pub fn animate(
    clock: Arc<dyn ClockSource>,
    cast: Cast,
    descriptors: Vec<Descriptor>,
    options: Options,
) -> Scene {
    Scene::new(clock, compose(cast, descriptors, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::{FillMode, Playable, Repeat, Span};
    use crate::clock::ManualClock;
    use crate::mocks::actor::MockActor;

    fn descriptors() -> Vec<Descriptor> {
        vec![
            Descriptor::new(100).with_property("left", 100),
            Descriptor::new(50).set_delay(25).with_property("top", 10),
        ]
    }

    #[test]
    fn test_compose_solo() {
        let options = Options::default()
            .set_repeat(Repeat::Forever)
            .set_fill_mode(FillMode::Backwards);
        let timeline = compose(Cast::solo(MockActor::new("box")), descriptors(), options);

        assert_eq!(timeline.get_entries().len(), 3, "The delay adds a pose.");
        assert_eq!(timeline.playback().get_total_span(), 175.0);
        assert_eq!(timeline.playback().get_repeat(), Repeat::Forever);
        assert_eq!(timeline.playback().get_fill_mode(), FillMode::Backwards);
        assert!(!timeline.playback().is_animating());
        assert_eq!(timeline.get_actor().unwrap().to_string(), "MockActor (box)");
    }

    #[test]
    fn test_compose_solo_auto_play() {
        let timeline = compose(
            Cast::from(Box::new(MockActor::new("box")) as Box<dyn Actor>),
            descriptors(),
            Options::default().set_auto_play(true),
        );
        assert!(timeline.playback().is_animating());
    }

    #[test]
    fn test_compose_ensemble() {
        let options = Options::default()
            .set_repeat(Repeat::Count(2))
            .set_auto_play(true);
        let timeline = compose(
            Cast::ensemble([MockActor::new("a"), MockActor::new("b")]),
            descriptors(),
            options,
        );

        assert!(timeline.get_actor().is_none());
        assert!(timeline.playback().is_animating());
        assert_eq!(timeline.playback().get_repeat(), Repeat::Count(2));
        assert_eq!(timeline.playback().get_total_span(), 350.0);

        let children: Vec<&Timeline> = timeline
            .get_entries()
            .iter()
            .filter_map(|entry| entry.as_timeline())
            .collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].get_begin(), 175.0);
        for child in children {
            assert_eq!(child.get_entries().len(), 3);
            assert_eq!(child.playback().get_repeat(), Repeat::Once, "Default options.");
            assert!(!child.playback().is_animating());
        }
    }

    #[test]
    fn test_compose_percent_durations() {
        let timeline = compose(
            Cast::solo(MockActor::new("box").set_duration(1000.0)),
            vec![Descriptor::new("10%").set_delay(Span::Percent(5.0))],
            Options::default(),
        );
        assert_eq!(timeline.playback().get_total_span(), 150.0);
    }

    #[test]
    fn test_animate() {
        let clock = Arc::new(ManualClock::default());
        let scene = animate(
            clock.clone(),
            Cast::solo(MockActor::new("box")),
            descriptors(),
            Options::default().set_auto_play(true),
        );
        assert!(scene.is_attached());
        assert_eq!(clock.count_subscribers(), 1);

        clock.tick_at(0.0);
        clock.advance(16.0);
        assert_eq!(scene.read().playback().get_local_time(), 16.0);
    }
}
