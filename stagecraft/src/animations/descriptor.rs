use crate::actors::Properties;
use crate::animations::{Easing, FillMode, Repeat, Span};
use crate::utils::State;

/// Describes one animation of an actor: the properties to reach, in how long, after which delay.
///
/// # Example
/// ```
/// use stagecraft::animations::{Descriptor, Easing};
///
/// let fade_in = Descriptor::new("50%")
///     .with_property("opacity", 1.0)
///     .set_delay(100)
///     .set_easing(Easing::SineOut);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Descriptor {
    animate: Properties,
    duration: Span,
    delay: Option<Span>,
    easing: Easing,
}

impl Descriptor {
    pub fn new<S: Into<Span>>(duration: S) -> Self {
        Self {
            duration: duration.into(),
            ..Default::default()
        }
    }

    /// Adds a target property.
    pub fn with_property<S: Into<String>, V: Into<State>>(mut self, name: S, value: V) -> Self {
        self.animate.insert(name.into(), value.into());
        self
    }

    pub fn set_animate(mut self, animate: Properties) -> Self {
        self.animate = animate;
        self
    }

    pub fn set_duration<S: Into<Span>>(mut self, duration: S) -> Self {
        self.duration = duration.into();
        self
    }

    /// Sets a pause (played as an empty pose) before the animation.
    pub fn set_delay<S: Into<Span>>(mut self, delay: S) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn set_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    // ########################################
    // Setters and Getters.

    pub fn get_animate(&self) -> &Properties {
        &self.animate
    }

    pub fn get_duration(&self) -> Span {
        self.duration
    }

    pub fn get_delay(&self) -> Option<Span> {
        self.delay
    }

    pub fn get_easing(&self) -> Easing {
        self.easing
    }
}

/// Playback options of a composed timeline.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    repeat: Repeat,
    fill_mode: FillMode,
    handle_layers: bool,
    is_sequence: bool,
    auto_play: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repeat: Repeat::Once,
            fill_mode: FillMode::Default,
            handle_layers: false,
            is_sequence: true,
            auto_play: false,
        }
    }
}

impl Options {
    pub fn set_repeat<R: Into<Repeat>>(mut self, repeat: R) -> Self {
        self.repeat = repeat.into();
        self
    }

    pub fn set_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    /// Lets the interpolation engine know when a timeline stops driving its actor.
    pub fn set_handle_layers(mut self, handle_layers: bool) -> Self {
        self.handle_layers = handle_layers;
        self
    }

    /// Chains entries one after the other (default), or lets them all begin at 0.
    pub fn set_sequence(mut self, is_sequence: bool) -> Self {
        self.is_sequence = is_sequence;
        self
    }

    pub fn set_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
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

    pub fn is_sequence(&self) -> bool {
        self.is_sequence
    }

    pub fn is_auto_play(&self) -> bool {
        self.auto_play
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let descriptor = Descriptor::new(200)
            .with_property("left", 100)
            .with_property("opacity", 0.5)
            .set_delay("10%")
            .set_easing(Easing::CubicOut);
        assert_eq!(descriptor.get_duration(), Span::Absolute(200.0));
        assert_eq!(descriptor.get_delay(), Some(Span::Percent(10.0)));
        assert_eq!(descriptor.get_easing(), Easing::CubicOut);
        assert_eq!(descriptor.get_animate().len(), 2);

        let descriptor = descriptor
            .set_duration("50%")
            .set_animate(Properties::new());
        assert_eq!(descriptor.get_duration(), Span::Percent(50.0));
        assert!(descriptor.get_animate().is_empty());
    }

    #[test]
    fn test_options_builder() {
        let options = Options::default();
        assert_eq!(options.get_repeat(), Repeat::Once);
        assert_eq!(options.get_fill_mode(), FillMode::Default);
        assert!(options.is_sequence());
        assert!(!options.is_handle_layers());
        assert!(!options.is_auto_play());

        let options = options
            .set_repeat(true)
            .set_fill_mode(FillMode::Backwards)
            .set_handle_layers(true)
            .set_sequence(false)
            .set_auto_play(true);
        assert_eq!(options.get_repeat(), Repeat::Forever);
        assert_eq!(options.get_fill_mode(), FillMode::Backwards);
        assert!(options.is_handle_layers());
        assert!(!options.is_sequence());
        assert!(options.is_auto_play());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let descriptor: Descriptor = serde_json::from_str(
            r#"{"animate": {"opacity": 1.0, "translate": [10, 20]}, "duration": "50%", "delay": 100, "easing": "sine-in"}"#,
        )
        .unwrap();
        assert_eq!(
            descriptor,
            Descriptor::new("50%")
                .with_property("opacity", 1.0)
                .with_property("translate", [10u8, 20u8])
                .set_delay(100)
                .set_easing(Easing::SineIn)
        );

        let options: Options =
            serde_json::from_str(r#"{"repeat": 3, "fill_mode": "backwards"}"#).unwrap();
        assert_eq!(
            options,
            Options::default()
                .set_repeat(Repeat::Count(3))
                .set_fill_mode(FillMode::Backwards)
        );
    }
}
