use std::fmt::{Display, Formatter};
use std::str::FromStr;

use simple_easing::*;

/// Represents a set of easing functions.
///
/// An easing function maps the progress of a pose (from 0.0 at its beginning to 1.0 at its end)
/// onto the progress of its properties, according to an ease curve. Back and elastic curves
/// overshoot on purpose.
///
/// See <https://easings.net> for a representation of easing methods.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    BackIn,
    BackInOut,
    BackOut,
    BounceIn,
    BounceInOut,
    BounceOut,
    CircIn,
    CircInOut,
    CircOut,
    CubicIn,
    CubicInOut,
    CubicOut,
    ElasticIn,
    ElasticInOut,
    ElasticOut,
    ExpoIn,
    ExpoInOut,
    ExpoOut,
    #[default]
    Linear,
    QuadIn,
    QuadInOut,
    QuadOut,
    QuartIn,
    QuartInOut,
    QuartOut,
    QuintIn,
    QuintInOut,
    QuintOut,
    /// Goes from 1.0 to 0.0.
    Reverse,
    /// Goes from 0.0 to 1.0 and back to 0.0.
    RoundTrip,
    SineIn,
    SineInOut,
    SineOut,
}

/// (variant, kebab-case name) couples used for parsing and display.
const NAMES: [(Easing, &str); 33] = [
    (Easing::BackIn, "back-in"),
    (Easing::BackInOut, "back-in-out"),
    (Easing::BackOut, "back-out"),
    (Easing::BounceIn, "bounce-in"),
    (Easing::BounceInOut, "bounce-in-out"),
    (Easing::BounceOut, "bounce-out"),
    (Easing::CircIn, "circ-in"),
    (Easing::CircInOut, "circ-in-out"),
    (Easing::CircOut, "circ-out"),
    (Easing::CubicIn, "cubic-in"),
    (Easing::CubicInOut, "cubic-in-out"),
    (Easing::CubicOut, "cubic-out"),
    (Easing::ElasticIn, "elastic-in"),
    (Easing::ElasticInOut, "elastic-in-out"),
    (Easing::ElasticOut, "elastic-out"),
    (Easing::ExpoIn, "expo-in"),
    (Easing::ExpoInOut, "expo-in-out"),
    (Easing::ExpoOut, "expo-out"),
    (Easing::Linear, "linear"),
    (Easing::QuadIn, "quad-in"),
    (Easing::QuadInOut, "quad-in-out"),
    (Easing::QuadOut, "quad-out"),
    (Easing::QuartIn, "quart-in"),
    (Easing::QuartInOut, "quart-in-out"),
    (Easing::QuartOut, "quart-out"),
    (Easing::QuintIn, "quint-in"),
    (Easing::QuintInOut, "quint-in-out"),
    (Easing::QuintOut, "quint-out"),
    (Easing::Reverse, "reverse"),
    (Easing::RoundTrip, "round-trip"),
    (Easing::SineIn, "sine-in"),
    (Easing::SineInOut, "sine-in-out"),
    (Easing::SineOut, "sine-out"),
];

impl Easing {
    /// Applies the ease curve to a progress ratio.
    pub fn ease(&self, t: f32) -> f32 {
        let curve: fn(f32) -> f32 = match self {
            Easing::BackIn => back_in,
            Easing::BackInOut => back_in_out,
            Easing::BackOut => back_out,
            Easing::BounceIn => bounce_in,
            Easing::BounceInOut => bounce_in_out,
            Easing::BounceOut => bounce_out,
            Easing::CircIn => circ_in,
            Easing::CircInOut => circ_in_out,
            Easing::CircOut => circ_out,
            Easing::CubicIn => cubic_in,
            Easing::CubicInOut => cubic_in_out,
            Easing::CubicOut => cubic_out,
            Easing::ElasticIn => elastic_in,
            Easing::ElasticInOut => elastic_in_out,
            Easing::ElasticOut => elastic_out,
            Easing::ExpoIn => expo_in,
            Easing::ExpoInOut => expo_in_out,
            Easing::ExpoOut => expo_out,
            Easing::Linear => |t| t,
            Easing::QuadIn => quad_in,
            Easing::QuadInOut => quad_in_out,
            Easing::QuadOut => quad_out,
            Easing::QuartIn => quart_in,
            Easing::QuartInOut => quart_in_out,
            Easing::QuartOut => quart_out,
            Easing::QuintIn => quint_in,
            Easing::QuintInOut => quint_in_out,
            Easing::QuintOut => quint_out,
            Easing::Reverse => reverse,
            Easing::RoundTrip => roundtrip,
            Easing::SineIn => sine_in,
            Easing::SineInOut => sine_in_out,
            Easing::SineOut => sine_out,
        };
        curve(t)
    }
}

impl Display for Easing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = NAMES
            .iter()
            .find(|(easing, _)| easing == self)
            .map_or("linear", |(_, name)| name);
        write!(f, "{}", name)
    }
}

impl FromStr for Easing {
    type Err = String;

    /// Parses a kebab-case easing name (eg: `sine-in-out`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        NAMES
            .iter()
            .find(|(_, name)| *name == needle)
            .map(|(easing, _)| *easing)
            .ok_or_else(|| format!("unknown easing '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_eased(easing: Easing, input: f32, expected: f32) {
        let result = easing.ease(input);
        assert!(
            (result - expected).abs() < 1e-5,
            "{}: expected {}, got {}",
            easing,
            expected,
            result
        );
    }

    #[test]
    fn test_curves_are_anchored() {
        for (easing, _) in NAMES {
            match easing {
                Easing::Reverse => {
                    assert_eased(easing, 0.0, 1.0);
                    assert_eased(easing, 1.0, 0.0);
                }
                Easing::RoundTrip => {
                    assert_eased(easing, 0.0, 0.0);
                    assert_eased(easing, 0.5, 1.0);
                    assert_eased(easing, 1.0, 0.0);
                }
                _ => {
                    assert_eased(easing, 0.0, 0.0);
                    assert_eased(easing, 1.0, 1.0);
                }
            }
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert_eased(Easing::Linear, 0.3, 0.3);
        assert_eased(Easing::QuadIn, 0.5, 0.25);
        assert_eased(Easing::QuadOut, 0.5, 0.75);
        assert_eased(Easing::CubicIn, 0.5, 0.125);
        assert_eased(Easing::BackIn, 0.5, -0.0876975);
        assert_eased(Easing::BackInOut, 0.8, 1.0925556);
        assert_eased(Easing::BounceOut, 0.5, 0.765625);
        assert_eased(Easing::SineInOut, 0.5, 0.5);
    }

    #[test]
    fn test_easing_names() {
        assert_eq!(Easing::default(), Easing::Linear);
        assert_eq!(Easing::SineInOut.to_string(), "sine-in-out");
        assert_eq!("Back-In-Out".parse::<Easing>(), Ok(Easing::BackInOut));
        assert_eq!("round-trip".parse::<Easing>(), Ok(Easing::RoundTrip));
        assert_eq!(
            "wobble".parse::<Easing>(),
            Err(String::from("unknown easing 'wobble'"))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Easing::ElasticOut).unwrap();
        assert_eq!(json, "\"elastic-out\"");
        let easing: Easing = serde_json::from_str("\"quad-in-out\"").unwrap();
        assert_eq!(easing, Easing::QuadInOut);
    }
}
