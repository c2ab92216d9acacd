use std::fmt::{Display, Formatter};

use crate::utils::Scalable;

/// A property value carried by a pose or an actor.
///
/// Numbers (and arrays of numbers) are interpolated, every other variant switches to the
/// target as soon as the progress leaves zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum State {
    #[default]
    Null,
    Boolean(bool),
    Integer(u64),
    Signed(i64),
    Float(f64),
    String(String),
    Array(Vec<State>),
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Null => write!(f, "Null"),
            State::Boolean(b) => write!(f, "{}", b),
            State::Integer(i) => write!(f, "{}", i),
            State::Signed(s) => write!(f, "{}", s),
            State::Float(fl) => write!(f, "{}", fl),
            State::String(s) => write!(f, "\"{}\"", s),
            State::Array(arr) => {
                let elements = arr
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{}]", elements)
            }
        }
    }
}

// **********************************************
// Serde
// **********************************************

#[cfg(feature = "serde")]
impl serde::Serialize for State {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self {
            State::Null => serializer.serialize_none(),
            State::Boolean(b) => serializer.serialize_bool(*b),
            State::Integer(i) => serializer.serialize_u64(*i),
            State::Signed(i) => serializer.serialize_i64(*i),
            State::Float(f) => serializer.serialize_f64(*f),
            State::String(s) => serializer.serialize_str(s),
            State::Array(a) => serializer.collect_seq(a),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for State {
    fn deserialize<D>(de: D) -> Result<State, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(de)?;
        State::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<serde_json::Value> for State {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => State::Null,
            serde_json::Value::Bool(b) => State::Boolean(b),
            serde_json::Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(u), _, _) => State::Integer(u),
                (None, Some(i), _) => State::Signed(i),
                (None, None, Some(f)) => State::Float(f),
                _ => return Err(format!("unsupported number {}", n)),
            },
            serde_json::Value::String(s) => State::String(s),
            serde_json::Value::Array(list) => State::Array(
                list.into_iter()
                    .map(State::try_from)
                    .collect::<Result<Vec<State>, String>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(String::from("nested objects are not animatable"))
            }
        })
    }
}

// **********************************************
// Extractors: get the value inside State.
// **********************************************
impl State {
    pub fn is_null(&self) -> bool {
        *self == State::Null
    }

    /// Indicates if the value can be interpolated.
    pub fn is_numeric(&self) -> bool {
        match self {
            State::Integer(_) | State::Signed(_) | State::Float(_) => true,
            State::Array(a) => a.iter().all(State::is_numeric),
            _ => false,
        }
    }

    /// Extracts the boolean value if it is a boolean.
    pub fn as_bool(&self) -> bool {
        match self {
            State::Null => false,
            State::Boolean(b) => *b,
            State::Integer(u) => *u > 0,
            State::Signed(i) => *i > 0,
            State::Float(f) => *f > 0.0,
            State::String(s) => !s.is_empty(),
            State::Array(a) => !a.is_empty(),
        }
    }

    /// Extracts the integer value if it is an integer.
    pub fn as_integer(&self) -> u64 {
        match *self {
            State::Boolean(b) => u64::from(b),
            State::Integer(u) => u,
            State::Signed(i) => i.max(0) as u64,
            State::Float(f) => f as u64,
            _ => 0,
        }
    }

    /// Extracts the signed integer value if it is an integer.
    pub fn as_signed_integer(&self) -> i64 {
        match *self {
            State::Boolean(b) => i64::from(b),
            State::Integer(i) => i as i64,
            State::Signed(i) => i,
            State::Float(f) => f as i64,
            _ => 0,
        }
    }

    /// Extracts the float value if it is a number.
    pub fn as_float(&self) -> f64 {
        match *self {
            State::Boolean(b) => f64::from(b),
            State::Integer(u) => u as f64,
            State::Signed(i) => i as f64,
            State::Float(f) => f,
            _ => 0.0,
        }
    }

    /// Extracts the string of this value.
    pub fn as_string(&self) -> String {
        match self {
            State::Integer(u) => format!("{}", u),
            State::Signed(i) => format!("{}", i),
            State::Float(f) => format!("{}", f),
            State::String(s) => s.clone(),
            _ => String::default(),
        }
    }

    /// Extracts the array value if it is an array.
    pub fn as_array(&self) -> Vec<State> {
        match *self {
            State::Array(ref a) => a.clone(),
            _ => vec![],
        }
    }

    /// Computes the in-between value from `self` towards `target` at the given progress.
    ///
    /// The progress usually goes from 0.0 to 1.0, although easing functions (back, elastic)
    /// may overshoot on both sides. The target variant drives the result variant.
    pub fn interpolate(&self, target: &State, progress: f32) -> State {
        let progress = progress as f64;
        match target {
            State::Integer(value) => State::Integer(
                progress
                    .scale(0.0, 1.0, self.as_float(), *value as f64)
                    .round()
                    .max(0.0) as u64,
            ),
            State::Signed(value) => State::Signed(
                progress
                    .scale(0.0, 1.0, self.as_float(), *value as f64)
                    .round() as i64,
            ),
            State::Float(value) => State::Float(progress.scale(0.0, 1.0, self.as_float(), *value)),
            State::Array(values) => {
                let previous = self.as_array();
                State::Array(
                    values
                        .iter()
                        .enumerate()
                        .map(|(index, value)| {
                            previous
                                .get(index)
                                .cloned()
                                .unwrap_or_default()
                                .interpolate(value, progress as f32)
                        })
                        .collect(),
                )
            }
            _ => match progress <= 0.0 {
                true => self.clone(),
                false => target.clone(),
            },
        }
    }
}

// **********************************************
// Converters: set a value inside State.
// **********************************************

macro_rules! impl_from_converter {
    ($variant:ident : $T:ty) => {
        impl From<$T> for State {
            #[inline]
            fn from(val: $T) -> State {
                State::$variant(val.into())
            }
        }
    };
}

impl_from_converter!(String: String);
impl_from_converter!(String: &str);
impl_from_converter!(Integer: u8);
impl_from_converter!(Integer: u16);
impl_from_converter!(Integer: u32);
impl_from_converter!(Integer: u64);
impl_from_converter!(Signed: i8);
impl_from_converter!(Signed: i16);
impl_from_converter!(Signed: i32);
impl_from_converter!(Signed: i64);
impl_from_converter!(Float: f32);
impl_from_converter!(Float: f64);
impl_from_converter!(Boolean: bool);

impl<T: Into<State>> From<Vec<T>> for State {
    /// Convert a `Vec` to `State::Array`.
    fn from(f: Vec<T>) -> Self {
        State::Array(f.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<State>, const N: usize> From<[T; N]> for State {
    /// Convert an array (eg: a `[x, y]` translation) to `State::Array`.
    fn from(f: [T; N]) -> Self {
        State::Array(f.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<State>> FromIterator<T> for State {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        State::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_boolean() {
        assert!(!State::Null.as_bool());
        assert!(State::Boolean(true).as_bool());
        assert!(!State::Integer(0).as_bool());
        assert!(!State::Signed(-10).as_bool());
        assert!(State::Float(10.5).as_bool());
        assert!(!State::String(String::from("")).as_bool());
        assert!(State::Array(vec![1.into()]).as_bool());
    }

    #[test]
    fn test_numeric_extractors() {
        assert_eq!(State::Null.as_integer(), 0);
        assert_eq!(State::Signed(-12).as_integer(), 0);
        assert_eq!(State::Float(69.5).as_integer(), 69);
        assert_eq!(State::Float(-69.5).as_signed_integer(), -69);
        assert_eq!(State::Integer(42).as_float(), 42.0);
        assert_eq!(State::Boolean(true).as_float(), 1.0);
        assert_eq!(State::String(String::from("test")).as_float(), 0.0);
        assert_eq!(State::Float(0.25).as_string(), String::from("0.25"));
        assert_eq!(
            State::from([1, 2]).as_array(),
            vec![State::Signed(1), State::Signed(2)]
        );
    }

    #[test]
    fn test_is_numeric() {
        assert!(State::Float(1.0).is_numeric());
        assert!(State::from([0.0, 10.0]).is_numeric());
        assert!(!State::from(["left", "right"]).is_numeric());
        assert!(!State::from("red").is_numeric());
        assert!(!State::Null.is_numeric());
    }

    #[test]
    fn test_interpolate_numbers() {
        let result = State::Integer(10).interpolate(&State::Integer(20), 0.5);
        assert_eq!(result, State::Integer(15));

        let result = State::Integer(10).interpolate(&State::Integer(20), 0.75);
        assert_eq!(result, State::Integer(18));

        let result = State::Signed(-10).interpolate(&State::Signed(10), 0.75);
        assert_eq!(result, State::Signed(5));

        let result = State::Float(1.0).interpolate(&State::Float(2.0), 0.5);
        assert_eq!(result, State::Float(1.5));

        // From an unset property.
        let result = State::Null.interpolate(&State::Float(1.0), 0.25);
        assert_eq!(result, State::Float(0.25));
    }

    #[test]
    fn test_interpolate_arrays() {
        let from = State::from([0.0, 100.0]);
        let result = from.interpolate(&State::from([10.0, 0.0]), 0.5);
        assert_eq!(result, State::from([5.0, 50.0]));

        // Missing elements start from zero.
        let result = State::from([2.0]).interpolate(&State::from([4.0, 8.0]), 0.5);
        assert_eq!(result, State::from([3.0, 4.0]));
    }

    #[test]
    fn test_interpolate_non_numeric() {
        let from = State::from("hidden");
        let to = State::from("visible");
        assert_eq!(from.interpolate(&to, 0.0), State::from("hidden"));
        assert_eq!(from.interpolate(&to, 0.1), State::from("visible"));
        assert_eq!(
            State::Boolean(false).interpolate(&State::Boolean(true), 1.0),
            State::Boolean(true)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(State::Null.to_string(), "Null");
        assert_eq!(State::Float(0.5).to_string(), "0.5");
        assert_eq!(State::from("red").to_string(), "\"red\"");
        assert_eq!(State::from([1u8, 2u8]).to_string(), "[1, 2]");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let state: State = serde_json::from_str("[1, -2, 0.5, \"red\", true, null]").unwrap();
        assert_eq!(
            state,
            State::Array(vec![
                State::Integer(1),
                State::Signed(-2),
                State::Float(0.5),
                State::from("red"),
                State::Boolean(true),
                State::Null,
            ])
        );
        assert_eq!(serde_json::to_string(&state).unwrap(), "[1,-2,0.5,\"red\",true,null]");
        assert!(serde_json::from_str::<State>("{\"x\": 1}").is_err());
    }
}
