//! Defines the animated subjects: anything whose properties a timeline can drive.

use std::collections::HashMap;
use std::fmt::{Debug, Display};

use dyn_clone::DynClone;

pub use crate::actors::puppet::Puppet;
use crate::errors::Error;
use crate::utils::State;

mod puppet;

/// A set of named property values (eg: `opacity -> 0.5`).
pub type Properties = HashMap<String, State>;

/// Represents an animated subject.
///
/// A timeline holds a cloned handle onto its actor: clones are expected to share the same
/// underlying subject (through an `Arc` or an external identifier), so that the owner and the
/// timeline observe the same properties.
pub trait Actor: Debug + Display + DynClone + Send + Sync {
    /// Indicates if the subject exists yet: timelines of a non-generated actor do not advance.
    fn is_generated(&self) -> bool;
    /// Indicates if the subject has been discarded: a non-animating timeline of a destroyed
    /// actor detaches from its clock.
    fn is_destroyed(&self) -> bool;
    /// Returns the snapshot reapplied on repeat (and on completion with backwards fill).
    fn get_initial_state(&self) -> Properties;
    /// Returns the current value of a property ([`State::Null`] when unknown).
    fn get_property(&self, name: &str) -> State;
    /// Applies a set of property values.
    fn add_styles(&mut self, styles: &Properties) -> Result<(), Error>;
    /// The reference duration percentage spans are resolved against.
    fn get_duration(&self) -> f64 {
        0.0
    }
}
dyn_clone::clone_trait_object!(Actor);
