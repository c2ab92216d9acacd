use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::actors::{Actor, Properties};
use crate::errors::{ActorError, Error};
use crate::utils::State;

/// An in-memory [`Actor`]: a named bag of properties.
///
/// Clones share the same properties, so the puppet handed to a timeline can be observed from the
/// outside.
///
/// # Example
/// ```
/// use stagecraft::actors::{Actor, Puppet};
///
/// let puppet = Puppet::new("box").with_property("opacity", 0.0);
/// assert_eq!(puppet.get_property("opacity").as_float(), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Puppet {
    name: String,
    inner: Arc<RwLock<PuppetState>>,
}

#[derive(Debug, Default)]
struct PuppetState {
    generated: bool,
    destroyed: bool,
    duration: f64,
    initial: Properties,
    properties: Properties,
}

impl Puppet {
    /// Creates a generated puppet with no property.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(RwLock::new(PuppetState {
                generated: true,
                ..Default::default()
            })),
        }
    }

    /// Adds a property: its value is part of the initial snapshot.
    pub fn with_property<S: Into<String>, V: Into<State>>(self, name: S, value: V) -> Self {
        let name = name.into();
        let value = value.into();
        {
            let mut lock = self.inner.write();
            lock.initial.insert(name.clone(), value.clone());
            lock.properties.insert(name, value);
        }
        self
    }

    /// Sets the duration percentage spans are resolved against.
    pub fn set_duration(self, duration: f64) -> Self {
        self.inner.write().duration = duration;
        self
    }

    /// Marks the puppet as not yet generated.
    pub fn set_pending(self) -> Self {
        self.inner.write().generated = false;
        self
    }

    /// Marks the puppet as generated.
    pub fn generate(&self) {
        self.inner.write().generated = true;
    }

    /// Discards the puppet.
    pub fn destroy(&self) {
        self.inner.write().destroyed = true;
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of all current properties.
    pub fn get_properties(&self) -> Properties {
        self.inner.read().properties.clone()
    }
}

impl Display for Puppet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lock = self.inner.read();
        let mut names: Vec<&String> = lock.properties.keys().collect();
        names.sort();
        write!(
            f,
            "Puppet ({}) [{}]",
            self.name,
            names
                .iter()
                .map(|name| format!("{}={}", name, lock.properties[*name]))
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

impl Actor for Puppet {
    fn is_generated(&self) -> bool {
        self.inner.read().generated
    }

    fn is_destroyed(&self) -> bool {
        self.inner.read().destroyed
    }

    fn get_initial_state(&self) -> Properties {
        self.inner.read().initial.clone()
    }

    fn get_property(&self, name: &str) -> State {
        self.inner
            .read()
            .properties
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn add_styles(&mut self, styles: &Properties) -> Result<(), Error> {
        let mut lock = self.inner.write();
        if lock.destroyed {
            return Err(ActorError::Destroyed {
                actor: self.name.clone(),
            }
            .into());
        }
        for (name, value) in styles {
            lock.properties.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    fn get_duration(&self) -> f64 {
        self.inner.read().duration
    }
}
