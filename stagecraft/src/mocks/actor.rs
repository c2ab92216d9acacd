use std::fmt::{Display, Formatter};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::actors::{Actor, Properties};
use crate::errors::{ActorError, Error};
use crate::utils::State;

/// Mock [`Actor`] for testing purposes: records every style applied and may reject them.
#[derive(Clone, Debug)]
pub struct MockActor {
    name: String,
    inner: Arc<RwLock<MockActorState>>,
}

#[derive(Debug)]
struct MockActorState {
    generated: bool,
    destroyed: bool,
    failing: bool,
    duration: f64,
    initial: Properties,
    applied: Vec<Properties>,
}

impl MockActor {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(RwLock::new(MockActorState {
                generated: true,
                destroyed: false,
                failing: false,
                duration: 0.0,
                initial: Properties::new(),
                applied: vec![],
            })),
        }
    }

    pub fn set_failing(self, failing: bool) -> Self {
        self.inner.write().failing = failing;
        self
    }

    pub fn set_duration(self, duration: f64) -> Self {
        self.inner.write().duration = duration;
        self
    }

    pub fn set_initial<S: Into<String>, V: Into<State>>(self, name: S, value: V) -> Self {
        self.inner.write().initial.insert(name.into(), value.into());
        self
    }

    pub fn set_generated(&self, generated: bool) {
        self.inner.write().generated = generated;
    }

    pub fn destroy(&self) {
        self.inner.write().destroyed = true;
    }

    /// All the styles applied so far, in order.
    pub fn get_applied(&self) -> Vec<Properties> {
        self.inner.read().applied.clone()
    }

    /// The last value applied to a property.
    pub fn get_last(&self, name: &str) -> Option<State> {
        self.inner
            .read()
            .applied
            .iter()
            .rev()
            .find_map(|styles| styles.get(name).cloned())
    }
}

impl Display for MockActor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockActor ({})", self.name)
    }
}

impl Actor for MockActor {
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
        self.get_last(name)
            .or_else(|| self.inner.read().initial.get(name).cloned())
            .unwrap_or_default()
    }

    fn add_styles(&mut self, styles: &Properties) -> Result<(), Error> {
        let mut lock = self.inner.write();
        if lock.failing {
            let mut names: Vec<&String> = styles.keys().collect();
            names.sort();
            return Err(ActorError::InvalidProperty {
                property: names.first().map_or(String::new(), |name| name.to_string()),
                info: String::from("rejected by mock"),
            }
            .into());
        }
        lock.applied.push(styles.clone());
        Ok(())
    }

    fn get_duration(&self) -> f64 {
        self.inner.read().duration
    }
}
