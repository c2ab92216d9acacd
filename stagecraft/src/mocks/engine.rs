use std::sync::Arc;

use parking_lot::Mutex;

use crate::actors::{Actor, Properties};
use crate::animations::{Interpolator, Pose};
use crate::errors::Error;

/// An engine call, as recorded by [`MockEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Init { begin: f64, span: f64 },
    Step { ratio: f32, begin: f64, span: f64 },
    Halt,
}

/// Mock [`Interpolator`] for testing purposes: records every call it receives.
///
/// Clones share the same record, so a test keeps a clone of the engine handed to a timeline.
#[derive(Clone, Debug, Default)]
pub struct MockEngine {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockEngine {
    pub fn get_calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// The recorded steps only, as `(ratio, begin, span)`.
    pub fn get_steps(&self) -> Vec<(f32, f64, f64)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match *call {
                Call::Step { ratio, begin, span } => Some((ratio, begin, span)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Interpolator for MockEngine {
    fn init(&self, _: &dyn Actor, pose: &mut Pose) {
        pose.set_start_state(Properties::new());
        self.calls.lock().push(Call::Init {
            begin: pose.get_begin(),
            span: pose.get_span(),
        });
    }

    fn step(&self, _: &mut dyn Actor, pose: &mut Pose, ratio: f32, _: f64) -> Result<(), Error> {
        pose.set_current_state(pose.get_animate().clone());
        self.calls.lock().push(Call::Step {
            ratio,
            begin: pose.get_begin(),
            span: pose.get_span(),
        });
        Ok(())
    }

    fn halt(&self, _: &mut dyn Actor) {
        self.calls.lock().push(Call::Halt);
    }
}
