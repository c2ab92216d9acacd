use std::fmt::Debug;

use log::debug;

use crate::actors::{Actor, Properties};
use crate::animations::Pose;
use crate::errors::Error;

/// An interpolation engine: computes and applies the in-between values of a pose.
pub trait Interpolator: Debug + Send + Sync {
    /// Prepares a pose for its first step: the engine is expected to record the baseline the
    /// pose animates from with [`Pose::set_start_state`].
    fn init(&self, actor: &dyn Actor, pose: &mut Pose);

    /// Applies the pose to the actor at the given progress ratio (0.0 to 1.0).
    fn step(
        &self,
        actor: &mut dyn Actor,
        pose: &mut Pose,
        ratio: f32,
        duration: f64,
    ) -> Result<(), Error>;

    /// Notifies the engine that a layered timeline stopped driving the actor.
    fn halt(&self, actor: &mut dyn Actor);
}

/// The default [`Interpolator`]: eases the ratio and interpolates each property from the value
/// the actor had when the pose started towards its target.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tween;

impl Interpolator for Tween {
    fn init(&self, actor: &dyn Actor, pose: &mut Pose) {
        let baseline: Properties = pose
            .get_animate()
            .keys()
            .map(|name| (name.clone(), actor.get_property(name)))
            .collect();
        pose.set_start_state(baseline);
    }

    fn step(
        &self,
        actor: &mut dyn Actor,
        pose: &mut Pose,
        ratio: f32,
        _: f64,
    ) -> Result<(), Error> {
        let progress = pose.get_easing().ease(ratio);
        let targets = pose.get_end_state().unwrap_or(pose.get_animate());
        let baseline = pose.get_start_state();

        let current: Properties = targets
            .iter()
            .map(|(name, target)| {
                let from = baseline
                    .and_then(|state| state.get(name))
                    .cloned()
                    .unwrap_or_default();
                (name.clone(), from.interpolate(target, progress))
            })
            .collect();

        if !current.is_empty() {
            actor.add_styles(&current)?;
        }
        pose.set_current_state(current);
        Ok(())
    }

    fn halt(&self, actor: &mut dyn Actor) {
        debug!("Layers released for {}", actor);
    }
}
