use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Runtime error: No tokio runtime is running, try #[stagecraft::runtime].
    RuntimeError,
    /// Actor error: {source}.
    ActorError { source: ActorError },
    /// Clock error: {source}.
    ClockError { source: ClockError },
    /// Invalid span '{value}': expected a number of milliseconds or a percentage
    InvalidSpan { value: String },
    /// Unknown error: {info}.
    Unknown { info: String },
}

impl From<ActorError> for Error {
    fn from(value: ActorError) -> Self {
        error!("Actor error: {}", value);
        Self::ActorError { source: value }
    }
}

impl From<ClockError> for Error {
    fn from(value: ClockError) -> Self {
        Self::ClockError { source: value }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ActorError {
    /// Actor '{actor}' has been destroyed
    Destroyed { actor: String },
    /// Property '{property}' cannot be applied - {info}
    InvalidProperty { property: String, info: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClockError {
    /// Clock is already running
    AlreadyRunning,
}
