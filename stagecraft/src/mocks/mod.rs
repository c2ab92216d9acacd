//! Mocked actors and engines, for tests.

pub mod actor;
pub mod engine;
