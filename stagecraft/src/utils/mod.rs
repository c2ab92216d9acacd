pub use log;
pub use tokio;
pub use tokio::time::sleep;

pub use crate::utils::events::{EventHandler, EventManager};
pub use crate::utils::scale::Scalable;
pub use crate::utils::state::State;

pub mod events;
mod scale;
mod state;
pub mod task;
