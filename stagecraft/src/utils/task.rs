//! Background tasks (clock loops) that `#[stagecraft::runtime]` waits for before returning.
use std::future::Future;

use log::debug;
use parking_lot::{const_mutex, Mutex};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::errors::{Error, RuntimeError};

/// A handler onto a running background task: abort it to stop the task.
pub type TaskHandler = JoinHandle<()>;

/// One completion signal per background task still to be waited for. The sender side is dropped
/// when the task ends, whether it completed or got aborted.
static PENDING: Mutex<Vec<oneshot::Receiver<()>>> = const_mutex(Vec::new());

/// Spawns a background task on the current tokio runtime and registers it, so that the function
/// marked with `#[stagecraft::runtime]` does not return before the task ends.
///
/// # Errors
/// Fails with [`RuntimeError`] when no tokio runtime is running.
///
/// # Example
/// ```
/// use stagecraft::utils::task;
///
/// #[stagecraft::runtime]
/// async fn main() {
///     task::run(async move {
///         // whatever
///     })
///     .unwrap();
/// }
/// ```
pub fn run<F>(future: F) -> Result<TaskHandler, Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let runtime = Handle::try_current().map_err(|_| RuntimeError)?;
    let (done, pending) = oneshot::channel::<()>();

    let handler = runtime.spawn(async move {
        future.await;
        // Nobody waiting is fine.
        let _ = done.send(());
    });
    PENDING.lock().push(pending);
    Ok(handler)
}

/// Waits for every task started with [`run`], including the ones started while waiting.
pub async fn wait_all() {
    loop {
        let pending = std::mem::take(&mut *PENDING.lock());
        if pending.is_empty() {
            return;
        }
        debug!("Waiting for {} background task(s)", pending.len());
        for task in pending {
            // An aborted task drops its sender: done as well.
            let _ = task.await;
        }
    }
}

/// Asynchronously sleeps for the given number of milliseconds.
#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        $crate::utils::tokio::time::sleep($crate::utils::tokio::time::Duration::from_millis(
            $ms as u64,
        ))
        .await
    };
}
