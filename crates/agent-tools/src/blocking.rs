//! Driving async tool code from synchronous callers

use agent_core::{Error, Result};
use std::future::Future;

/// Run `future` to completion, blocking the calling thread
///
/// The future runs on a fresh single-threaded runtime in a scoped thread, so
/// this works whether or not the caller is already inside a Tokio runtime.
pub fn block_on<F>(future: F) -> Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    std::thread::scope(|scope| {
        scope
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| {
                        Error::ProcessingFailed(format!("failed to start tool runtime: {e}"))
                    })?;
                Ok(runtime.block_on(future))
            })
            .join()
            .map_err(|_| Error::ProcessingFailed("blocking tool thread panicked".to_string()))?
    })
}
