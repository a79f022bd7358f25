//! Spawned server requests polled from the frame loop.

use std::future::Future;

use futures_util::FutureExt;
use futures_util::future::{AbortHandle, Abortable, Aborted};
use tokio::task::JoinHandle;

/// Why a request produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestLost {
    Aborted,
    Panicked,
}

/// A request running on the runtime. Dropping it aborts the request; a
/// result that arrives afterwards has nowhere to go.
#[derive(Debug)]
pub(crate) struct PendingRequest<T> {
    join: Option<JoinHandle<Result<T, Aborted>>>,
    abort_handle: AbortHandle,
}

impl<T: Send + 'static> PendingRequest<T> {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (abort_handle, abort_registration) = AbortHandle::new_pair();
        let join = tokio::spawn(Abortable::new(future, abort_registration));
        Self {
            join: Some(join),
            abort_handle,
        }
    }

    /// The result, once. `None` while running and after it was taken.
    pub(crate) fn try_take(&mut self) -> Option<Result<T, RequestLost>> {
        if !self.join.as_ref()?.is_finished() {
            return None;
        }
        let result = self.join.as_mut()?.now_or_never()?;
        self.join = None;
        Some(match result {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(Aborted)) => Err(RequestLost::Aborted),
            Err(err) => {
                tracing::error!("server request task failed: {err}");
                Err(RequestLost::Panicked)
            }
        })
    }

    pub(crate) fn abort(&self) {
        self.abort_handle.abort();
    }
}

impl<T> Drop for PendingRequest<T> {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}
