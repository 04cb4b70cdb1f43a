//! Request-scoped context passed from the transport layer down to the
//! store and the prediction clients.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::{Error, Result};

/// Carries the cancellation signal of a single request.
///
/// Handlers derive one per request from the server-wide shutdown token, so
/// cancelling the root aborts every in-flight enrichment.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
}

impl RequestContext {
    /// A detached context that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context cancelled whenever `parent` is.
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            cancel: parent.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    /// Fail fast with `Error::Cancelled` if the request is already gone.
    pub fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
