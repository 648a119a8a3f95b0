//! Per-call context forwarded untouched through every decorator.

use std::future;
use tokio::sync::watch;
use uuid::Uuid;

/// Opaque request context.
///
/// Carries a request ID for log correlation and an optional cancellation
/// signal. Cloning is cheap; clones observe the same cancellation.
#[derive(Debug, Clone)]
pub struct Context {
    request_id: Uuid,
    cancel: Option<watch::Receiver<bool>>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel: None,
        }
    }

    /// A cancellable context and the handle that cancels it.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            request_id: Uuid::new_v4(),
            cancel: Some(rx),
        };
        (ctx, CancelHandle { tx })
    }

    /// Request ID assigned when the context was created.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the context is cancelled. Never resolves for a
    /// background context, or if the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.cancel else {
            return future::pending().await;
        };
        let mut rx = rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            future::pending::<()>().await;
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

/// Cancels the [`Context`] it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}
