//! Per-request context
//!
//! Carries the caller's cancellation signal into every lookup and downstream
//! handler call made while serving one request. There is no internal timeout;
//! deadlines are the caller's to enforce by cancelling the token.

use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The request was cancelled by its caller
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("request cancelled")]
pub struct Cancelled;

/// Context shared by all work done for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel_token: CancellationToken,
}

impl RequestContext {
    /// A context that is never cancelled unless [`RequestContext::cancel`] is called
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context driven by an existing cancellation token
    #[must_use]
    pub fn with_cancel_token(cancel_token: CancellationToken) -> Self {
        Self { cancel_token }
    }

    /// Cancel the request
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Whether the request has been cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Token for handing to downstream work
    #[must_use]
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }

    /// Run `fut` unless the request is cancelled first.
    ///
    /// An already-cancelled context never polls `fut`.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, Cancelled>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            () = self.cancel_token.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}
