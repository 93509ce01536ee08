//! Release of the default allocation on failure

use crate::context::RequestContext;
use crate::handler::IpConfigsHandler;
use crate::types::IpConfigsRequest;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Releases the default allocation unless disarmed.
///
/// Armed once the default handler has been called for a multitenant pod.
/// On the success path the middleware disarms it; on every failure path it
/// calls [`RollbackGuard::release`]. If the request future is dropped while
/// the guard is still armed, the release is spawned on the current runtime.
pub(crate) struct RollbackGuard<F>
where
    F: IpConfigsHandler + ?Sized + 'static,
{
    pending: Option<(Arc<F>, IpConfigsRequest)>,
}

impl<F> RollbackGuard<F>
where
    F: IpConfigsHandler + ?Sized + 'static,
{
    pub(crate) fn arm(failure_handler: Arc<F>, request: IpConfigsRequest) -> Self {
        Self {
            pending: Some((failure_handler, request)),
        }
    }

    /// Keep the allocation
    pub(crate) fn disarm(mut self) {
        self.pending = None;
    }

    /// Release the allocation now
    pub(crate) async fn release(mut self) {
        if let Some((failure_handler, request)) = self.pending.take() {
            release_allocation(failure_handler.as_ref(), request).await;
        }
    }
}

impl<F> Drop for RollbackGuard<F>
where
    F: IpConfigsHandler + ?Sized + 'static,
{
    fn drop(&mut self) {
        let Some((failure_handler, request)) = self.pending.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(
                    "[SWIFTv2Middleware] request for pod interface {} abandoned, releasing default IP config",
                    request.pod_interface_id
                );
                handle.spawn(async move {
                    release_allocation(failure_handler.as_ref(), request).await;
                });
            }
            Err(e) => {
                error!(
                    "[SWIFTv2Middleware] no runtime to release default IP config for pod interface {} : {}",
                    request.pod_interface_id, e
                );
            }
        }
    }
}

/// Call the failure handler with the forwarded request.
///
/// Runs under a fresh context so it is not short-circuited by the
/// cancellation that may have triggered it. Errors are logged only; the
/// error that caused the release is the one reported to the caller.
async fn release_allocation<F>(failure_handler: &F, request: IpConfigsRequest)
where
    F: IpConfigsHandler + ?Sized,
{
    info!(
        "[SWIFTv2Middleware] releasing default IP config for pod interface {}",
        request.pod_interface_id
    );
    if let Err(e) = failure_handler.handle(&RequestContext::new(), request).await {
        error!("[SWIFTv2Middleware] failed to release default IP config : {}", e);
    }
}
