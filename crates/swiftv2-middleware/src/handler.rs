//! IP configs handler abstraction
//!
//! The default allocation handler, its paired release handler and the
//! middleware itself all implement [`IpConfigsHandler`], so the middleware can
//! wrap any handler and can in turn be wrapped.

use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::types::{IpConfigsRequest, IpConfigsResponse};
use std::sync::Arc;

/// Handles one IP configs request
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
/// Implementations should observe `ctx` for cancellation.
#[async_trait::async_trait]
pub trait IpConfigsHandler: Send + Sync {
    /// Serve the request
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: IpConfigsRequest,
    ) -> Result<IpConfigsResponse, HandlerError>;
}

#[async_trait::async_trait]
impl<H> IpConfigsHandler for Arc<H>
where
    H: IpConfigsHandler + ?Sized,
{
    async fn handle(
        &self,
        ctx: &RequestContext,
        request: IpConfigsRequest,
    ) -> Result<IpConfigsResponse, HandlerError> {
        (**self).handle(ctx, request).await
    }
}
