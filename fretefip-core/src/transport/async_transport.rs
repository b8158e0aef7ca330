use async_trait::async_trait;

use super::structs::{TransportError, TransportRequest, TransportResponse};

/// Async version of [`Transport`](crate::Transport) for non-blocking I/O.
///
/// Same contract: one exchange per call, every status code is a response,
/// only transport-level failures are errors.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send(&self, request: &TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for std::sync::Arc<T> {
    async fn send(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        (**self).send(request).await
    }
}
