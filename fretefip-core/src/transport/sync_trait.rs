use super::structs::{TransportError, TransportRequest, TransportResponse};

/// Blocking HTTP transport used by [`Negotiator`](crate::Negotiator).
///
/// Implementations perform exactly one HTTP exchange per call and must hand
/// back every status code the server answers with, including 4xx and 5xx;
/// only failures that leave no response (DNS, connect, timeout, broken body)
/// are errors. Timeouts are the implementation's responsibility.
pub trait Transport: Send + Sync {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(request)
    }
}
