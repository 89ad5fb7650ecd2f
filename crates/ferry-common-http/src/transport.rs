//! The seam between forwarding logic and the network.

use crate::error::TransportError;
use crate::response::Response;
use async_trait::async_trait;
use reqwest::Request;
use std::sync::Arc;

/// Sends a prepared request and returns whatever response came back.
///
/// A non-2xx status is a successful exchange; `Err` means no response was
/// received at all. Implementations must be safe to call concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`. The request is borrowed so it can be sent again.
    async fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request).await
    }
}
