//! Forwarding: send, validate the status, hand the body to a consumer.

use crate::error::HttpError;
use crate::handler::BodyHandler;
use crate::retry::{RetryPolicy, RetryingSender};
use crate::transport::Transport;
use ferry_common_async::{CancellationToken, Sleeper, TokioSleeper};
use reqwest::Request;
use tracing::debug;

/// Sends requests and relays validated responses to a [`BodyHandler`].
#[derive(Debug, Clone)]
pub struct Forwarder<T, S = TokioSleeper> {
    sender: RetryingSender<T, S>,
}

impl<T: Transport> Forwarder<T> {
    /// Forward through `transport` with the default retry policy.
    pub fn new(transport: T) -> Self {
        Self {
            sender: RetryingSender::new(transport),
        }
    }

    /// Forward through `transport` with a custom retry policy.
    pub fn with_policy(transport: T, policy: RetryPolicy) -> Self {
        Self {
            sender: RetryingSender::new(transport).with_policy(policy),
        }
    }
}

impl<T, S> From<RetryingSender<T, S>> for Forwarder<T, S> {
    fn from(sender: RetryingSender<T, S>) -> Self {
        Self { sender }
    }
}

impl<T: Transport, S: Sleeper> Forwarder<T, S> {
    pub fn sender(&self) -> &RetryingSender<T, S> {
        &self.sender
    }

    /// Send `request` and relay the response.
    ///
    /// A 2xx response is passed, unread, to `handler` and the handler's
    /// result is returned. Any other status drains the body into
    /// [`HttpError::Status`] without calling the handler. The response is
    /// released before this returns, whichever way it goes.
    pub async fn forward(
        &self,
        request: &Request,
        handler: Option<&mut (dyn BodyHandler + '_)>,
        cancel: &CancellationToken,
    ) -> Result<(), HttpError> {
        let response = self.sender.send(request, cancel).await?;
        let (status, headers, mut body) = response.into_parts();

        if !status.is_success() {
            let bytes = body.read_all().await.map_err(HttpError::BodyRead)?;
            debug!(%status, body_len = bytes.len(), "rejecting unsuccessful response");
            return Err(HttpError::Status { status, body: bytes });
        }

        match handler {
            Some(handler) => handler
                .handle(&headers, &mut body)
                .await
                .map_err(HttpError::Handler),
            None => {
                debug!(%status, "no handler, discarding body");
                Ok(())
            }
        }
    }
}
