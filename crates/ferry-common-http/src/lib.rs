//! Retrying HTTP forwarding for Ferry.
//!
//! A [`Forwarder`] sends a prepared request through a [`Transport`],
//! retrying transport failures with exponential backoff, rejects responses
//! outside the 2xx range and hands successful bodies to a [`BodyHandler`].

pub mod client;
pub mod error;
pub mod forward;
pub mod handler;
pub mod json;
pub mod query;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{build_client, HttpClient, HttpConfig};
pub use error::{BoxError, HttpError, TransportError};
pub use forward::Forwarder;
pub use handler::{BodyHandler, BodyTooLarge, CollectBody, CopyTo};
pub use json::to_json_vec;
pub use query::{gen_query_uri, gen_url};
pub use request::{headers, RequestBuilder};
pub use response::{Body, Response};
pub use retry::{RetryPolicy, RetryingSender};
pub use transport::Transport;

pub use reqwest::{header::HeaderMap, Method, Request, StatusCode};
