//! Fakes shared by unit tests.

use crate::error::TransportError;
use crate::response::{Body, Response};
use crate::transport::Transport;
use async_trait::async_trait;
use ferry_common_async::Sleeper;
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, StatusCode};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Replays a fixed list of outcomes, one per `send`.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Response, TransportError>>>,
    attempts: AtomicU32,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<Response, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            attempts: AtomicU32::new(0),
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _request: &Request) -> Result<Response, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".to_string())))
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub(crate) struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    pub(crate) fn durations(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.0.lock().unwrap().push(duration);
    }
}

/// Never wakes up.
pub(crate) struct StalledSleeper;

#[async_trait]
impl Sleeper for StalledSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await
    }
}

pub(crate) fn request() -> Request {
    Request::new(Method::GET, "http://upstream.test/resource".parse().unwrap())
}

pub(crate) fn response(status: u16, body: &'static str) -> Response {
    Response::new(
        StatusCode::from_u16(status).unwrap(),
        HeaderMap::new(),
        Body::from_bytes(body),
    )
}
