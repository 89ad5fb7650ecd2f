//! HTTP request builder.

use crate::error::HttpError;
use crate::json::to_json_vec;
use crate::query::gen_query_uri;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request, Url};
use serde::Serialize;

/// Common HTTP headers.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const X_REQUEST_ID: &str = "x-request-id";
}

/// Assembles a [`Request`] from an endpoint, query parameters, headers and
/// an optional JSON body.
///
/// Errors are deferred to [`RequestBuilder::build`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    endpoint: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            error: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a header. Repeated names are all sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add bearer token authorization.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.header(AUTHORIZATION.as_str(), value)
    }

    /// Set a JSON body and its content type.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match to_json_vec(value) {
            Ok(bytes) => {
                self.body = Some(bytes);
                self.header(CONTENT_TYPE.as_str(), headers::CONTENT_TYPE_JSON)
            }
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    /// Set a raw body.
    pub fn body(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Some(bytes.into());
        self
    }

    /// Build the request.
    pub fn build(self) -> Result<Request, HttpError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let params = self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        let url: Url = gen_query_uri(&self.endpoint, params)?.parse()?;
        let mut request = Request::new(self.method, url);

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HttpError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeader(format!("{name}: {value}")))?;
            request.headers_mut().append(header_name, header_value);
        }

        if let Some(body) = self.body {
            *request.body_mut() = Some(body.into());
        }

        Ok(request)
    }
}
