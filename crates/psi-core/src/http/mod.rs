//! HTTP transport.
//!
//! Every outbound call (PageSpeed API, sitemap fetch, content probe) goes
//! through [`HttpClient`]. The production implementation is [`CurlClient`];
//! it blocks the calling thread, so async callers run it via `spawn_blocking`.

mod curl_client;
mod parse;
mod types;

pub use curl_client::CurlClient;
pub use types::{HttpRequest, HttpResponse, Method, TransportError};

use std::sync::Arc;

/// Executes one request and returns the final response (after redirects).
///
/// Non-2xx statuses are responses, not errors; only failures to obtain a
/// response at all are [`TransportError`]s.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
