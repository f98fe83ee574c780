//! HTTP transport abstraction for testability.
//!
//! The session never relies on an implicit cookie jar. When a request is
//! made on behalf of a session, the token is handed to the transport and
//! sent as an explicit `Cookie: uid=...` header.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::COOKIE;

use crate::error::{TransferError, TransferResult};
use crate::session::SessionToken;

/// Upper bound on how much of an error body is kept for reporting.
const MAX_ERROR_BODY: u64 = 4 * 1024;

/// A response with a streaming body.
pub struct HttpResponse {
    /// Numeric HTTP status code.
    pub status: u16,
    body: Box<dyn Read + Send>,
}

impl HttpResponse {
    /// Create a response from a status code and a body reader.
    pub fn new(status: u16, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Returns true if the status is exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Borrow the body reader for streaming.
    pub fn body_mut(&mut self) -> &mut (dyn Read + Send) {
        self.body.as_mut()
    }

    /// Read the whole body into memory.
    pub fn into_bytes(mut self, url: &str) -> TransferResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.body
            .read_to_end(&mut bytes)
            .map_err(|e| TransferError::Transport {
                url: url.to_string(),
                reason: format!("Failed to read response: {}", e),
            })?;
        Ok(bytes)
    }

    /// Read at most a few KiB of the body as text, for error reports.
    pub fn into_error_text(self) -> String {
        let mut bytes = Vec::new();
        // A body that breaks off midway still yields what was read so far
        let _ = self.body.take(MAX_ERROR_BODY).read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).trim().to_string()
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Trait for the HTTP operations a transfer session needs.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock transports in tests. Implementations must not follow a
/// cookie jar of their own; the only cookie sent is the one derived from
/// `token`.
pub trait HttpTransport: Send + Sync {
    /// Performs an HTTP GET request.
    fn get(&self, url: &str, token: Option<&SessionToken>) -> TransferResult<HttpResponse>;

    /// Performs an HTTP POST with a form-encoded body.
    fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        token: Option<&SessionToken>,
    ) -> TransferResult<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str, token: Option<&SessionToken>) -> TransferResult<HttpResponse> {
        (**self).get(url, token)
    }

    fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        token: Option<&SessionToken>,
    ) -> TransferResult<HttpResponse> {
        (**self).post_form(url, fields, token)
    }
}

/// Real HTTP transport implementation using reqwest.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Creates a new transport with the client's default timeout.
    pub fn new() -> TransferResult<Self> {
        Self::build(None)
    }

    /// Creates a new transport with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> TransferResult<Self> {
        Self::build(Some(timeout))
    }

    /// Configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn build(timeout: Option<Duration>) -> TransferResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransferError::Transport {
            url: String::new(),
            reason: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, timeout })
    }

    fn send(
        &self,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
        token: Option<&SessionToken>,
    ) -> TransferResult<HttpResponse> {
        let request = match token {
            Some(token) => request.header(COOKIE, token.cookie()),
            None => request,
        };

        let response = request.send().map_err(|e| TransferError::Transport {
            url: url.to_string(),
            reason: if e.is_timeout() {
                format!("timed out: {}", e)
            } else {
                e.to_string()
            },
        })?;

        Ok(HttpResponse::new(response.status().as_u16(), response))
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, token: Option<&SessionToken>) -> TransferResult<HttpResponse> {
        self.send(url, self.client.get(url), token)
    }

    fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        token: Option<&SessionToken>,
    ) -> TransferResult<HttpResponse> {
        self.send(url, self.client.post(url).form(fields), token)
    }
}
