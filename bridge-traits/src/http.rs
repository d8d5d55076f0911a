//! HTTP transport capability
//!
//! The cache never talks to the network directly. It asks an [`HttpClient`]
//! for a streaming response and decides on its own what a status code means.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::Result;

/// A `GET` for one remote resource.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Upper bound for the whole exchange, body included
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge a whole header map, later keys overwrite earlier ones.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// Status line and headers of a response whose body has not been read yet.
///
/// A non-2xx status is reported here rather than as an error so the caller
/// owns the status policy.
pub struct HttpStreamResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Box<dyn core_async::io::AsyncRead + Send + Unpin>,
}

impl HttpStreamResponse {
    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Declared body length, when the server sent one.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse().ok())
    }
}

impl fmt::Debug for HttpStreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Byte transfer from a URL.
///
/// Implementations handle TLS, redirects and connection pooling. They must
/// not retry inside `download_stream`: the body is written to disk as it
/// arrives and a silent restart would corrupt the destination.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest};
///
/// async fn status_of(client: &dyn HttpClient, url: &str) -> Result<u16> {
///     let response = client.download_stream(HttpRequest::get(url)).await?;
///     Ok(response.status)
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send the request and hand back the body as a stream.
    ///
    /// # Errors
    ///
    /// Fails if the connection, TLS handshake or request fails before a
    /// status line arrives. Later read errors surface from the body.
    async fn download_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let mut extra = HashMap::new();
        extra.insert("X-Device".to_string(), "tv".to_string());

        let request = HttpRequest::get("https://example.com/a.mp4")
            .header("User-Agent", "test")
            .headers(extra)
            .timeout(Duration::from_secs(30));

        assert_eq!(request.url, "https://example.com/a.mp4");
        assert_eq!(request.headers.get("User-Agent"), Some(&"test".to_string()));
        assert_eq!(request.headers.get("X-Device"), Some(&"tv".to_string()));
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_stream_response_status_and_length() {
        let mut headers = HashMap::new();
        headers.insert("Content-Length".to_string(), "1024".to_string());
        let response = HttpStreamResponse {
            status: 206,
            headers,
            body: Box::new(&b""[..]),
        };

        assert!(response.is_success());
        assert_eq!(response.content_length(), Some(1024));

        let not_found = HttpStreamResponse {
            status: 404,
            headers: HashMap::new(),
            body: Box::new(&b""[..]),
        };
        assert!(!not_found.is_success());
        assert_eq!(not_found.content_length(), None);
    }
}
