//! Request header capability
//!
//! Hosts that need per-request headers (signed URLs, bearer tokens) inject a
//! [`HeaderResolver`]. It is asked once per download, right before the
//! transfer starts, so short-lived credentials stay fresh.

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;

pub type Headers = HashMap<String, String>;

/// Error reported by a [`HeaderResolver`].
pub type HeaderError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait HeaderResolver: Send + Sync {
    async fn resolve_headers(&self) -> Result<Headers, HeaderError>;
}

/// Sends no extra headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeaders;

#[async_trait]
impl HeaderResolver for NoHeaders {
    async fn resolve_headers(&self) -> Result<Headers, HeaderError> {
        Ok(Headers::new())
    }
}

/// Sends the same headers with every request.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(Headers);

impl StaticHeaders {
    pub fn new(headers: Headers) -> Self {
        Self(headers)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl HeaderResolver for StaticHeaders {
    async fn resolve_headers(&self) -> Result<Headers, HeaderError> {
        Ok(self.0.clone())
    }
}

/// Any `Fn() -> impl Future<Output = Result<Headers, HeaderError>>` works as
/// a resolver.
#[async_trait]
impl<F, Fut> HeaderResolver for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Headers, HeaderError>> + Send + 'static,
{
    async fn resolve_headers(&self) -> Result<Headers, HeaderError> {
        (self)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_and_empty_resolvers() {
        assert!(NoHeaders.resolve_headers().await.unwrap().is_empty());

        let headers = StaticHeaders::default()
            .with("Authorization", "Bearer abc")
            .resolve_headers()
            .await
            .unwrap();
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_closure_resolver() {
        let resolver = || async {
            let mut headers = Headers::new();
            headers.insert("X-Signature".to_string(), "sig".to_string());
            Ok::<_, HeaderError>(headers)
        };

        let headers = resolver.resolve_headers().await.unwrap();
        assert_eq!(headers["X-Signature"], "sig");

        let failing = || async { Err::<Headers, HeaderError>("token expired".into()) };
        let err = failing.resolve_headers().await.unwrap_err();
        assert_eq!(err.to_string(), "token expired");
    }
}
