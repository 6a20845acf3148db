//! Network exchange as seen by the capture source

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use super::CaptureError;

/// Deferred response body. `Ok(None)` means the source had no content.
pub type BodyFetch = Pin<Box<dyn Future<Output = Result<Option<String>, CaptureError>> + Send>>;

pub struct CapturedResponse {
    pub status: u16,
    pub mime_type: String,
    pub body: BodyFetch,
}

impl CapturedResponse {
    /// Response whose body is already in memory
    pub fn with_body(status: u16, mime_type: impl Into<String>, body: Option<String>) -> Self {
        Self::with_fetch(status, mime_type, async move { Ok(body) })
    }

    /// Response whose body is retrieved on demand
    pub fn with_fetch<F>(status: u16, mime_type: impl Into<String>, fetch: F) -> Self
    where
        F: Future<Output = Result<Option<String>, CaptureError>> + Send + 'static,
    {
        Self {
            status,
            mime_type: mime_type.into(),
            body: Box::pin(fetch),
        }
    }
}

impl fmt::Debug for CapturedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedResponse")
            .field("status", &self.status)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct NetworkExchange {
    pub request_url: String,
    pub response: Option<CapturedResponse>,
}

impl NetworkExchange {
    pub fn new(request_url: impl Into<String>, response: CapturedResponse) -> Self {
        Self { request_url: request_url.into(), response: Some(response) }
    }

    /// Request that never got a response (blocked, aborted)
    pub fn without_response(request_url: impl Into<String>) -> Self {
        Self { request_url: request_url.into(), response: None }
    }

    pub fn with_body(
        request_url: impl Into<String>,
        status: u16,
        mime_type: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(request_url, CapturedResponse::with_body(status, mime_type, Some(body.into())))
    }
}
