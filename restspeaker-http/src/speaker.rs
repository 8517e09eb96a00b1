//! The transport facade.

use http::Method;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::{HttpTransport, Options, ReqwestTransport, Response, Result, TransportRequest};

/// Mime type sent when a caller does not choose one.
pub const DEFAULT_MIME_TYPE: &str = "text/html";

/// The user agent sent when a caller does not choose one.
pub fn default_user_agent() -> String {
    format!("RESTSpeaker/{} (Rust)", env!("CARGO_PKG_VERSION"))
}

/// Thin facade over an [`HttpTransport`].
///
/// Every call gets a `User-Agent` and `Content-Type` unless the caller
/// supplied them, and the most recent response is kept for inspection.
pub struct HttpSpeaker {
    transport: Arc<dyn HttpTransport>,
    mime_type: String,
    user_agent: String,
    last_response: Mutex<Option<Response>>,
}

impl HttpSpeaker {
    /// Create a facade over an injected transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            user_agent: default_user_agent(),
            last_response: Mutex::new(None),
        }
    }

    /// Create a facade over a reqwest transport rooted at `base_uri`.
    ///
    /// An empty base means every call must use an absolute URI.
    pub fn with_base_uri(base_uri: impl Into<String>) -> Result<Self> {
        let transport = ReqwestTransport::with_base_url(base_uri)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Set the default `Content-Type`.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Set the default `User-Agent`.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Fill in `User-Agent` and `Content-Type` where `options` lacks them.
    pub fn merge_default_options(&self, mut options: Options) -> Options {
        if !options.has_header("User-Agent") {
            options.set_header("User-Agent", self.user_agent.as_str());
        }
        if !options.has_header("Content-Type") {
            options.set_header("Content-Type", self.mime_type.as_str());
        }
        options
    }

    /// Send a request with any method.
    ///
    /// Transport errors are returned as-is and leave the last response
    /// untouched.
    pub async fn request(&self, method: Method, uri: &str, options: Options) -> Result<Response> {
        let options = self.merge_default_options(options);
        debug!(method = %method, uri, "Sending HTTP request");

        let response = self
            .transport
            .send(TransportRequest::new(method, uri, options))
            .await?;

        debug!(status = %response.status(), uri, "Received HTTP response");
        *self.last_response.lock() = Some(response.clone());

        Ok(response)
    }

    pub async fn get(&self, uri: &str, options: Options) -> Result<Response> {
        self.request(Method::GET, uri, options).await
    }

    pub async fn post(&self, uri: &str, options: Options) -> Result<Response> {
        self.request(Method::POST, uri, options).await
    }

    pub async fn put(&self, uri: &str, options: Options) -> Result<Response> {
        self.request(Method::PUT, uri, options).await
    }

    pub async fn patch(&self, uri: &str, options: Options) -> Result<Response> {
        self.request(Method::PATCH, uri, options).await
    }

    pub async fn delete(&self, uri: &str, options: Options) -> Result<Response> {
        self.request(Method::DELETE, uri, options).await
    }

    pub async fn head(&self, uri: &str, options: Options) -> Result<Response> {
        self.request(Method::HEAD, uri, options).await
    }

    /// The most recently received response.
    pub fn last_response(&self) -> Option<Response> {
        self.last_response.lock().clone()
    }

    /// Status of the most recent response, or `-1` before any response.
    pub fn last_status_code(&self) -> i32 {
        self.last_response
            .lock()
            .as_ref()
            .map_or(-1, |response| i32::from(response.status().as_u16()))
    }
}

impl std::fmt::Debug for HttpSpeaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSpeaker")
            .field("mime_type", &self.mime_type)
            .field("user_agent", &self.user_agent)
            .field("last_status_code", &self.last_status_code())
            .finish_non_exhaustive()
    }
}
