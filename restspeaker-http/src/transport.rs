//! The transport seam and its reqwest implementation.

use async_trait::async_trait;
use http::{HeaderName, HeaderValue, Method};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use crate::options::{keys, value_to_string};
use crate::{Options, Response, Result, TransportConfig, TransportError};

/// One outgoing request, as handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub uri: String,
    pub options: Options,
}

impl TransportRequest {
    pub fn new(method: Method, uri: impl Into<String>, options: Options) -> Self {
        Self {
            method,
            uri: uri.into(),
            options,
        }
    }
}

/// Anything that can carry a request to a server and bring back a response.
///
/// Connection handling, TLS, redirects, retries and timeouts all belong to
/// the implementation; the facades only forward its errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<Response>;
}

/// Transport backed by a pooled [`reqwest::Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    config: Arc<TransportConfig>,
}

impl ReqwestTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.gzip)
            .brotli(config.brotli);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let inner = builder
            .build()
            .map_err(|e| TransportError::RequestBuild(e.to_string()))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Create a transport whose relative URIs resolve against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(TransportConfig::builder().base_url(base_url).build())
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Resolve the request URI and append `query` options.
    fn build_url(&self, uri: &str, options: &Options) -> Result<url::Url> {
        let mut url = match self.config.base_url.as_deref() {
            Some(base) if !base.is_empty() => url::Url::parse(base)
                .and_then(|base| base.join(uri))
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", uri, e)))?,
            _ => url::Url::parse(uri)
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", uri, e)))?,
        };

        if let Some(query) = options.get(keys::QUERY) {
            let params = query
                .as_object()
                .ok_or_else(|| TransportError::invalid_option(keys::QUERY, "expected an object"))?;
            if !params.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in params {
                    pairs.append_pair(key, &value_to_string(value));
                }
            }
        }

        Ok(url)
    }

    /// Translate options into a reqwest request.
    fn build_request(&self, request: TransportRequest) -> Result<reqwest::Request> {
        let TransportRequest {
            method,
            uri,
            options,
        } = request;
        let url = self.build_url(&uri, &options)?;
        let mut builder = self.inner.request(method, url);

        if let Some(headers) = options.get(keys::HEADERS) {
            let headers = headers.as_object().ok_or_else(|| {
                TransportError::invalid_option(keys::HEADERS, "expected an object")
            })?;
            for (name, value) in headers {
                let header = header_name(name)?;
                match value {
                    Value::Array(values) => {
                        for value in values {
                            builder = builder.header(header.clone(), header_value(name, value)?);
                        }
                    }
                    value => builder = builder.header(header, header_value(name, value)?),
                }
            }
        }

        let credentials = match options.get(keys::AUTH) {
            Some(_) => {
                let (username, password) = options.basic_auth_credentials().ok_or_else(|| {
                    TransportError::invalid_option(keys::AUTH, "expected [username, password]")
                })?;
                Some(basic_auth(username, password)?)
            }
            None => None,
        };

        let has_content_type = options.has_header("Content-Type");
        if let Some(json) = options.get(keys::JSON) {
            let bytes = serde_json::to_vec(json)
                .map_err(|e| TransportError::invalid_option(keys::JSON, e.to_string()))?;
            if !has_content_type {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
            }
            builder = builder.body(bytes);
        } else if let Some(form) = options.get(keys::FORM_PARAMS) {
            let params = form.as_object().ok_or_else(|| {
                TransportError::invalid_option(keys::FORM_PARAMS, "expected an object")
            })?;
            let pairs: Vec<(&str, String)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), value_to_string(v)))
                .collect();
            let encoded = serde_urlencoded::to_string(&pairs)
                .map_err(|e| TransportError::invalid_option(keys::FORM_PARAMS, e.to_string()))?;
            if !has_content_type {
                builder =
                    builder.header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            builder = builder.body(encoded);
        } else if let Some(body) = options.get(keys::BODY) {
            builder = builder.body(value_to_string(body));
        }

        if let Some(timeout) = options.get(keys::TIMEOUT) {
            let seconds = timeout
                .as_f64()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| {
                    TransportError::invalid_option(
                        keys::TIMEOUT,
                        "expected a positive number of seconds",
                    )
                })?;
            builder = builder.timeout(Duration::from_secs_f64(seconds));
        }

        let mut request = builder.build()?;
        // Basic credentials replace any Authorization header from `headers`.
        if let Some(credentials) = credentials {
            request.headers_mut().insert(http::header::AUTHORIZATION, credentials);
        }

        Ok(request)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<Response> {
        let request = self.build_request(request)?;
        trace!(method = %request.method(), url = %request.url(), "Executing request");

        let response = self.inner.execute(request).await?;
        Response::from_reqwest(response).await
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::try_from(name)
        .map_err(|e| TransportError::invalid_option(keys::HEADERS, format!("{}: {}", name, e)))
}

fn header_value(name: &str, value: &Value) -> Result<HeaderValue> {
    HeaderValue::try_from(value_to_string(value))
        .map_err(|e| TransportError::invalid_option(keys::HEADERS, format!("{}: {}", name, e)))
}

fn basic_auth(username: &str, password: Option<&str>) -> Result<HeaderValue> {
    use base64::Engine;
    let credentials = format!("{}:{}", username, password.unwrap_or_default());
    let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
    let mut value = HeaderValue::try_from(format!("Basic {}", encoded))
        .map_err(|e| TransportError::invalid_option(keys::AUTH, e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
