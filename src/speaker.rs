//! The REST facade.

use restspeaker_http::{
    HttpSpeaker, HttpTransport, Method, Options, Response, merge_request_options, options::keys,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::auth::AuthStrategy;
use crate::{Payload, RestError, Result};

/// The HTTP verbs a [`RestSpeaker`] can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Verb {
    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
            Verb::Head => Method::HEAD,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
            Verb::Head => "head",
        }
    }
}

impl FromStr for Verb {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Verb::Get),
            "post" => Ok(Verb::Post),
            "put" => Ok(Verb::Put),
            "patch" => Ok(Verb::Patch),
            "delete" => Ok(Verb::Delete),
            "head" => Ok(Verb::Head),
            _ => Err(RestError::InvalidMethod(format!(
                "Invalid method: 'RestSpeaker::{}'.",
                s
            ))),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON API client.
///
/// Each call asks the auth strategy for fresh credentials, merges them with
/// the caller's options and a JSON content type, sends the request through
/// the wrapped [`HttpSpeaker`], and normalizes the response into a
/// [`Payload`].
///
/// Option precedence, lowest to highest: REST defaults, auth fragment,
/// caller options. The auth fragment's credential keys always win.
pub struct RestSpeaker {
    http: HttpSpeaker,
    auth: Arc<dyn AuthStrategy>,
}

impl RestSpeaker {
    pub fn new(auth: Arc<dyn AuthStrategy>, http: HttpSpeaker) -> Self {
        Self { http, auth }
    }

    /// Create a client over a reqwest transport rooted at `base_uri`.
    pub fn with_base_uri(auth: Arc<dyn AuthStrategy>, base_uri: impl Into<String>) -> Result<Self> {
        Ok(Self::new(auth, HttpSpeaker::with_base_uri(base_uri)?))
    }

    /// Create a client over an injected transport.
    pub fn with_transport(auth: Arc<dyn AuthStrategy>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(auth, HttpSpeaker::new(transport))
    }

    /// The underlying transport facade, for calls that should skip auth
    /// injection and JSON decoding.
    pub fn http(&self) -> &HttpSpeaker {
        &self.http
    }

    pub fn auth(&self) -> &Arc<dyn AuthStrategy> {
        &self.auth
    }

    /// Options every REST call starts from. The user agent is the one the
    /// wrapped [`HttpSpeaker`] was configured with.
    pub fn default_options(&self) -> Options {
        Options::new()
            .header("User-Agent", self.http.user_agent())
            .header("Content-Type", "application/json")
    }

    /// Issue a request. `body`, when present, is sent as JSON and replaces
    /// any `json` option.
    pub async fn request(
        &self,
        verb: Verb,
        uri: &str,
        body: Option<Value>,
        options: Options,
    ) -> Result<Payload> {
        let response = self.send(verb, uri, body, options).await?;
        Ok(Payload::from_response(response))
    }

    /// Issue a request named at runtime, e.g. `"patch"`.
    ///
    /// Names other than the six supported verbs are rejected.
    pub async fn call(
        &self,
        name: &str,
        uri: &str,
        body: Option<Value>,
        options: Options,
    ) -> Result<Payload> {
        let verb: Verb = name.parse()?;
        self.request(verb, uri, body, options).await
    }

    pub async fn get(&self, uri: &str, options: Options) -> Result<Payload> {
        self.request(Verb::Get, uri, None, options).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>, options: Options) -> Result<Payload> {
        self.request(Verb::Post, uri, body, options).await
    }

    pub async fn put(&self, uri: &str, body: Option<Value>, options: Options) -> Result<Payload> {
        self.request(Verb::Put, uri, body, options).await
    }

    pub async fn patch(&self, uri: &str, body: Option<Value>, options: Options) -> Result<Payload> {
        self.request(Verb::Patch, uri, body, options).await
    }

    pub async fn delete(&self, uri: &str, options: Options) -> Result<Payload> {
        self.request(Verb::Delete, uri, None, options).await
    }

    pub async fn head(&self, uri: &str, options: Options) -> Result<Payload> {
        self.request(Verb::Head, uri, None, options).await
    }

    /// POST any serializable body as JSON.
    pub async fn post_json<T>(&self, uri: &str, body: &T, options: Options) -> Result<Payload>
    where
        T: Serialize + ?Sized + Sync,
    {
        let body = serde_json::to_value(body)?;
        self.post(uri, Some(body), options).await
    }

    pub fn last_response(&self) -> Option<Response> {
        self.http.last_response()
    }

    /// Status of the most recent response, or `-1` before any response.
    pub fn last_status_code(&self) -> i32 {
        self.http.last_status_code()
    }

    async fn send(
        &self,
        verb: Verb,
        uri: &str,
        body: Option<Value>,
        mut options: Options,
    ) -> Result<Response> {
        let auth_options = self.auth.generate_auth_options(Some(&self.http)).await?;

        if let Some(body) = body {
            options.insert(keys::JSON, body);
        }
        let options = merge_request_options(&self.default_options(), &auth_options, &options);

        debug!(verb = %verb, uri, auth_mode = %self.auth.mode(), "Dispatching REST request");
        Ok(self.http.request(verb.method(), uri, options).await?)
    }
}

impl fmt::Debug for RestSpeaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestSpeaker")
            .field("http", &self.http)
            .field("auth_mode", &self.auth.mode())
            .finish()
    }
}
