//! # RESTSpeaker
//!
//! A convenience facade for talking to JSON APIs. It injects credentials
//! from a pluggable auth strategy, merges request options in a fixed order,
//! and decodes JSON responses, falling back to the raw body when the
//! response is not JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use restspeaker::auth::{AuthMode, RestAuth};
//! use restspeaker::{Options, RestSpeaker};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     restspeaker_config::load_dotenv(None)?;
//!
//!     // Sends `X-API-Key: $X_API_KEY` with every request.
//!     let auth = Arc::new(RestAuth::new(AuthMode::XApiToken));
//!     let api = RestSpeaker::with_base_uri(auth, "https://api.example.com/v1/")?;
//!
//!     let user = api.get("users/42", Options::new()).await?;
//!     println!("{:?} (HTTP {})", user.as_json(), api.last_status_code());
//!
//!     api.post("users", Some(json!({"name": "Ada"})), Options::new())
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Responses
//!
//! Every REST call yields a [`Payload`]:
//!
//! - [`Payload::Null`] for an empty body,
//! - [`Payload::Json`] for JSON with content,
//! - [`Payload::Text`] for anything else that is text, verbatim,
//! - [`Payload::Raw`] with the untouched response for binary bodies.
//!
//! Malformed JSON is never an error.

pub mod auth;
mod error;
mod payload;
mod speaker;

pub use auth::{AuthConfig, AuthMode, AuthStrategy, NoAuth, RestAuth};
pub use error::{RestError, Result};
pub use payload::Payload;
pub use speaker::{RestSpeaker, Verb};

// Re-export the transport layer
pub use restspeaker_http::{
    HttpSpeaker, HttpTransport, MockTransport, Options, ReqwestTransport, Response, StatusCode,
    TransportConfig, TransportError,
};

/// Prelude for common imports.
///
/// ```
/// use restspeaker::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{AuthConfig, AuthMode, AuthStrategy, NoAuth, RestAuth};
    pub use crate::error::{RestError, Result};
    pub use crate::payload::Payload;
    pub use crate::speaker::{RestSpeaker, Verb};
    pub use restspeaker_http::{HttpSpeaker, Options, Response, StatusCode};
}
