//! # RESTSpeaker HTTP
//!
//! The transport layer of RESTSpeaker: a request [`Options`] model with an
//! explicit merge order, a pluggable [`HttpTransport`], and [`HttpSpeaker`],
//! a facade that injects default headers and remembers the last response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use restspeaker_http::{HttpSpeaker, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = HttpSpeaker::with_base_uri("https://api.example.com/")?;
//!
//!     let response = http
//!         .get("users", Options::new().query("page", "2"))
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     assert_eq!(http.last_status_code(), i32::from(response.status().as_u16()));
//!     Ok(())
//! }
//! ```
//!
//! ## Testing Against Canned Responses
//!
//! ```rust
//! use restspeaker_http::{HttpSpeaker, MockTransport, Options, Response, StatusCode};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let mock = MockTransport::new();
//! mock.append(Response::new(StatusCode::OK).with_body("pong"));
//!
//! let http = HttpSpeaker::new(Arc::new(mock.clone()));
//! let response = http.get("/ping", Options::new()).await.unwrap();
//!
//! assert_eq!(response.text().unwrap(), "pong");
//! assert_eq!(mock.requests().len(), 1);
//! # });
//! ```

mod config;
mod error;
mod mock;
pub mod options;
mod response;
mod speaker;
mod transport;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use error::{Result, TransportError};
pub use mock::MockTransport;
pub use options::{CREDENTIAL_HEADERS, Options, merge_request_options};
pub use response::Response;
pub use speaker::{DEFAULT_MIME_TYPE, HttpSpeaker, default_user_agent};
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest};

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use restspeaker_http::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, TransportError};
    pub use crate::mock::MockTransport;
    pub use crate::options::{Options, merge_request_options};
    pub use crate::response::Response;
    pub use crate::speaker::HttpSpeaker;
    pub use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
    pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
}
