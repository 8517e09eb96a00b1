//! Auth strategies.
//!
//! An [`AuthStrategy`] turns its [`AuthMode`] into an options fragment that
//! the REST facade merges into every request. The trait's provided methods
//! implement each mode; a deployment overrides the ones it needs, most
//! often [`AuthStrategy::custom_auth_options`].
//!
//! ```rust
//! use async_trait::async_trait;
//! use restspeaker::auth::{AuthConfig, AuthMode, AuthStrategy};
//! use restspeaker::{HttpSpeaker, Options, Result};
//!
//! struct SignedRequests {
//!     config: AuthConfig,
//! }
//!
//! #[async_trait]
//! impl AuthStrategy for SignedRequests {
//!     fn mode(&self) -> AuthMode {
//!         AuthMode::Custom
//!     }
//!
//!     fn config(&self) -> &AuthConfig {
//!         &self.config
//!     }
//!
//!     async fn custom_auth_options(&self, _api: Option<&HttpSpeaker>) -> Result<Options> {
//!         let key = self.config.require("SIGNING_KEY")?;
//!         Ok(Options::new().header("X-Signature", format!("v1:{}", key)))
//!     }
//! }
//! ```

mod config;
mod mode;
mod oauth2;
mod rest_auth;

pub use config::{
    AuthConfig, OAUTH2_CLIENT_ID, OAUTH2_CLIENT_SECRET, OAUTH2_SCOPE, OAUTH2_TOKEN_URL,
    PASSKEY_SECRET, PASSKEY_USERNAME, X_API_KEY,
};
pub use mode::AuthMode;
pub use rest_auth::{NoAuth, RestAuth};

use async_trait::async_trait;
use restspeaker_http::{HttpSpeaker, Options};
use tracing::warn;

use crate::{RestError, Result};

/// Produces the credentials for outgoing requests.
///
/// The fragment is generated fresh for every request and never cached, so
/// expiring credentials can be renewed. `api` is the transport facade of the
/// REST client making the request; strategies that need to make their own
/// calls (the OAuth2 token fetch) go through it.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    fn mode(&self) -> AuthMode;

    /// Where credentials are looked up.
    fn config(&self) -> &AuthConfig;

    /// Produce the options fragment for the configured mode.
    async fn generate_auth_options(&self, api: Option<&HttpSpeaker>) -> Result<Options> {
        match self.mode() {
            AuthMode::None => self.no_auth_options(),
            AuthMode::Passkey => self.passkey_options(),
            AuthMode::OAuth2Token => self.oauth2_token_options(api).await,
            AuthMode::XApiToken => self.x_api_token_options(),
            AuthMode::Custom => self.custom_auth_options(api).await,
        }
    }

    fn no_auth_options(&self) -> Result<Options> {
        Ok(Options::new())
    }

    /// `{headers: {X-API-Key: $X_API_KEY}}`
    fn x_api_token_options(&self) -> Result<Options> {
        let api_key = self.config().require(X_API_KEY)?;
        Ok(Options::new().header("X-API-Key", api_key))
    }

    /// `{auth: [$PASSKEY_USERNAME, $PASSKEY_SECRET]}`, sent as Basic auth.
    fn passkey_options(&self) -> Result<Options> {
        let username = self.config().require(PASSKEY_USERNAME)?;
        let secret = self.config().require(PASSKEY_SECRET)?;

        let profile = self.config().profile();
        if profile.is_production() {
            warn!(
                profile = %profile,
                "Passkey auth sends reusable credentials; prefer OAuth2 tokens in production"
            );
        }

        Ok(Options::new().basic_auth(username, secret))
    }

    /// `{headers: {Authorization: "bearer <token>"}}`, with the token fetched
    /// from `$OAUTH2_TOKEN_URL` using the client-credentials grant.
    async fn oauth2_token_options(&self, api: Option<&HttpSpeaker>) -> Result<Options> {
        oauth2::fetch_bearer_options(self.config(), api).await
    }

    async fn custom_auth_options(&self, _api: Option<&HttpSpeaker>) -> Result<Options> {
        Err(RestError::Logic(
            "The base RestAuth custom auth should not be called; it must be overridden."
                .to_string(),
        ))
    }
}
