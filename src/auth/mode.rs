//! Authentication modes.

use crate::{RestError, Result};
use std::fmt;
use std::str::FromStr;

const INVALID_MODE: &str = "Invalid REST auth mode.";

/// How an [`AuthStrategy`](super::AuthStrategy) produces credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// No credentials.
    None,
    /// Basic username/secret credentials.
    Passkey,
    /// A bearer token fetched from an OAuth2 token endpoint.
    OAuth2Token,
    /// A static key sent in the `X-API-Key` header.
    XApiToken,
    /// Deployment-specific credentials; must be supplied by the strategy.
    Custom,
}

impl AuthMode {
    pub const ALL: [AuthMode; 5] = [
        AuthMode::None,
        AuthMode::Passkey,
        AuthMode::OAuth2Token,
        AuthMode::XApiToken,
        AuthMode::Custom,
    ];

    /// Canonical name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::None => "NoAuth",
            AuthMode::Passkey => "Passkey",
            AuthMode::OAuth2Token => "OAuth2Token",
            AuthMode::XApiToken => "XAPIToken",
            AuthMode::Custom => "CustomAuth",
        }
    }

    /// Parse a mode name, also accepting deployment-registered custom mode
    /// names, which all map to [`AuthMode::Custom`].
    pub fn parse_with_custom(name: &str, custom_modes: &[&str]) -> Result<Self> {
        match name.parse() {
            Ok(mode) => Ok(mode),
            Err(_) if custom_modes.contains(&name) => Ok(AuthMode::Custom),
            Err(err) => Err(err),
        }
    }
}

impl FromStr for AuthMode {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NoAuth" | "None" => Ok(AuthMode::None),
            "Passkey" => Ok(AuthMode::Passkey),
            "OAuth2Token" => Ok(AuthMode::OAuth2Token),
            "XAPIToken" => Ok(AuthMode::XApiToken),
            "CustomAuth" | "Custom" => Ok(AuthMode::Custom),
            _ => Err(RestError::Logic(INVALID_MODE.to_string())),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
