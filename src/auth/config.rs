//! Where auth strategies read their credentials from.

use restspeaker_config::{EnvLoader, ExecutionProfile, profile::PROFILE_VAR};
use std::collections::HashMap;

use crate::Result;

pub const X_API_KEY: &str = "X_API_KEY";
pub const OAUTH2_CLIENT_ID: &str = "OAUTH2_CLIENT_ID";
pub const OAUTH2_CLIENT_SECRET: &str = "OAUTH2_CLIENT_SECRET";
pub const OAUTH2_TOKEN_URL: &str = "OAUTH2_TOKEN_URL";
pub const OAUTH2_SCOPE: &str = "OAUTH2_SCOPE";
pub const PASSKEY_USERNAME: &str = "PASSKEY_USERNAME";
pub const PASSKEY_SECRET: &str = "PASSKEY_SECRET";

#[derive(Debug, Clone)]
enum Source {
    Env(EnvLoader),
    Static(HashMap<String, String>),
}

/// Credential lookup for auth strategies.
///
/// Values are read on every lookup, so an environment-backed config picks
/// up rotated credentials without being rebuilt. Empty values count as
/// missing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    source: Source,
}

impl AuthConfig {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_loader(EnvLoader::default())
    }

    /// Read credentials through a (possibly prefixed) environment loader.
    pub fn from_loader(loader: EnvLoader) -> Self {
        Self {
            source: Source::Env(loader),
        }
    }

    /// Fixed credentials, independent of the environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: Source::Static(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// An empty fixed config.
    pub fn empty() -> Self {
        Self::from_pairs(std::iter::empty::<(String, String)>())
    }

    /// Set a fixed value. An environment-backed config becomes a fixed one
    /// seeded with nothing but this value.
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value): (String, String) = (key.into(), value.into());
        match self.source {
            Source::Static(mut values) => {
                values.insert(key, value);
                Self {
                    source: Source::Static(values),
                }
            }
            Source::Env(_) => Self::from_pairs([(key, value)]),
        }
    }

    /// Look up an optional value.
    pub fn get(&self, key: &str) -> Option<String> {
        match &self.source {
            Source::Env(loader) => loader.get(key),
            Source::Static(values) => values.get(key).filter(|v| !v.is_empty()).cloned(),
        }
    }

    /// Look up a required value; missing values are configuration errors.
    pub fn require(&self, key: &str) -> Result<String> {
        match &self.source {
            Source::Env(loader) => Ok(loader.require(key)?),
            Source::Static(_) => self.get(key).ok_or_else(|| {
                restspeaker_config::ConfigError::KeyNotFound(key.to_string()).into()
            }),
        }
    }

    /// The execution profile, from `APP_ENV`.
    pub fn profile(&self) -> ExecutionProfile {
        match &self.source {
            Source::Env(loader) => ExecutionProfile::from_env(loader),
            Source::Static(_) => self
                .get(PROFILE_VAR)
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
