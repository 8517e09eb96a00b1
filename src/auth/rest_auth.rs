// Stock auth strategies

use super::{AuthConfig, AuthMode, AuthStrategy};
use crate::Result;

/// The stock strategy: every mode handled by the provided trait methods.
///
/// [`AuthMode::Custom`] fails on this type; implement [`AuthStrategy`] on a
/// type of your own to supply custom credentials.
#[derive(Debug, Clone)]
pub struct RestAuth {
    mode: AuthMode,
    config: AuthConfig,
}

impl RestAuth {
    /// Create a strategy reading credentials from the environment.
    pub fn new(mode: AuthMode) -> Self {
        Self::with_config(mode, AuthConfig::from_env())
    }

    pub fn with_config(mode: AuthMode, config: AuthConfig) -> Self {
        Self { mode, config }
    }

    /// Create a strategy from a mode name such as `"XAPIToken"`.
    ///
    /// Unknown names fail with a logic error.
    pub fn from_mode_name(name: &str, config: AuthConfig) -> Result<Self> {
        Ok(Self::with_config(name.parse()?, config))
    }
}

impl AuthStrategy for RestAuth {
    fn mode(&self) -> AuthMode {
        self.mode
    }

    fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// A strategy that never adds credentials.
#[derive(Debug, Clone)]
pub struct NoAuth {
    config: AuthConfig,
}

impl NoAuth {
    pub fn new() -> Self {
        Self {
            config: AuthConfig::empty(),
        }
    }
}

impl Default for NoAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStrategy for NoAuth {
    fn mode(&self) -> AuthMode {
        AuthMode::None
    }

    fn config(&self) -> &AuthConfig {
        &self.config
    }
}
