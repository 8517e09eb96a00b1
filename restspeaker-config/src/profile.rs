//! Execution profile of the running process.

use crate::{ConfigError, EnvLoader, Result};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the execution profile.
pub const PROFILE_VAR: &str = "APP_ENV";

/// Which kind of deployment the process runs in.
///
/// Some auth modes behave differently per profile: OAuth2 tokens cannot be
/// issued in the sandbox, and passkeys raise a warning in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionProfile {
    #[default]
    Development,
    Testing,
    Sandbox,
    Production,
}

impl ExecutionProfile {
    /// Read the profile from `APP_ENV`, falling back to development when the
    /// variable is unset or unrecognized.
    pub fn from_env(env: &EnvLoader) -> Self {
        match env.get(PROFILE_VAR) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %value, "Unknown {}, assuming development", PROFILE_VAR);
                Self::Development
            }),
            None => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for ExecutionProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" | "local" => Ok(Self::Development),
            "test" | "testing" => Ok(Self::Testing),
            "sandbox" | "staging" => Ok(Self::Sandbox),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue {
                key: PROFILE_VAR.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExecutionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
