// Environment variable loading

use crate::{ConfigError, Result};
use std::env;

/// Environment variable loader
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Full variable name for `key`, including the prefix
    pub fn key_for(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.key_for(key)).map_err(ConfigError::EnvError)
    }

    /// Load a required variable, treating an empty value as missing
    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key).ok_or_else(|| ConfigError::KeyNotFound(self.key_for(key)))
    }

    /// Load an optional variable. Unset and empty values are both `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.load_var(key).ok().filter(|value| !value.is_empty())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
