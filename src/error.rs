// Error types for the REST facade and auth strategies

use restspeaker_http::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestError {
    /// A required configuration value is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A programming or wiring mistake: bad auth mode, unimplemented custom
    /// auth, missing API client.
    #[error("Logic error: {0}")]
    Logic(String),

    /// The credential endpoint answered but gave nothing usable.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("{0}")]
    InvalidMethod(String),

    /// A request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<restspeaker_config::ConfigError> for RestError {
    fn from(err: restspeaker_config::ConfigError) -> Self {
        match err {
            restspeaker_config::ConfigError::KeyNotFound(key) => {
                Self::Configuration(format!("{} has not been set in .env.", key))
            }
            other => Self::Configuration(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RestError>;
