//! Configuration loading for RESTSpeaker.
//!
//! Credentials consumed by the auth strategies (API keys, OAuth2 client
//! credentials, passkeys) live in the process environment, optionally
//! seeded from a `.env` file.
//!
//! ```no_run
//! use restspeaker_config::{EnvLoader, ExecutionProfile};
//!
//! restspeaker_config::load_dotenv(None).ok();
//!
//! let env = EnvLoader::default();
//! let api_key = env.get("X_API_KEY");
//! let profile = ExecutionProfile::from_env(&env);
//! # let _ = (api_key, profile);
//! ```

pub mod env;
pub mod error;
pub mod profile;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use profile::ExecutionProfile;

/// Load a `.env` file into the process environment.
///
/// With no path, looks for `.env` in the current directory and its parents;
/// a missing file is not an error in that case.
pub fn load_dotenv(path: Option<&str>) -> Result<()> {
    if let Some(path) = path {
        dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        tracing::debug!(path, "Loaded .env file");
    } else if let Ok(found) = dotenvy::dotenv() {
        tracing::debug!(path = %found.display(), "Loaded .env file");
    }

    Ok(())
}
