// OAuth2 client-credentials token fetch

use restspeaker_config::ExecutionProfile;
use restspeaker_http::{HttpSpeaker, Options};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::config::{
    AuthConfig, OAUTH2_CLIENT_ID, OAUTH2_CLIENT_SECRET, OAUTH2_SCOPE, OAUTH2_TOKEN_URL,
};
use crate::{RestError, Result};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

pub(crate) async fn fetch_bearer_options(
    config: &AuthConfig,
    api: Option<&HttpSpeaker>,
) -> Result<Options> {
    // Tokens are only issued against the live identity provider.
    if config.profile() == ExecutionProfile::Sandbox {
        return Err(RestError::Configuration(
            "OAuth2 tokens are unavailable in the sandbox; use Passkey auth there.".to_string(),
        ));
    }

    let token_url = config.require(OAUTH2_TOKEN_URL)?;
    let client_id = config.require(OAUTH2_CLIENT_ID)?;
    let client_secret = config.require(OAUTH2_CLIENT_SECRET)?;

    let api = api.ok_or_else(|| {
        RestError::Logic("OAuth2 token auth needs an API client to fetch tokens with.".to_string())
    })?;

    let mut form = Map::new();
    form.insert("grant_type".into(), Value::from("client_credentials"));
    form.insert("client_id".into(), Value::from(client_id));
    form.insert("client_secret".into(), Value::from(client_secret));
    if let Some(scope) = config.get(OAUTH2_SCOPE) {
        form.insert("scope".into(), Value::from(scope));
    }

    let options = Options::new()
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Accept", "application/json")
        .form_params(form);

    let response = api.post(&token_url, options).await?;
    if !response.is_success() {
        return Err(RestError::Auth(format!(
            "Token endpoint responded with HTTP {}.",
            response.status().as_u16()
        )));
    }

    let token: TokenResponse = response.json().map_err(|_| {
        RestError::Auth("Token endpoint returned an unparsable response.".to_string())
    })?;

    let access_token = token
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            RestError::Auth("Token endpoint response did not include an access_token.".to_string())
        })?;

    debug!(
        token_type = token.token_type.as_deref().unwrap_or("unspecified"),
        expires_in = ?token.expires_in,
        "Fetched OAuth2 access token"
    );

    Ok(Options::new().header("Authorization", format!("bearer {}", access_token)))
}
