//! Integration tests for the REST facade over a mock transport.

use async_trait::async_trait;
use restspeaker::auth::{
    AuthConfig, AuthMode, AuthStrategy, NoAuth, OAUTH2_CLIENT_ID, OAUTH2_CLIENT_SECRET,
    OAUTH2_SCOPE, OAUTH2_TOKEN_URL, PASSKEY_SECRET, PASSKEY_USERNAME, RestAuth, X_API_KEY,
};
use restspeaker::{
    HttpSpeaker, MockTransport, Options, Payload, Response, RestError, RestSpeaker, StatusCode,
    TransportError,
};
use serde_json::json;
use std::sync::Arc;

fn speaker_with(auth: Arc<dyn AuthStrategy>) -> (RestSpeaker, MockTransport) {
    let mock = MockTransport::new();
    let api = RestSpeaker::with_transport(auth, Arc::new(mock.clone()));
    (api, mock)
}

fn no_auth_speaker() -> (RestSpeaker, MockTransport) {
    speaker_with(Arc::new(NoAuth::new()))
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    Response::new(status)
        .with_header("Content-Type", "application/json")
        .with_body(body.to_string())
}

// =============================================================================
// Response normalization
// =============================================================================

#[tokio::test]
async fn test_returns_null_when_no_content() {
    let (api, mock) = no_auth_speaker();
    mock.append(
        Response::new(StatusCode::NO_CONTENT).with_header("Content-Type", "application/json"),
    );

    let payload = api.get("/no-data", Options::new()).await.unwrap();

    assert!(payload.is_null());
    assert_eq!(api.last_status_code(), 204);
}

#[tokio::test]
async fn test_returns_text_when_not_json() {
    let (api, mock) = no_auth_speaker();
    let body = "<html lang=\"us\">Hi</html>";
    mock.append(
        Response::new(StatusCode::OK)
            .with_header("Content-Type", "text/html")
            .with_body(body),
    );

    let payload = api.get("https://somewhere.com/", Options::new()).await.unwrap();

    assert_eq!(payload, Payload::Text(body.to_string()));
    assert_eq!(api.last_response().unwrap().text().unwrap(), body);
}

#[tokio::test]
async fn test_json_urls_return_decoded_values() {
    let (api, mock) = no_auth_speaker();
    let expected = json!({"decoded": "json", "hmm": ["nested", "array", 1, 2.0]});
    mock.append(json_response(StatusCode::OK, expected.clone()));

    let payload = api.get("https://somewhere.com/", Options::new()).await.unwrap();

    assert_eq!(payload.as_json(), Some(&expected));
}

#[tokio::test]
async fn test_end_to_end_get_with_no_auth() {
    let (api, mock) = speaker_with(Arc::new(RestAuth::with_config(
        AuthMode::None,
        AuthConfig::empty(),
    )));
    assert_eq!(api.last_status_code(), -1);
    mock.append(json_response(StatusCode::OK, json!({"hello": "world"})));

    let payload = api.get("/x", Options::new()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"hello": "world"})));
    assert_eq!(api.last_status_code(), 200);
    assert_eq!(mock.last_request().unwrap().uri, "/x");
}

#[tokio::test]
async fn test_can_fall_down_to_http_speaker() {
    let (api, mock) = no_auth_speaker();
    let body = json!({"decoded": "json"}).to_string();
    let response = Response::new(StatusCode::OK)
        .with_header("Content-Type", "application/json")
        .with_body(body.clone());
    mock.append(response.clone());

    let actual = api.http().get("https://somewhere.com/", Options::new()).await.unwrap();

    assert_eq!(actual, response);
    assert_eq!(actual.text().unwrap(), body);
    assert_eq!(
        mock.last_request().unwrap().options.header_value("Content-Type"),
        Some("text/html")
    );
}

// =============================================================================
// Option merging
// =============================================================================

#[tokio::test]
async fn test_requests_application_json_content_type() {
    let (api, mock) = no_auth_speaker();
    mock.append(Response::new(StatusCode::OK));

    api.get("https://somewhere.com/", Options::new()).await.unwrap();

    let sent = mock.last_request().unwrap();
    assert_eq!(sent.options.header_value("Content-Type"), Some("application/json"));
    assert!(sent.options.header_value("User-Agent").unwrap().starts_with("RESTSpeaker/"));
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let (api, mock) = no_auth_speaker();
    mock.append(Response::new(StatusCode::OK));

    let options = Options::new()
        .header("user-agent", "my-app/3.1")
        .header("Accept", "application/hal+json");
    api.get("/x", options).await.unwrap();

    let sent = mock.last_request().unwrap().options;
    assert_eq!(sent.header_value("User-Agent"), Some("my-app/3.1"));
    assert_eq!(sent.header_value("Accept"), Some("application/hal+json"));
    assert_eq!(sent.header_value("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_configured_user_agent_is_kept() {
    let mock = MockTransport::new();
    let http = HttpSpeaker::new(Arc::new(mock.clone())).with_user_agent("my-sdk/9.9");
    let api = RestSpeaker::new(Arc::new(NoAuth::new()), http);
    mock.append(Response::new(StatusCode::OK));

    api.get("/x", Options::new()).await.unwrap();

    let sent = mock.last_request().unwrap().options;
    assert_eq!(sent.header_value("User-Agent"), Some("my-sdk/9.9"));
    assert_eq!(sent.header_value("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn test_body_is_sent_as_json() {
    let (api, mock) = no_auth_speaker();
    mock.append(json_response(StatusCode::CREATED, json!({"id": 1})));

    let payload = api
        .post(
            "/users",
            Some(json!({"name": "Ada"})),
            Options::new().with("json", json!({"ignored": true})),
        )
        .await
        .unwrap();

    assert_eq!(payload.as_json(), Some(&json!({"id": 1})));
    let sent = mock.last_request().unwrap();
    assert_eq!(sent.method, restspeaker_http::Method::POST);
    assert_eq!(sent.options.get("json"), Some(&json!({"name": "Ada"})));
}

#[tokio::test]
async fn test_post_json_serializes_structs() {
    #[derive(serde::Serialize)]
    struct NewUser<'a> {
        name: &'a str,
        admin: bool,
    }

    let (api, mock) = no_auth_speaker();
    mock.append(Response::new(StatusCode::CREATED));

    api.post_json("/users", &NewUser { name: "Ada", admin: false }, Options::new())
        .await
        .unwrap();

    assert_eq!(
        mock.last_request().unwrap().options.get("json"),
        Some(&json!({"name": "Ada", "admin": false}))
    );
}

// =============================================================================
// Auth strategies
// =============================================================================

#[tokio::test]
async fn test_x_api_token_is_injected_and_wins() {
    let auth = RestAuth::with_config(
        AuthMode::XApiToken,
        AuthConfig::from_pairs([(X_API_KEY, "mySecret")]),
    );
    let (api, mock) = speaker_with(Arc::new(auth));
    mock.append(Response::new(StatusCode::OK));

    api.delete("/x", Options::new().header("X-API-Key", "forged"))
        .await
        .unwrap();

    assert_eq!(
        mock.last_request().unwrap().options.header_value("x-api-key"),
        Some("mySecret")
    );
}

#[tokio::test]
async fn test_missing_api_key_sends_nothing() {
    let auth = RestAuth::with_config(AuthMode::XApiToken, AuthConfig::empty());
    let (api, mock) = speaker_with(Arc::new(auth));
    mock.append(Response::new(StatusCode::OK));

    let err = api.get("/x", Options::new()).await.unwrap_err();

    assert!(matches!(err, RestError::Configuration(_)));
    assert!(mock.requests().is_empty());
    assert_eq!(api.last_status_code(), -1);
}

#[tokio::test]
async fn test_passkey_credentials_reach_the_transport() {
    let auth = RestAuth::with_config(
        AuthMode::Passkey,
        AuthConfig::from_pairs([(PASSKEY_USERNAME, "alice"), (PASSKEY_SECRET, "hunter2")]),
    );
    let (api, mock) = speaker_with(Arc::new(auth));
    mock.append(Response::new(StatusCode::OK));

    api.put("/x", None, Options::new().basic_auth("mallory", "guess"))
        .await
        .unwrap();

    assert_eq!(
        mock.last_request().unwrap().options.basic_auth_credentials(),
        Some(("alice", Some("hunter2")))
    );
}

fn oauth2_config() -> AuthConfig {
    AuthConfig::from_pairs([
        (OAUTH2_TOKEN_URL, "https://auth.example.com/oauth/token"),
        (OAUTH2_CLIENT_ID, "client-id"),
        (OAUTH2_CLIENT_SECRET, "client-secret"),
        (OAUTH2_SCOPE, "read write"),
    ])
}

#[tokio::test]
async fn test_oauth2_fetches_a_bearer_token_through_the_same_transport() {
    let (api, mock) = speaker_with(Arc::new(RestAuth::with_config(
        AuthMode::OAuth2Token,
        oauth2_config(),
    )));
    mock.append(json_response(
        StatusCode::OK,
        json!({"access_token": "abc123", "token_type": "Bearer", "expires_in": 3600}),
    ));
    mock.append(json_response(StatusCode::OK, json!({"hello": "world"})));

    let payload = api.get("/x", Options::new()).await.unwrap();

    assert_eq!(payload.as_json(), Some(&json!({"hello": "world"})));
    assert_eq!(api.last_status_code(), 200);

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);

    let token_request = &requests[0];
    assert_eq!(token_request.method, restspeaker_http::Method::POST);
    assert_eq!(token_request.uri, "https://auth.example.com/oauth/token");
    assert_eq!(
        token_request.options.get("form_params"),
        Some(&json!({
            "grant_type": "client_credentials",
            "client_id": "client-id",
            "client_secret": "client-secret",
            "scope": "read write"
        }))
    );
    assert_eq!(
        token_request.options.header_value("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );

    assert_eq!(
        requests[1].options.header_value("Authorization"),
        Some("bearer abc123")
    );
}

#[tokio::test]
async fn test_oauth2_token_is_fetched_for_every_request() {
    let (api, mock) = speaker_with(Arc::new(RestAuth::with_config(
        AuthMode::OAuth2Token,
        oauth2_config(),
    )));
    for token in ["first", "second"] {
        mock.append(json_response(StatusCode::OK, json!({"access_token": token})));
        mock.append(Response::new(StatusCode::NO_CONTENT));
    }

    api.get("/a", Options::new()).await.unwrap();
    api.get("/b", Options::new()).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[1].options.header_value("Authorization"), Some("bearer first"));
    assert_eq!(requests[3].options.header_value("Authorization"), Some("bearer second"));
}

#[tokio::test]
async fn test_oauth2_without_access_token_is_an_auth_error() {
    let (api, mock) = speaker_with(Arc::new(RestAuth::with_config(
        AuthMode::OAuth2Token,
        oauth2_config(),
    )));
    mock.append(json_response(StatusCode::OK, json!({"error": "nope"})));

    let err = api.get("/x", Options::new()).await.unwrap_err();

    match err {
        RestError::Auth(message) => assert!(message.contains("access_token")),
        other => panic!("expected an auth error, got {:?}", other),
    }
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_oauth2_unparsable_or_rejected_token_responses() {
    for response in [
        Response::new(StatusCode::OK).with_body("<html>login</html>"),
        json_response(StatusCode::UNAUTHORIZED, json!({"access_token": "stale"})),
    ] {
        let (api, mock) = speaker_with(Arc::new(RestAuth::with_config(
            AuthMode::OAuth2Token,
            oauth2_config(),
        )));
        mock.append(response);

        let err = api.get("/x", Options::new()).await.unwrap_err();
        assert!(matches!(err, RestError::Auth(_)), "got {:?}", err);
    }
}

#[tokio::test]
async fn test_oauth2_is_unavailable_in_the_sandbox() {
    let config = oauth2_config().with("APP_ENV", "sandbox");
    let (api, mock) = speaker_with(Arc::new(RestAuth::with_config(AuthMode::OAuth2Token, config)));

    let err = api.get("/x", Options::new()).await.unwrap_err();

    assert!(matches!(err, RestError::Configuration(_)));
    assert!(mock.requests().is_empty());
}

struct VendorJson {
    config: AuthConfig,
}

#[async_trait]
impl AuthStrategy for VendorJson {
    fn mode(&self) -> AuthMode {
        AuthMode::Custom
    }

    fn config(&self) -> &AuthConfig {
        &self.config
    }

    async fn custom_auth_options(
        &self,
        _api: Option<&HttpSpeaker>,
    ) -> restspeaker::Result<Options> {
        let token = self.config.require("VENDOR_TOKEN")?;
        Ok(Options::new()
            .header("Content-Type", "application/vnd.vendor+json")
            .header("Authorization", format!("Token {}", token)))
    }
}

#[tokio::test]
async fn test_custom_strategy_overrides_content_type_and_credentials() {
    let auth = VendorJson {
        config: AuthConfig::from_pairs([("VENDOR_TOKEN", "t0k")]),
    };
    let (api, mock) = speaker_with(Arc::new(auth));
    mock.append(Response::new(StatusCode::OK));

    api.patch("/x", Some(json!({"a": 1})), Options::new()).await.unwrap();

    let sent = mock.last_request().unwrap().options;
    assert_eq!(sent.header_value("Content-Type"), Some("application/vnd.vendor+json"));
    assert_eq!(sent.header_value("Authorization"), Some("Token t0k"));
}

// =============================================================================
// Dispatch and errors
// =============================================================================

#[tokio::test]
async fn test_dynamic_calls() {
    let (api, mock) = no_auth_speaker();
    mock.append(Response::new(StatusCode::ACCEPTED));

    let payload = api.call("PATCH", "/x", Some(json!({"a": 1})), Options::new()).await.unwrap();
    assert!(payload.is_null());
    assert_eq!(mock.last_request().unwrap().method, restspeaker_http::Method::PATCH);

    let err = api.call("frobnicate", "/x", None, Options::new()).await.unwrap_err();
    match err {
        RestError::InvalidMethod(message) => {
            assert_eq!(message, "Invalid method: 'RestSpeaker::frobnicate'.")
        }
        other => panic!("expected InvalidMethod, got {:?}", other),
    }
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_transport_errors_propagate_unchanged() {
    let (api, mock) = no_auth_speaker();
    mock.append(Response::new(StatusCode::OK));
    mock.append_error(TransportError::Connection("connection reset".into()));

    api.head("/x", Options::new()).await.unwrap();
    let err = api.get("/x", Options::new()).await.unwrap_err();

    assert!(matches!(err, RestError::Transport(TransportError::Connection(_))));
    assert_eq!(api.last_status_code(), 200);
}
