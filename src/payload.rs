//! Normalized REST responses.

use restspeaker_http::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What a REST call hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The response had no body.
    Null,
    /// The body was JSON with some content.
    Json(Value),
    /// The body was text that is not JSON, or JSON with no content
    /// (`null`, `false`, `0`, `""`, `"0"`, `[]`). Returned verbatim.
    Text(String),
    /// The body is not text at all; the response is passed through untouched.
    Raw(Response),
}

impl Payload {
    /// Normalize a response. Never fails: bodies that do not decode fall
    /// back to text, and bodies that are not text fall back to the response.
    pub fn from_response(response: Response) -> Self {
        if response.is_empty() {
            return Payload::Null;
        }

        let text = match std::str::from_utf8(response.bytes()) {
            Ok(text) => text,
            Err(_) => return Payload::Raw(response),
        };

        match serde_json::from_str::<Value>(text) {
            Ok(value) if !is_empty_json(&value) => Payload::Json(value),
            _ => Payload::Text(text.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Payload::Null)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Payload::Raw(response) => Some(response),
            _ => None,
        }
    }

    /// Deserialize a JSON payload into `T`.
    ///
    /// Returns `None` for non-JSON payloads or when the shape does not match.
    pub fn into_json<T: DeserializeOwned>(self) -> Option<T> {
        match self {
            Payload::Json(value) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }
}

impl From<Response> for Payload {
    fn from(response: Response) -> Self {
        Payload::from_response(response)
    }
}

/// Whether a decoded JSON value carries nothing worth returning.
fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}
