//! Request options and how they are merged.
//!
//! [`Options`] is an ordered mapping from option key to JSON value, using the
//! same vocabulary as most PHP-era HTTP clients (`headers`, `query`, `json`,
//! `form_params`, `body`, `auth`, `timeout`). Auth strategies, facades and
//! callers each produce a layer of options, and [`merge_request_options`]
//! folds them into the options that are actually sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Well-known option keys.
pub mod keys {
    /// Object of header name to value (string, or array of strings).
    pub const HEADERS: &str = "headers";
    /// Object of query parameters appended to the URL.
    pub const QUERY: &str = "query";
    /// Request body, serialized as JSON.
    pub const JSON: &str = "json";
    /// Object sent as an urlencoded form body.
    pub const FORM_PARAMS: &str = "form_params";
    /// Raw string body.
    pub const BODY: &str = "body";
    /// `[username, password]` for Basic authentication.
    pub const AUTH: &str = "auth";
    /// Per-request timeout in seconds.
    pub const TIMEOUT: &str = "timeout";
}

/// Headers whose value, when produced by an auth fragment, is never
/// overridden by caller options.
pub const CREDENTIAL_HEADERS: &[&str] = &["Authorization", "Proxy-Authorization", "X-API-Key"];

/// Ordered mapping of request options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing map.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build options from a JSON object. Any other value yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a top-level option, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Builder form of [`Options::insert`].
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header, replacing an existing one whose name matches
    /// case-insensitively. The existing spelling of the name is kept.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = Value::String(value.into());
        let headers = self.object_entry(keys::HEADERS);

        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, slot)) => *slot = value,
            None => {
                headers.insert(name, value);
            }
        }
    }

    /// Remove every header whose name matches case-insensitively.
    pub fn remove_header(&mut self, name: &str) {
        if let Some(Value::Object(headers)) = self.0.get_mut(keys::HEADERS) {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        }
    }

    /// Look up a header value by case-insensitive name.
    ///
    /// Array values yield their first element.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        let (_, value) = self
            .0
            .get(keys::HEADERS)?
            .as_object()?
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))?;

        match value {
            Value::String(s) => Some(s),
            Value::Array(values) => values.first().and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.0
            .get(keys::HEADERS)
            .and_then(Value::as_object)
            .is_some_and(|headers| headers.keys().any(|k| k.eq_ignore_ascii_case(name)))
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.object_entry(keys::QUERY)
            .insert(key.into(), Value::String(value.into()));
        self
    }

    /// Set the JSON body.
    pub fn json(self, body: Value) -> Self {
        self.with(keys::JSON, body)
    }

    /// Set an urlencoded form body.
    pub fn form_params(self, params: Map<String, Value>) -> Self {
        self.with(keys::FORM_PARAMS, Value::Object(params))
    }

    /// Set a raw text body.
    pub fn body(self, body: impl Into<String>) -> Self {
        self.with(keys::BODY, Value::String(body.into()))
    }

    /// Set Basic credentials, sent by the transport as an `Authorization` header.
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.with(
            keys::AUTH,
            Value::Array(vec![
                Value::String(username.into()),
                Value::String(password.into()),
            ]),
        )
    }

    /// Basic credentials from the `auth` option, if present and well formed.
    pub fn basic_auth_credentials(&self) -> Option<(&str, Option<&str>)> {
        let credentials = self.0.get(keys::AUTH)?.as_array()?;
        let username = credentials.first()?.as_str()?;
        let password = credentials.get(1).and_then(Value::as_str);
        Some((username, password))
    }

    /// Set a per-request timeout, forwarded to the transport.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.with(keys::TIMEOUT, Value::from(timeout.as_secs_f64()))
    }

    /// Overlay `other` onto these options; values in `other` win.
    ///
    /// Nested objects are merged key by key, to any depth. Header names
    /// under `headers` match case-insensitively. Arrays and scalars are
    /// replaced wholesale, never concatenated.
    pub fn merge(&mut self, other: &Options) {
        merge_map(&mut self.0, &other.0, false);
    }

    /// Builder form of [`Options::merge`].
    pub fn merged(mut self, other: &Options) -> Self {
        self.merge(other);
        self
    }

    fn object_entry(&mut self, key: &str) -> &mut Map<String, Value> {
        let entry = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just made an object"),
        }
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Options> for Value {
    fn from(options: Options) -> Self {
        Value::Object(options.0)
    }
}

/// Fold the three option layers of a request into one.
///
/// Precedence, lowest to highest:
///
/// 1. `defaults`, the facade's own options (content type, user agent),
/// 2. `auth`, the fragment produced by the auth strategy,
/// 3. `caller`, the options passed to the verb method.
///
/// Credential keys the auth fragment sets (the `auth` option and the
/// [`CREDENTIAL_HEADERS`]) are applied once more at the end, so the auth
/// strategy always owns them. Basic credentials from the fragment become the
/// `Authorization` header on the wire, so they also drop any caller
/// `Authorization` header.
pub fn merge_request_options(defaults: &Options, auth: &Options, caller: &Options) -> Options {
    let mut merged = defaults.clone().merged(auth).merged(caller);

    if let Some(credentials) = auth.get(keys::AUTH) {
        merged.insert(keys::AUTH, credentials.clone());
        if !auth.has_header("Authorization") {
            merged.remove_header("Authorization");
        }
    }
    for name in CREDENTIAL_HEADERS {
        if let Some(value) = auth.header_value(name) {
            merged.set_header(*name, value);
        }
    }

    merged
}

fn merge_map(base: &mut Map<String, Value>, overlay: &Map<String, Value>, caseless: bool) {
    for (key, value) in overlay {
        let existing = if caseless {
            base.iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        } else {
            base.get_mut(key)
        };

        match (existing, value) {
            (Some(Value::Object(inner)), Value::Object(incoming)) => {
                merge_map(inner, incoming, !caseless && key == keys::HEADERS);
            }
            (Some(slot), _) => *slot = value.clone(),
            (None, _) => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Render an option value the way it goes on the wire: strings verbatim,
/// everything else as its JSON text.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
