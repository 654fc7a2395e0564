//! Credential stripping for API responses.
//!
//! Every successful API payload passes through [`sanitize`] before it is
//! handed back to the agent. Objects lose any key that starts with `_` and
//! any key in [`BLOCKED_KEYS`]; everything else keeps its shape and order.
//!
//! The blocked list names the fields an X API client keeps credentials in
//! (bearer/consumer/access/basic tokens, client secrets, OAuth consumer key
//! pairs, raw request data holding the `Authorization` header, client
//! settings). It has to grow whenever the client gains a new
//! credential-bearing field.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Field names that are never returned to the caller.
pub const BLOCKED_KEYS: &[&str] = &[
    // Request signer state
    "bearerToken",
    "consumerToken",
    "consumerSecret",
    "accessToken",
    "accessSecret",
    "basicToken",
    "clientSecret",
    // OAuth 1.0a key pair
    "consumerKeys",
    // Request data carrying Authorization headers
    "requestData",
    // Client settings (plugins receive credentials)
    "clientSettings",
];

static BLOCKED: Lazy<HashSet<&'static str>> = Lazy::new(|| BLOCKED_KEYS.iter().copied().collect());

/// Check if an object key must be dropped.
pub fn is_blocked_key(key: &str) -> bool {
    key.starts_with('_') || BLOCKED.contains(key)
}

/// Return a copy of `value` with every blocked key removed at any depth.
///
/// Scalars and `null` pass through, arrays keep their length and order,
/// objects keep their remaining keys in their original order.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !is_blocked_key(key))
                .map(|(key, val)| (key.clone(), sanitize(val)))
                .collect::<Map<String, Value>>(),
        ),
        scalar => scalar.clone(),
    }
}
