//! Template-facing types for client code generation

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// One generated client method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEndpoint {
    /// Resolved method name, unique within the client
    pub method_name: String,
    /// Raw path template as written in the description
    pub path: String,
    /// Path escaped for a single-quoted string literal
    pub path_literal: String,
    /// Upper-case HTTP method token
    pub method: String,
    /// Whether the method takes and serializes a `data` argument
    pub has_request_body: bool,
    pub operation_id: Option<String>,
    pub tags: Vec<String>,
}

/// Everything a client template can refer to
#[derive(Clone, Debug, Serialize)]
pub struct ClientContext {
    pub class_name: String,
    pub title: Option<String>,
    pub version: Option<String>,
    pub endpoints: Vec<ClientEndpoint>,
    pub schemas: JsonMap<String, JsonValue>,
}

/// The emitted client: its class name and complete source text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedClient {
    pub class_name: String,
    pub source_text: String,
}
