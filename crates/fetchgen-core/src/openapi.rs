//! OpenAPI description parsing.
//!
//! This module turns a raw description document into an [`ApiDocument`]: the
//! document metadata, the component schema table and an ordered list of
//! [`OpenApiOperation`]s. Object key order is preserved end to end, so the
//! operations come out in exactly the order the document lists them.
//!
//! # Examples
//!
//! ```no_run
//! use fetchgen_core::openapi::OpenApiContext;
//! use fetchgen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let spec = OpenApiContext::from_file("openapi.json").await?;
//! let document = spec.parse_document()?;
//! if let Some(title) = document.title() {
//!     println!("API Title: {}", title);
//! }
//!
//! for op in &document.endpoints {
//!     println!("{} {}", op.method, op.path);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::Error;

// External imports (alphabetized)
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tokio::fs;

/// Represents a raw OpenAPI description
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct OpenApiContext {
    /// The raw JSON value of the description, keys in document order
    pub json: JsonValue,
}

impl OpenApiContext {
    /// Load a description from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| Error::InputRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse_content(&content).map_err(|e| e.in_file(path))
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> crate::Result<Self> {
        // Try to parse as JSON first
        let json_err = match serde_json::from_str::<JsonValue>(content) {
            Ok(json) => return Ok(Self { json }),
            Err(e) => e,
        };

        // If JSON parsing fails, try YAML
        match serde_yaml::from_str::<JsonValue>(content) {
            Ok(json) => Ok(Self { json }),
            Err(yaml_err) => Err(Error::parse(format!(
                "content is neither valid JSON ({}) nor YAML ({})",
                json_err, yaml_err
            ))),
        }
    }

    /// Build the normalized document: metadata, ordered operations and schemas
    pub fn parse_document(&self) -> crate::Result<ApiDocument> {
        Ok(ApiDocument {
            info: self.json.get("info").cloned().unwrap_or(JsonValue::Null),
            endpoints: self.parse_operations()?,
            schemas: self.schemas(),
        })
    }

    /// Parse every (path, method) pair into an operation, in document order
    pub fn parse_operations(&self) -> crate::Result<Vec<OpenApiOperation>> {
        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::parse("Missing 'paths' object"))?;

        let mut operations = Vec::new();
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                warn!("Skipping path '{}': path item is not an object", path);
                continue;
            };
            for (key, op) in item {
                let method = match key.parse::<HttpMethod>() {
                    Ok(method) => method,
                    Err(_) => {
                        debug!("Skipping non-operation key '{}' under '{}'", key, path);
                        continue;
                    }
                };
                let Some(op) = op.as_object() else {
                    warn!("Skipping {} {}: operation is not an object", method, path);
                    continue;
                };
                operations.push(OpenApiOperation::from_object(path, method, op));
            }
        }
        Ok(operations)
    }

    /// The `components.schemas` table, or an empty map when absent
    pub fn schemas(&self) -> JsonMap<String, JsonValue> {
        self.json
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(JsonValue::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

/// Parsed description, ready for name resolution and emission
#[derive(Debug, Clone, Serialize)]
pub struct ApiDocument {
    /// The `info` object, passed through unmodified
    pub info: JsonValue,
    /// Operations in document order
    pub endpoints: Vec<OpenApiOperation>,
    /// Component schemas, passed through unmodified
    pub schemas: JsonMap<String, JsonValue>,
}

impl ApiDocument {
    pub fn title(&self) -> Option<&str> {
        self.info.get("title")?.as_str()
    }

    pub fn version(&self) -> Option<&str> {
        self.info.get("version")?.as_str()
    }
}

/// HTTP methods that may appear as operation keys in a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Upper-case method token, as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "HEAD" => Ok(Self::Head),
            "PATCH" => Ok(Self::Patch),
            "TRACE" => Ok(Self::Trace),
            _ => Err(format!("'{}' is not an HTTP method", s)),
        }
    }
}

/// One (path, method) entry of the description
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenApiOperation {
    /// The path template (e.g., "/pet/{petId}")
    pub path: String,
    /// The HTTP method
    pub method: HttpMethod,
    /// Explicit operation identifier, if any
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// The request body, kept for presence checks
    #[serde(rename = "requestBody")]
    pub request_body: Option<JsonValue>,
    /// The responses object, passed through
    pub responses: Option<JsonValue>,
    /// Tags used for grouping
    pub tags: Option<Vec<String>>,
}

impl OpenApiOperation {
    fn from_object(path: &str, method: HttpMethod, op: &JsonMap<String, JsonValue>) -> Self {
        Self {
            path: path.to_string(),
            method,
            operation_id: op
                .get("operationId")
                .and_then(JsonValue::as_str)
                .map(String::from),
            request_body: op.get("requestBody").cloned(),
            responses: op.get("responses").cloned(),
            tags: op.get("tags").and_then(JsonValue::as_array).map(|arr| {
                arr.iter()
                    .filter_map(JsonValue::as_str)
                    .map(String::from)
                    .collect()
            }),
        }
    }

    /// Whether the request body declares at least one media type
    pub fn has_request_body(&self) -> bool {
        self.request_body
            .as_ref()
            .and_then(|body| body.get("content"))
            .and_then(JsonValue::as_object)
            .is_some_and(|content| !content.is_empty())
    }
}
