//! Method name resolution for generated client methods.
//!
//! An explicit `operationId` wins; otherwise the name is synthesized from the
//! HTTP method and the literal path segments. Either way the first character
//! is lower-cased. Uniqueness across a document is handled by
//! [`MethodNameRegistry`].

use std::collections::HashSet;

use log::warn;

use crate::openapi::{HttpMethod, OpenApiOperation};
use crate::utils::{lower_first, sanitize_identifier, upper_first};

/// Resolve the method name for a single operation.
///
/// Pure: the same `(method, path, operation_id)` always gives the same name.
///
/// ```
/// use fetchgen_core::naming::resolve_method_name;
/// use fetchgen_core::openapi::HttpMethod;
///
/// assert_eq!(resolve_method_name(HttpMethod::Get, "/api/organisations", None), "getApiOrganisations");
/// assert_eq!(resolve_method_name(HttpMethod::Get, "/users", Some("GetUsers")), "getUsers");
/// ```
pub fn resolve_method_name(method: HttpMethod, path: &str, operation_id: Option<&str>) -> String {
    let base = match operation_id.filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => synthesize_base_name(method, path),
    };

    let name = lower_first(&sanitize_identifier(&base));
    if name.is_empty() {
        method.as_str().to_ascii_lowercase()
    } else {
        name
    }
}

/// Resolve the method name for a parsed operation
pub fn resolve_operation_name(op: &OpenApiOperation) -> String {
    resolve_method_name(op.method, &op.path, op.operation_id.as_deref())
}

/// `GET /users/{id}/comments` becomes `getUsersComments`
fn synthesize_base_name(method: HttpMethod, path: &str) -> String {
    let segments: String = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .map(|segment| upper_first(&sanitize_identifier(segment)))
        .collect();
    format!("{}{}", method.as_str().to_ascii_lowercase(), segments)
}

/// Members the generated client class defines for itself. An endpoint
/// resolving to one of these would shadow or break them.
pub const RESERVED_METHOD_NAMES: &[&str] =
    &["constructor", "request", "baseUrl", "defaultOptions"];

/// Tracks the names already handed out within one generation cycle.
///
/// The first endpoint to claim a name keeps it. Later claimants get the
/// smallest numeric suffix, starting at 2, that is still free.
#[derive(Debug, Default)]
pub struct MethodNameRegistry {
    taken: HashSet<String>,
}

impl MethodNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry where `names` count as already claimed
    pub fn with_reserved<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            taken: names.into_iter().map(String::from).collect(),
        }
    }

    /// Reserve `name`, or the first free suffixed variant of it
    pub fn claim(&mut self, name: String) -> String {
        if self.taken.insert(name.clone()) {
            return name;
        }

        let mut suffix = 2usize;
        loop {
            let candidate = format!("{}{}", name, suffix);
            if self.taken.insert(candidate.clone()) {
                warn!(
                    "Method name '{}' is already in use; emitting '{}' instead",
                    name, candidate
                );
                return candidate;
            }
            suffix += 1;
        }
    }
}
