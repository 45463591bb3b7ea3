//! Context builder traits and adapters for client codegen.
pub mod fetch;

use crate::naming::{resolve_operation_name, MethodNameRegistry, RESERVED_METHOD_NAMES};
use crate::openapi::OpenApiOperation;
use crate::templates::ClientEndpoint;

pub use fetch::FetchEndpointContextBuilder;

/// Trait for converting an OpenApiOperation into a template endpoint context.
pub trait EndpointContextBuilder {
    fn build(&self, op: &OpenApiOperation, method_name: String) -> crate::Result<ClientEndpoint>;
}

pub struct EndpointContext;

impl EndpointContext {
    /// Transform a list of OpenAPI operations into endpoint contexts.
    ///
    /// The output keeps the input order. Each operation gets a resolved method
    /// name that is unique within the list and never one of the client's own
    /// members.
    pub fn transform_endpoints(
        builder: &dyn EndpointContextBuilder,
        operations: &[OpenApiOperation],
    ) -> crate::Result<Vec<ClientEndpoint>> {
        let mut registry =
            MethodNameRegistry::with_reserved(RESERVED_METHOD_NAMES.iter().copied());
        let mut contexts = Vec::with_capacity(operations.len());
        for op in operations {
            let method_name = registry.claim(resolve_operation_name(op));
            contexts.push(builder.build(op, method_name)?);
        }
        Ok(contexts)
    }
}
