//! Endpoint context builder for the fetch-based client template.

use super::EndpointContextBuilder;
use crate::openapi::OpenApiOperation;
use crate::templates::ClientEndpoint;
use crate::utils::escape_single_quoted;

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchEndpointContextBuilder;

impl EndpointContextBuilder for FetchEndpointContextBuilder {
    fn build(&self, op: &OpenApiOperation, method_name: String) -> crate::Result<ClientEndpoint> {
        Ok(ClientEndpoint {
            method_name,
            path: op.path.clone(),
            path_literal: escape_single_quoted(&op.path),
            method: op.method.as_str().to_string(),
            has_request_body: op.has_request_body(),
            operation_id: op.operation_id.clone(),
            tags: op.tags.clone().unwrap_or_default(),
        })
    }
}
