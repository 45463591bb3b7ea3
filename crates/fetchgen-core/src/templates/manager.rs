//! Template system for client code generation

// Internal imports (std, crate)
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    builders::{EndpointContext, FetchEndpointContextBuilder},
    error::{Error, Result},
    openapi::ApiDocument,
    utils::{is_valid_identifier, sanitize_comment},
};

use super::{ClientContext, GeneratedClient};

// External imports (alphabetized)
use log::debug;
use tera::{Context, Tera};

/// The built-in fetch client template
pub const FETCH_CLIENT_TEMPLATE: &str = include_str!("../../templates/fetch_client.js.tera");

const TEMPLATE_NAME: &str = "fetch_client.js";

/// Where the loaded client template came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin,
    File(PathBuf),
}

/// Manages loading and rendering of the client template
#[derive(Debug, Clone)]
pub struct TemplateManager {
    /// Cached Tera template engine instance
    tera: Arc<Tera>,
    source: TemplateSource,
}

impl TemplateManager {
    /// Create a TemplateManager for the built-in template, or for a custom
    /// template file when `template_path` is given.
    pub async fn new(template_path: Option<PathBuf>) -> Result<Self> {
        match template_path {
            Some(path) => Self::from_file(path).await,
            None => Self::builtin(),
        }
    }

    /// Load the built-in fetch client template
    pub fn builtin() -> Result<Self> {
        Self::from_source(FETCH_CLIENT_TEMPLATE, TemplateSource::Builtin)
    }

    /// Load a custom client template from disk
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::config(format!(
                "Failed to read client template {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_source(&content, TemplateSource::File(path.to_path_buf()))
    }

    fn from_source(content: &str, source: TemplateSource) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.add_raw_template(TEMPLATE_NAME, content)?;
        debug!("Loaded client template from {:?}", source);
        Ok(Self {
            tera: Arc::new(tera),
            source,
        })
    }

    /// Where the template was loaded from
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render a complete client for `document`.
    ///
    /// Methods appear in the order of `document.endpoints`.
    pub fn render(&self, document: &ApiDocument, class_name: &str) -> Result<GeneratedClient> {
        if !is_valid_identifier(class_name) {
            return Err(Error::emit(format!(
                "class name '{}' is not a valid identifier",
                class_name
            )));
        }

        let endpoints =
            EndpointContext::transform_endpoints(&FetchEndpointContextBuilder, &document.endpoints)?;
        let client = ClientContext {
            class_name: class_name.to_string(),
            title: document.title().map(sanitize_comment),
            version: document.version().map(sanitize_comment),
            endpoints,
            schemas: document.schemas.clone(),
        };

        let context = Context::from_serialize(&client)?;
        let source_text = self.tera.render(TEMPLATE_NAME, &context)?;

        Ok(GeneratedClient {
            class_name: client.class_name,
            source_text,
        })
    }
}
