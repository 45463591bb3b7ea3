//! Code generation functionality for fetchgen
//!
//! A generation cycle reads the description, resolves its endpoints, renders
//! the client and persists it. The output file is only ever replaced as a
//! whole: content goes to a sibling temporary file first and is renamed over
//! the destination, so a failed cycle leaves the previous output untouched.

use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    error::{Error, Result},
    openapi::{ApiDocument, OpenApiContext},
    templates::{GeneratedClient, TemplateManager},
};

use log::{debug, info};
use tokio::fs;

/// Parse `content` and render a client from it without touching the disk
pub fn render(
    content: &str,
    class_name: &str,
    templates: &TemplateManager,
) -> Result<GeneratedClient> {
    let document = OpenApiContext::parse_content(content)?.parse_document()?;
    emit(&document, class_name, templates)
}

/// Run one full cycle: read, parse, resolve, emit, write.
///
/// The cycle only returns `Ok` after the output file is completely written.
pub async fn run_cycle(config: &Config, templates: &TemplateManager) -> Result<GeneratedClient> {
    let document = OpenApiContext::from_file(&config.input_path)
        .await?
        .parse_document()
        .map_err(|e| e.in_file(&config.input_path))?;

    let client = emit(&document, config.class_name(), templates)?;
    write_output(&config.output_path, &client.source_text).await?;
    Ok(client)
}

fn emit(
    document: &ApiDocument,
    class_name: &str,
    templates: &TemplateManager,
) -> Result<GeneratedClient> {
    debug!(
        "Resolved {} endpoint(s) from '{}'",
        document.endpoints.len(),
        document.title().unwrap_or("untitled")
    );
    templates.render(document, class_name)
}

/// Main entry point for one-shot code generation
pub async fn generate(config: &Config) -> Result<GeneratedClient> {
    config.validate()?;
    let templates = TemplateManager::new(config.template_path.clone()).await?;

    info!(
        "Generating {} from {}",
        config.output_path.display(),
        config.input_path.display()
    );
    let client = run_cycle(config, &templates).await?;
    info!(
        "Wrote {} to {}",
        client.class_name,
        config.output_path.display()
    );
    Ok(client)
}

/// Replace `path` with `content` in one step
async fn write_output(path: &Path, content: &str) -> Result<()> {
    let to_write_error = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(to_write_error)?;
    }

    let staging = staging_path(path);
    if let Err(source) = fs::write(&staging, content).await {
        let _ = fs::remove_file(&staging).await;
        return Err(to_write_error(source));
    }
    if let Err(source) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(to_write_error(source));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".fetchgen-tmp");
    path.with_file_name(name)
}
