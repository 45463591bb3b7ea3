//! fetchgen Core Library
//!
//! This library turns an OpenAPI description into the source of a
//! fetch-based HTTP client class, either once or continuously while the
//! description is being edited.

pub mod builders;
pub mod config;
pub mod error;
pub mod generate;
pub mod naming;
pub mod openapi;
pub mod templates;
pub mod utils;
pub mod watch;

pub use crate::{
    config::Config,
    error::{Error, Result},
    generate::generate,
    openapi::{ApiDocument, HttpMethod, OpenApiContext, OpenApiOperation},
    templates::{GeneratedClient, TemplateManager},
    watch::{CycleState, WatchSession},
};
