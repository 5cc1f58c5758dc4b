//! Rendering pipeline: the formatter protocol, document values, and format
//! key dispatch.
//!
//! A [`Formatter`] turns a registry [`Snapshot`] into a [`Document`] -
//! either a structured OpenAPI document or a viewer HTML page. Formatters
//! are selected by a case-sensitive format key through one of two entry
//! points with deliberately different unknown-key contracts:
//! [`resolve_formatter`] fails closed, [`resolve_formatter_or_default`]
//! falls back to the OpenAPI 3.0 document formatter. Callers depend on
//! both behaviors; do not unify them.

pub mod openapi;
pub mod paths;
pub mod viewer;

use std::io;

use thiserror::Error;

use crate::registry::Snapshot;
use self::openapi::{OpenApiFormatter, OpenApiVersion};
use self::viewer::{RedocFormatter, SwaggerUiFormatter};

/// Errors surfaced by the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The format key matched no registered formatter.
    #[error("no formatter registered for format key {0:?}")]
    UnknownFormat(String),

    /// JSON serialization failed.
    #[error("failed to serialize document to JSON: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    /// YAML serialization failed.
    #[error("failed to serialize document to YAML: {0}")]
    YamlSerialize(#[source] serde_yaml::Error),
}

/// A rendered documentation artifact, built fresh per render and never
/// mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// A structured document object graph.
    Json(serde_json::Value),
    /// A viewer page.
    Html(String),
}

impl Document {
    /// The document as a JSON value, if it is one.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Html(_) => None,
        }
    }

    /// Serializes to a pretty JSON string; HTML documents pass through.
    pub fn to_json_string(&self) -> Result<String, RenderError> {
        match self {
            Self::Json(value) => {
                serde_json::to_string_pretty(value).map_err(RenderError::JsonSerialize)
            }
            Self::Html(html) => Ok(html.clone()),
        }
    }

    /// Serializes to a YAML string; HTML documents pass through.
    pub fn to_yaml_string(&self) -> Result<String, RenderError> {
        match self {
            Self::Json(value) => serde_yaml::to_string(value).map_err(RenderError::YamlSerialize),
            Self::Html(html) => Ok(html.clone()),
        }
    }
}

/// One output variant of the rendering pipeline.
pub trait Formatter: std::fmt::Debug {
    /// Renders a snapshot into a document.
    ///
    /// A pure function of the snapshot: no shared state is touched, and
    /// well-formed input cannot fail - unknown shapes degrade to generic
    /// ones instead.
    fn render(&self, snapshot: &Snapshot) -> Document;

    /// The Content-Type the rendered document should be served with.
    fn content_type(&self) -> &'static str;

    /// Serializes the document into the sink.
    ///
    /// The only failure mode is the sink itself; sink errors propagate
    /// unchanged.
    fn write(&self, document: &Document, sink: &mut dyn io::Write) -> io::Result<()> {
        match document {
            Document::Json(value) => {
                serde_json::to_writer_pretty(&mut *sink, value).map_err(io::Error::from)
            }
            Document::Html(html) => sink.write_all(html.as_bytes()),
        }
    }
}

/// Resolves a format key to its formatter, failing closed on unknown keys.
///
/// Recognized keys (case-sensitive): `openapi`, `openapi-3.0`, `oas3` for
/// the 3.0 document; `openapi-3.1`, `oas31` for the 3.1 document;
/// `swagger`, `swagger-ui` for Swagger UI; `redoc`, `redoc-ui` for ReDoc.
///
/// ## Errors
///
/// Returns [`RenderError::UnknownFormat`] for any other key; the caller is
/// expected to surface that as a client-visible error.
pub fn resolve_formatter(key: &str) -> Result<Box<dyn Formatter>, RenderError> {
    match key {
        "openapi" | "openapi-3.0" | "oas3" => {
            Ok(Box::new(OpenApiFormatter::new(OpenApiVersion::V3_0)))
        }
        "openapi-3.1" | "oas31" => Ok(Box::new(OpenApiFormatter::new(OpenApiVersion::V3_1))),
        "swagger" | "swagger-ui" => Ok(Box::new(SwaggerUiFormatter::default())),
        "redoc" | "redoc-ui" => Ok(Box::new(RedocFormatter::default())),
        _ => Err(RenderError::UnknownFormat(key.to_string())),
    }
}

/// Resolves a format key, falling back to the OpenAPI 3.0 document
/// formatter for unknown keys instead of failing.
pub fn resolve_formatter_or_default(key: &str) -> Box<dyn Formatter> {
    resolve_formatter(key)
        .unwrap_or_else(|_| Box::new(OpenApiFormatter::new(OpenApiVersion::V3_0)))
}
