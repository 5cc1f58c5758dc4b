//! OpenAPI document formatters.
//!
//! Both dialects share one assembly path: the 3.0 document is built fresh
//! for every render, and the 3.1 dialect overrides the `openapi` version
//! field on that owned value. Concurrent renders of the two dialects never
//! alias a shared document.

use serde::Serialize;
use serde_json::{json, Value};

use crate::registry::Snapshot;
use crate::render::paths::build_paths;
use crate::render::{Document, Formatter};
use crate::schema::reflect::ReflectCtx;

/// OpenAPI dialect versions this crate emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenApiVersion {
    /// OpenAPI 3.0.3.
    #[default]
    V3_0,
    /// OpenAPI 3.1.0.
    V3_1,
}

impl OpenApiVersion {
    /// The version string written to the document's `openapi` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V3_0 => "3.0.3",
            Self::V3_1 => "3.1.0",
        }
    }
}

/// Document-level metadata for the `info` block.
#[derive(Debug, Clone, Serialize)]
pub struct DocInfo {
    /// Document title.
    pub title: String,
    /// Document version.
    pub version: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Contact information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    /// License information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl DocInfo {
    /// Creates info with the required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            contact: None,
            license: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the contact information.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    /// Sets the license information.
    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }
}

impl Default for DocInfo {
    fn default() -> Self {
        Self::new("API Documentation", "1.0.0")
    }
}

/// Contact block for the `info` section.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License block for the `info` section.
#[derive(Debug, Clone, Serialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A server entry for the `servers` section.
#[derive(Debug, Clone, Serialize)]
pub struct Server {
    /// URL to the target host.
    pub url: String,
    /// Server description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    /// Creates a server with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    /// Sets the server description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Renders a snapshot into an OpenAPI document.
///
/// ## Examples
///
/// ```rust
/// use apidoc::{ApiConfig, ApiSpec, DocRegistry, Endpoint, Formatter, RestMethod};
/// use apidoc::render::openapi::{OpenApiFormatter, OpenApiVersion};
///
/// let registry = DocRegistry::new();
/// registry.register_spec(
///     ApiSpec::new("core", "Core API", "1.0.0")
///         .add_endpoint(Endpoint::new(RestMethod::Get, "/health")),
/// );
/// registry.configure_api("core", ApiConfig::new("/api"));
///
/// let formatter = OpenApiFormatter::new(OpenApiVersion::V3_0);
/// let document = formatter.render(&registry.snapshot());
/// let json = document.as_json().unwrap();
/// assert_eq!(json["openapi"], "3.0.3");
/// assert!(json["paths"]["/api/health"]["get"].is_object());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenApiFormatter {
    version: OpenApiVersion,
    info: DocInfo,
    servers: Vec<Server>,
}

impl OpenApiFormatter {
    /// Creates a formatter for the given dialect with default info.
    pub fn new(version: OpenApiVersion) -> Self {
        Self {
            version,
            info: DocInfo::default(),
            servers: Vec::new(),
        }
    }

    /// Sets the document-level info block.
    pub fn with_info(mut self, info: DocInfo) -> Self {
        self.info = info;
        self
    }

    /// Adds a server entry.
    pub fn add_server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    fn build_document(&self, snapshot: &Snapshot) -> Value {
        let mut ctx = ReflectCtx::new();
        let paths = build_paths(snapshot, &mut ctx);

        let mut document = json!({
            "openapi": OpenApiVersion::V3_0.as_str(),
            "info": self.resolve_info(snapshot),
            "paths": paths,
            "components": { "schemas": ctx.take_components() },
        });
        if !self.servers.is_empty() {
            document["servers"] = serde_json::to_value(&self.servers).unwrap();
        }
        document
    }

    /// The document describes one API when exactly one is enabled; promote
    /// that API's (override-adjusted) identity into the info block. With
    /// zero or several APIs the formatter's own info stands.
    fn resolve_info(&self, snapshot: &Snapshot) -> Value {
        let mut enabled = snapshot.enabled_apis();
        if let (Some((_, config, spec)), None) = (enabled.next(), enabled.next()) {
            let mut info = self.info.clone();
            info.title = config.title.clone().unwrap_or_else(|| spec.title.clone());
            info.version = config.version.clone().unwrap_or_else(|| spec.version.clone());
            if spec.description.is_some() {
                info.description = spec.description.clone();
            }
            return serde_json::to_value(&info).unwrap();
        }
        serde_json::to_value(&self.info).unwrap()
    }
}

impl Formatter for OpenApiFormatter {
    fn render(&self, snapshot: &Snapshot) -> Document {
        // the 3.1 dialect is the 3.0 render with one field overridden on the
        // freshly built value
        let mut document = self.build_document(snapshot);
        if self.version == OpenApiVersion::V3_1 {
            document["openapi"] = json!(OpenApiVersion::V3_1.as_str());
        }
        Document::Json(document)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
