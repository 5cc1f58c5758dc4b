//! Unified API documentation for modular servers.
//!
//! Independently-initialized server modules describe the HTTP endpoints
//! they expose as [`ApiSpec`] values and contribute them to a shared
//! [`DocRegistry`]; a rendering request later selects a [`Formatter`] by
//! format key and turns a point-in-time [`Snapshot`] into a unified
//! OpenAPI document or a browsable viewer page.
//!
//! ## Features
//!
//! - **Format-agnostic endpoint model**: methods, paths, parameters,
//!   request/response payloads, built with plain builders
//! - **Static type reflection**: payload types describe their own schema
//!   through the [`Reflect`] trait, with cycle-safe expansion
//! - **Concurrency-safe registry**: modules register in any order from any
//!   thread; renders work on snapshots
//! - **Multiple outputs**: OpenAPI 3.0 and 3.1 documents, Swagger UI and
//!   ReDoc viewer pages, selected by format key
//!
//! ## Example
//!
//! ```rust
//! use apidoc::{ApiConfig, ApiSpec, DocRegistry, Endpoint, ResponseDef, RestMethod};
//! use apidoc::render::resolve_formatter;
//!
//! let registry = DocRegistry::new();
//! registry.register_spec(
//!     ApiSpec::new("status", "Status API", "1.0.0").add_endpoint(
//!         Endpoint::new(RestMethod::Get, "/status")
//!             .with_summary("Liveness probe")
//!             .add_response(200, ResponseDef::new("Success")),
//!     ),
//! );
//! registry.configure_api("status", ApiConfig::new("/api/v1"));
//!
//! let formatter = resolve_formatter("openapi").unwrap();
//! let document = formatter.render(&registry.snapshot());
//! let json = document.as_json().unwrap();
//! assert_eq!(
//!     json["paths"]["/api/v1/status"]["get"]["responses"]["200"]["description"],
//!     "Success"
//! );
//! ```

pub mod method;
pub mod registry;
pub mod render;
pub mod schema;
pub mod spec;

// Re-exports for convenience
pub use method::RestMethod;
pub use registry::{ApiConfig, DocRegistry, Snapshot};
pub use render::{
    resolve_formatter, resolve_formatter_or_default, Document, Formatter, RenderError,
};
pub use schema::reflect::{Reflect, ReflectCtx};
pub use schema::Schema;
pub use spec::{ApiSpec, Endpoint, ParamType, Parameter, PayloadRef, ResponseDef};
