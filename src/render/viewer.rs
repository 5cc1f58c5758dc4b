//! Browsable HTML viewers over a served OpenAPI document.
//!
//! Viewers never read the snapshot; they render a static shell that loads a
//! pinned third-party bundle and points it at the spec URL. The URL is the
//! only parameter, and each shell escapes it for the context it lands in:
//! Swagger UI embeds it inside a script literal (JSON-string escaping),
//! ReDoc inside a double-quoted HTML attribute (the delimiting quote only).

use crate::registry::Snapshot;
use crate::render::{Document, Formatter};

/// Spec URL used when none is supplied.
pub const DEFAULT_SPEC_URL: &str = "./openapi.json";

const SWAGGER_UI_VERSION: &str = "5.17.14";
const REDOC_VERSION: &str = "2.1.5";

/// Renders the Swagger UI shell.
///
/// ## Examples
///
/// ```rust
/// use apidoc::{Formatter, Snapshot};
/// use apidoc::render::viewer::SwaggerUiFormatter;
///
/// let formatter = SwaggerUiFormatter::new("/api/openapi.json");
/// let document = formatter.render(&Snapshot::default());
/// assert!(formatter.content_type().starts_with("text/html"));
/// ```
#[derive(Debug, Clone)]
pub struct SwaggerUiFormatter {
    spec_url: String,
}

impl SwaggerUiFormatter {
    /// Creates a viewer pointing at the given spec URL.
    pub fn new(spec_url: impl Into<String>) -> Self {
        Self {
            spec_url: spec_url.into(),
        }
    }
}

impl Default for SwaggerUiFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SPEC_URL)
    }
}

impl Formatter for SwaggerUiFormatter {
    fn render(&self, _snapshot: &Snapshot) -> Document {
        // script-literal context: JSON-string escaping, quotes included
        let url = serde_json::to_string(&self.spec_url).unwrap();
        let html = format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>API Documentation</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_VERSION}/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@{SWAGGER_UI_VERSION}/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{
        url: {url},
        dom_id: "#swagger-ui"
      }});
    }};
  </script>
</body>
</html>
"##
        );
        Document::Html(html)
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

/// Renders the ReDoc shell.
#[derive(Debug, Clone)]
pub struct RedocFormatter {
    spec_url: String,
}

impl RedocFormatter {
    /// Creates a viewer pointing at the given spec URL.
    pub fn new(spec_url: impl Into<String>) -> Self {
        Self {
            spec_url: spec_url.into(),
        }
    }
}

impl Default for RedocFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SPEC_URL)
    }
}

impl Formatter for RedocFormatter {
    fn render(&self, _snapshot: &Snapshot) -> Document {
        // double-quoted attribute context: escape the delimiter only
        let url = self.spec_url.replace('"', "&quot;");
        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>API Documentation</title>
  <style>body {{ margin: 0; padding: 0; }}</style>
</head>
<body>
  <redoc spec-url="{url}"></redoc>
  <script src="https://cdn.redoc.ly/redoc/v{REDOC_VERSION}/bundles/redoc.standalone.js"></script>
</body>
</html>
"#
        );
        Document::Html(html)
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}
