//! Format-agnostic endpoint model contributed by server modules.
//!
//! Modules build an [`ApiSpec`] once at initialization and hand it to the
//! registry; everything here is plain owned data with builder-style
//! constructors. Payload shapes are carried as [`PayloadRef`] values so the
//! model stays independent of any output dialect.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use strum::{Display, EnumString};

use crate::method::RestMethod;
use crate::schema::reflect::{Reflect, ReflectCtx};
use crate::schema::Schema;

/// A module's self-description of the endpoints it exposes.
///
/// Produced once, registered under `id`, and treated as immutable after
/// registration; registering again under the same id replaces the whole
/// spec, never merges.
///
/// ## Examples
///
/// ```rust
/// use apidoc::{ApiSpec, Endpoint, ResponseDef, RestMethod};
///
/// let spec = ApiSpec::new("inventory", "Inventory API", "2.1.0")
///     .with_description("Stock levels and reservations")
///     .add_endpoint(
///         Endpoint::new(RestMethod::Get, "/items/{id}")
///             .with_summary("Fetch one item")
///             .add_response(200, ResponseDef::new("The item")),
///     );
/// assert_eq!(spec.endpoints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ApiSpec {
    /// Unique key this spec registers under.
    pub id: String,
    /// Human-readable API title.
    pub title: String,
    /// API version string (e.g. "1.0.0").
    pub version: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Endpoints in declaration order.
    pub endpoints: Vec<Endpoint>,
}

impl ApiSpec {
    /// Creates a spec with the required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: version.into(),
            description: None,
            endpoints: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an endpoint.
    pub fn add_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Adds multiple endpoints.
    pub fn add_endpoints(mut self, endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        self.endpoints.extend(endpoints);
        self
    }
}

/// One documented endpoint: method, relative path, payloads, parameters.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// HTTP method for the endpoint.
    pub method: RestMethod,
    /// Path relative to the API's configured base, may contain `{name}`
    /// placeholders.
    pub path: String,
    /// Short summary.
    pub summary: Option<String>,
    /// Detailed description.
    pub description: Option<String>,
    /// Request payload shape, if the endpoint takes a body.
    pub request: Option<PayloadRef>,
    /// Response definitions keyed by status code.
    pub responses: BTreeMap<u16, ResponseDef>,
    /// Parameters bound in the path.
    pub path_params: Vec<Parameter>,
    /// Parameters bound in the query string.
    pub query_params: Vec<Parameter>,
    /// Parameters bound in request headers.
    pub headers: Vec<Parameter>,
    /// Extra grouping tags beyond the API's own.
    pub tags: Vec<String>,
    /// Whether the endpoint is deprecated.
    pub deprecated: bool,
}

impl Endpoint {
    /// Creates an endpoint for the given method and relative path.
    pub fn new(method: RestMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            summary: None,
            description: None,
            request: None,
            responses: BTreeMap::new(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            headers: Vec::new(),
            tags: Vec::new(),
            deprecated: false,
        }
    }

    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares the request payload by type.
    pub fn with_request<T: Reflect>(mut self) -> Self {
        self.request = Some(PayloadRef::of::<T>());
        self
    }

    /// Declares the request payload from an existing reference.
    pub fn with_request_payload(mut self, payload: PayloadRef) -> Self {
        self.request = Some(payload);
        self
    }

    /// Adds a response definition for a status code. Status codes are unique
    /// per endpoint; declaring one twice keeps the later definition.
    pub fn add_response(mut self, status: u16, response: ResponseDef) -> Self {
        self.responses.insert(status, response);
        self
    }

    /// Adds a path parameter.
    pub fn add_path_param(mut self, param: Parameter) -> Self {
        self.path_params.push(param);
        self
    }

    /// Adds a query parameter.
    pub fn add_query_param(mut self, param: Parameter) -> Self {
        self.query_params.push(param);
        self
    }

    /// Adds a header parameter.
    pub fn add_header(mut self, param: Parameter) -> Self {
        self.headers.push(param);
        self
    }

    /// Adds a grouping tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Marks the endpoint as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// One declared response: a description and an optional body shape.
#[derive(Debug, Clone)]
pub struct ResponseDef {
    /// What this response means.
    pub description: String,
    /// Body shape, if the response carries one.
    pub body: Option<PayloadRef>,
}

impl ResponseDef {
    /// Creates a response with a description and no body.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            body: None,
        }
    }

    /// Declares the response body by type.
    pub fn with_body<T: Reflect>(mut self) -> Self {
        self.body = Some(PayloadRef::of::<T>());
        self
    }

    /// Declares the response body from an existing reference.
    pub fn with_body_payload(mut self, payload: PayloadRef) -> Self {
        self.body = Some(payload);
        self
    }
}

/// Primitive kinds a parameter can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// The schema leaf for this primitive kind.
    pub fn schema(self) -> Schema {
        match self {
            Self::String => Schema::string(),
            Self::Integer => Schema::integer(),
            Self::Number => Schema::number(),
            Self::Boolean => Schema::boolean(),
        }
    }
}

/// A path, query, or header parameter. Where it binds is decided by which
/// [`Endpoint`] list it is added to.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Parameter name as it appears on the wire.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Whether the parameter must be supplied.
    pub required: bool,
    /// Declared primitive kind.
    pub ty: ParamType,
    /// Format hint.
    pub format: Option<String>,
    /// Validation pattern.
    pub pattern: Option<String>,
    /// Allowed values.
    pub enum_values: Vec<String>,
    /// Default value.
    pub default: Option<Value>,
    /// Example value.
    pub example: Option<Value>,
}

impl Parameter {
    /// Creates an optional parameter of the given kind.
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
            ty,
            format: None,
            pattern: None,
            enum_values: Vec::new(),
            default: None,
            example: None,
        }
    }

    /// Marks the parameter required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the format hint.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the validation pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the allowed values.
    pub fn with_enum_values(
        mut self,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the example value.
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Builds the schema for this parameter from its declared kind and
    /// modifiers, never from a runtime value.
    pub fn schema(&self) -> Schema {
        let mut schema = self.ty.schema();
        if let Some(format) = &self.format {
            schema = schema.with_format(format.clone());
        }
        if let Some(pattern) = &self.pattern {
            schema = schema.with_pattern(pattern.clone());
        }
        if !self.enum_values.is_empty() {
            schema = schema.with_enum_values(self.enum_values.iter().cloned());
        }
        if let Some(default) = &self.default {
            schema = schema.with_default(default.clone());
        }
        if let Some(example) = &self.example {
            schema = schema.with_example(example.clone());
        }
        schema
    }
}

/// Type-erased reference to a reflectable payload type.
///
/// Captures how to build the payload's schema without holding an instance;
/// the schema itself is built per render inside a [`ReflectCtx`].
#[derive(Clone, Copy)]
pub struct PayloadRef {
    build: fn(&mut ReflectCtx) -> Schema,
}

impl PayloadRef {
    /// References the schema of `T`.
    pub fn of<T: Reflect>() -> Self {
        Self { build: T::reflect }
    }

    /// A payload whose shape cannot be described; degrades to a generic
    /// object rather than failing.
    pub fn opaque() -> Self {
        Self {
            build: |_| Schema::object(),
        }
    }

    /// Builds the referenced schema.
    pub fn schema(&self, ctx: &mut ReflectCtx) -> Schema {
        (self.build)(ctx)
    }
}

impl fmt::Debug for PayloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PayloadRef")
    }
}
