//! Merges registered specs into the document's path map.
//!
//! Each enabled API's endpoints land under `config.path + endpoint.path`;
//! one path-item value exists per distinct full path, with one operation
//! slot per HTTP method. APIs that collide on the same full path share the
//! path item.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::registry::Snapshot;
use crate::schema::reflect::ReflectCtx;
use crate::spec::{Endpoint, Parameter};

/// Builds the merged path map for a snapshot.
///
/// The context accumulates component schemas (from cycle references) across
/// every payload in the render, so the caller can publish them afterwards.
pub fn build_paths(snapshot: &Snapshot, ctx: &mut ReflectCtx) -> BTreeMap<String, Value> {
    let mut paths: BTreeMap<String, Value> = BTreeMap::new();

    for (id, config, spec) in snapshot.enabled_apis() {
        let tag = config.title.as_deref().unwrap_or(&spec.title);
        for endpoint in &spec.endpoints {
            let full_path = format!("{}{}", config.path, endpoint.path);
            let method = endpoint.method.to_string().to_lowercase();
            let operation = build_operation(id, tag, endpoint, ctx);

            let item = paths.entry(full_path.clone()).or_insert_with(|| json!({}));
            if let Value::Object(map) = item {
                if map.insert(method.clone(), operation).is_some() {
                    debug!(path = %full_path, %method, "operation slot replaced by a later endpoint");
                }
            }
        }
    }

    paths
}

fn build_operation(id: &str, tag: &str, endpoint: &Endpoint, ctx: &mut ReflectCtx) -> Value {
    let mut tags = vec![tag.to_string()];
    tags.extend(endpoint.tags.iter().cloned());

    let mut operation = json!({
        "operationId": operation_id(id, endpoint),
        "tags": tags,
        "responses": build_responses(endpoint, ctx),
    });

    if let Some(summary) = &endpoint.summary {
        operation["summary"] = json!(summary);
    }
    if let Some(description) = &endpoint.description {
        operation["description"] = json!(description);
    }
    if endpoint.deprecated {
        operation["deprecated"] = json!(true);
    }

    let parameters: Vec<Value> = endpoint
        .path_params
        .iter()
        .map(|p| parameter_entry(p, "path"))
        .chain(endpoint.query_params.iter().map(|p| parameter_entry(p, "query")))
        .chain(endpoint.headers.iter().map(|p| parameter_entry(p, "header")))
        .collect();
    if !parameters.is_empty() {
        operation["parameters"] = Value::Array(parameters);
    }

    if let Some(request) = &endpoint.request {
        if !endpoint.method.has_body() {
            warn!(method = %endpoint.method, path = %endpoint.path,
                "request payload declared on a bodyless method");
        }
        operation["requestBody"] = json!({
            "required": true,
            "content": { "application/json": { "schema": request.schema(ctx) } },
        });
    }

    operation
}

fn build_responses(endpoint: &Endpoint, ctx: &mut ReflectCtx) -> Value {
    if endpoint.responses.is_empty() {
        // every operation documents at least one response
        return json!({ "200": { "description": "Successful response" } });
    }

    let mut responses = serde_json::Map::new();
    for (status, def) in &endpoint.responses {
        let mut entry = json!({ "description": def.description });
        if let Some(body) = &def.body {
            entry["content"] = json!({ "application/json": { "schema": body.schema(ctx) } });
        }
        responses.insert(status.to_string(), entry);
    }
    Value::Object(responses)
}

fn parameter_entry(param: &Parameter, location: &str) -> Value {
    let mut entry = json!({
        "name": param.name,
        "in": location,
        "required": param.required,
        "schema": param.schema(),
    });
    if let Some(description) = &param.description {
        entry["description"] = json!(description);
    }
    entry
}

/// Derives an operation id as `{api id}_{method}_{cleaned path}`, where
/// cleaning maps `/` to `_`, strips braces, and trims the leading `_`.
///
/// Ids are not guaranteed unique: two paths under the same API id and
/// method that differ only in placeholder names clean to the same id.
fn operation_id(id: &str, endpoint: &Endpoint) -> String {
    let cleaned: String = endpoint
        .path
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    format!(
        "{}_{}_{}",
        id,
        endpoint.method.to_string().to_lowercase(),
        cleaned.trim_start_matches('_')
    )
}
