//! Derives the (group, version, kind) identity of a schema from its definition name.
//!
//! Kubernetes names definitions after their Go package path, e.g.
//! `io.k8s.api.apps.v1.Deployment`. The group and version are recovered from the trailing
//! dotted segments.

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::model::GroupVersionKind;
use crate::parse::schema::Schema;

/// Extension key carrying the canonical GVK on top-level resources and operations.
pub const GVK_EXTENSION: &str = "x-kubernetes-group-version-kind";

/// Resolve the GVK a schema refers to.
///
/// Arrays resolve to their element's identity. Primitives and schemas without a
/// `$ref` resolve to the empty triple.
pub fn resolve(schema: &Schema) -> Result<GroupVersionKind, ResolveError> {
    if schema.is_array() {
        return match schema.items.as_deref() {
            Some(items) => resolve(items),
            None => Ok(GroupVersionKind::empty()),
        };
    }
    match schema.ref_path.as_deref() {
        Some(ref_path) if schema.is_definition() => resolve_reference(ref_path),
        _ => Ok(GroupVersionKind::empty()),
    }
}

/// Resolve a definition name or `#/definitions/...` reference.
///
/// Wrapper types under `util` or `pkg` (e.g. `IntOrString`, `RawExtension`) are not
/// resources and resolve to the empty triple. Any other layout is an error.
pub fn resolve_reference(reference: &str) -> Result<GroupVersionKind, ResolveError> {
    let name = definition_name(reference);
    let segments: Vec<&str> = name.split('.').collect();
    let from_end = |n: usize| segments.len().checked_sub(n).map(|i| segments[i]);

    let (group, version, kind) = match (from_end(3), from_end(4)) {
        // io.k8s.apimachinery.pkg.api.resource.Quantity
        (Some("api"), _) => ("core", from_end(2), from_end(1)),
        // io.k8s.api.core.v1.Pod
        (_, Some("api")) => (segments[segments.len() - 3], from_end(2), from_end(1)),
        // io.k8s.apimachinery.pkg.apis.meta.v1.Status
        (_, Some("apis")) => (segments[segments.len() - 3], from_end(2), from_end(1)),
        // io.k8s.apimachinery.pkg.util.intstr.IntOrString
        // io.k8s.apimachinery.pkg.runtime.RawExtension
        (Some("util" | "pkg"), _) => return Ok(GroupVersionKind::empty()),
        _ => return Err(ResolveError::UnrecognizedName(name.to_string())),
    };

    match (version, kind) {
        (Some(version), Some(kind)) => Ok(GroupVersionKind::new(group, version, kind)),
        _ => Err(ResolveError::UnrecognizedName(name.to_string())),
    }
}

/// Display name of a schema: the kind for definitions, `"<item> array"` for arrays,
/// and the scalar type otherwise.
pub fn type_name(schema: &Schema) -> Result<String, ResolveError> {
    if let Some(ref_path) = schema.ref_path.as_deref().filter(|_| schema.is_definition()) {
        let gvk = resolve_reference(ref_path)?;
        if gvk.is_empty() {
            // Wrapper types have no kind; show their bare name.
            let name = definition_name(ref_path);
            return Ok(name.rsplit('.').next().unwrap_or(name).to_string());
        }
        return Ok(gvk.kind);
    }
    if schema.is_array() {
        let items = schema
            .items
            .as_deref()
            .ok_or_else(|| ResolveError::MissingType("array without items".to_string()))?;
        return Ok(format!("{} array", type_name(items)?));
    }
    match schema.schema_type {
        Some(t) => Ok(t.as_str().to_string()),
        None => Err(ResolveError::MissingType(
            schema
                .description
                .clone()
                .unwrap_or_else(|| "<no description>".to_string()),
        )),
    }
}

/// Read `x-kubernetes-group-version-kind`, which is either an object or a list of them.
/// Only the first entry of a list is used.
pub fn extension_gvk(extensions: &IndexMap<String, serde_json::Value>) -> Option<GroupVersionKind> {
    let value = extensions.get(GVK_EXTENSION)?;
    let entry = match value {
        serde_json::Value::Array(entries) => entries.first()?,
        other => other,
    };
    let field = |key: &str| entry.get(key).and_then(|v| v.as_str()).map(str::to_string);
    Some(GroupVersionKind {
        group: field("group").unwrap_or_default(),
        version: field("version")?,
        kind: field("kind")?,
    })
}

fn definition_name(reference: &str) -> &str {
    let trimmed = reference.trim_start_matches('#');
    trimmed.strip_prefix("/definitions/").unwrap_or(trimmed)
}
