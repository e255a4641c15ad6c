use heck::ToKebabCase;
use serde::Serialize;

use super::definition::GroupVersionKind;
use crate::parse::schema::Schema;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// One HTTP method/path endpoint.
#[derive(Debug, Clone)]
pub struct Operation {
    pub id: String,
    pub http_method: HttpMethod,
    pub path: String,
    /// Empty until classification assigns a slot.
    pub friendly_name: String,
    /// The definition this operation acts on, when it could be resolved.
    pub definition: Option<GroupVersionKind>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Schema of the `in: body` parameter.
    pub request_schema: Option<Schema>,
    /// Schema of the first successful (200/201) response.
    pub response_schema: Option<Schema>,
    /// Raw `x-kubernetes-group-version-kind`, group not yet normalised.
    pub extension_gvk: Option<GroupVersionKind>,
}

impl Operation {
    pub fn new(id: impl Into<String>, http_method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            http_method,
            path: path.into(),
            friendly_name: String::new(),
            definition: None,
            description: None,
            tags: Vec::new(),
            request_schema: None,
            response_schema: None,
            extension_gvk: None,
        }
    }

    pub fn is_classified(&self) -> bool {
        !self.friendly_name.is_empty()
    }

    /// e.g. `createNamespacedPod` → `create-namespaced-pod`
    pub fn anchor(&self) -> String {
        self.id.to_kebab_case()
    }
}
