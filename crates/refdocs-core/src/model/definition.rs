use std::fmt;

use heck::ToKebabCase;
use serde::Serialize;

use crate::parse::schema::Schema;

/// The (group, version, kind) identity of an API resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// The empty triple, meaning "not a named resource definition".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.version.is_empty() && self.kind.is_empty()
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.group, self.version, self.kind)
    }
}

/// One version of one API resource type.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Display name, the kind.
    pub name: String,
    pub gvk: GroupVersionKind,
    pub description: Option<String>,
    /// The kind exists in more than one group, so the group must be shown.
    pub show_group: bool,
    pub is_inlined: bool,
    pub is_old_version: bool,
    /// Carries `x-kubernetes-group-version-kind`, i.e. a top-level resource.
    pub in_toc: bool,
    pub found_in_field: bool,
    pub found_in_operation: bool,
    pub schema: Schema,
}

impl Definition {
    pub fn new(gvk: GroupVersionKind, schema: Schema) -> Self {
        Self {
            name: gvk.kind.clone(),
            description: schema.description.clone(),
            gvk,
            show_group: false,
            is_inlined: false,
            is_old_version: false,
            in_toc: false,
            found_in_field: false,
            found_in_operation: false,
            schema,
        }
    }

    pub fn group(&self) -> &str {
        &self.gvk.group
    }

    pub fn version(&self) -> &str {
        &self.gvk.version
    }

    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    /// `group.version.kind`, the primary key.
    pub fn key(&self) -> String {
        self.gvk.to_string()
    }

    /// Link target for renderers, e.g. `horizontal-pod-autoscaler-v2beta1-autoscaling`.
    pub fn anchor(&self) -> String {
        format!(
            "{}-{}-{}",
            self.gvk.kind.to_kebab_case(),
            self.gvk.version.to_kebab_case(),
            self.gvk.group.to_kebab_case()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_and_anchor() {
        let d = Definition::new(
            GroupVersionKind::new("autoscaling", "v2beta1", "HorizontalPodAutoscaler"),
            Schema::default(),
        );
        assert_eq!(d.key(), "autoscaling.v2beta1.HorizontalPodAutoscaler");
        assert_eq!(d.anchor(), "horizontal-pod-autoscaler-v2beta1-autoscaling");
        assert_eq!(d.name, "HorizontalPodAutoscaler");
    }

    #[test]
    fn test_empty_gvk() {
        assert!(GroupVersionKind::empty().is_empty());
        assert!(!GroupVersionKind::new("core", "v1", "Pod").is_empty());
    }
}
