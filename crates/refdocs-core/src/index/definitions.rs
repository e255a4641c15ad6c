use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::name_resolver::{self, extension_gvk};
use super::version::VersionOrdering;
use crate::error::ResolveError;
use crate::model::{Definition, Diagnostic, GroupVersionKind};
use crate::parse::schema::{AdditionalProperties, Schema};
use crate::parse::spec::SwaggerSpec;

/// Position of a definition in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionHandle(usize);

/// Definitions keyed by full identity and by kind alone.
///
/// Both views hold handles into one arena, so a definition is always reachable
/// through both keys or through neither. Not safe for concurrent writers.
#[derive(Debug, Clone, Default)]
pub struct DefinitionIndex {
    arena: Vec<Definition>,
    by_gvk: HashMap<GroupVersionKind, DefinitionHandle>,
    by_kind: IndexMap<String, Vec<DefinitionHandle>>,
}

impl DefinitionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the `definitions` of every spec and index each named resource type.
    ///
    /// Wrapper types that resolve to the empty triple are skipped. An unrecognized
    /// name aborts the walk unless `allow_errors` is set, in which case it is
    /// reported and skipped.
    pub fn build(
        specs: &[SwaggerSpec],
        allow_errors: bool,
    ) -> Result<(Self, Vec<Diagnostic>), ResolveError> {
        let mut index = Self::new();
        let mut diagnostics = Vec::new();

        for spec in specs {
            for (name, schema) in &spec.definitions {
                let gvk = match name_resolver::resolve_reference(name) {
                    Ok(gvk) => gvk,
                    Err(e) if allow_errors => {
                        log::warn!("{e}");
                        diagnostics.push(Diagnostic::UnresolvedName {
                            reference: name.clone(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                if gvk.is_empty() {
                    log::debug!("skipping wrapper type {name}");
                    continue;
                }
                let mut definition = Definition::new(gvk, schema.clone());
                definition.in_toc = extension_gvk(&schema.extensions).is_some();
                index.put(definition);
            }
        }

        log::debug!(
            "indexed {} definitions across {} kinds",
            index.len(),
            index.by_kind.len()
        );
        Ok((index, diagnostics))
    }

    /// Insert a definition. Re-inserting an existing identity replaces it in place
    /// and leaves the by-kind list untouched.
    pub fn put(&mut self, definition: Definition) -> DefinitionHandle {
        if let Some(&handle) = self.by_gvk.get(&definition.gvk) {
            self.arena[handle.0] = definition;
            return handle;
        }
        let handle = DefinitionHandle(self.arena.len());
        self.by_gvk.insert(definition.gvk.clone(), handle);
        self.by_kind
            .entry(definition.gvk.kind.clone())
            .or_default()
            .push(handle);
        self.arena.push(definition);
        handle
    }

    pub fn get(&self, group: &str, version: &str, kind: &str) -> Option<&Definition> {
        self.get_by_key(&GroupVersionKind::new(group, version, kind))
    }

    pub fn get_by_key(&self, gvk: &GroupVersionKind) -> Option<&Definition> {
        self.by_gvk.get(gvk).map(|h| &self.arena[h.0])
    }

    pub fn contains(&self, gvk: &GroupVersionKind) -> bool {
        self.by_gvk.contains_key(gvk)
    }

    /// Every version of a kind, in insertion order.
    pub fn all_versions(&self, kind: &str) -> Vec<&Definition> {
        self.by_kind
            .get(kind)
            .map(|handles| handles.iter().map(|h| &self.arena[h.0]).collect())
            .unwrap_or_default()
    }

    /// Every version of a kind, newest first.
    pub fn all_versions_sorted(&self, kind: &str, order: &dyn VersionOrdering) -> Vec<&Definition> {
        let mut versions = self.all_versions(kind);
        versions.sort_by(|a, b| {
            order
                .compare(b.version(), a.version())
                .then_with(|| a.group().cmp(b.group()))
        });
        versions
    }

    /// Kinds in first-seen order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.by_kind.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Derive the display flags once every definition and operation link is known.
    ///
    /// `linked` are the identities some operation acts on. A field referencing an
    /// unrecognized name aborts unless `allow_errors` is set, in which case it is
    /// reported and the field is ignored.
    pub(crate) fn settle(
        &mut self,
        linked: &HashSet<GroupVersionKind>,
        order: &dyn VersionOrdering,
        allow_errors: bool,
    ) -> Result<Vec<Diagnostic>, ResolveError> {
        let mut diagnostics = Vec::new();
        let mut in_fields: HashSet<GroupVersionKind> = HashSet::new();
        for definition in &self.arena {
            let extra = match &definition.schema.additional_properties {
                Some(AdditionalProperties::Schema(extra)) => Some(("additionalProperties", &**extra)),
                _ => None,
            };
            let fields = definition
                .schema
                .properties
                .iter()
                .map(|(name, schema)| (name.as_str(), schema))
                .chain(extra);
            for (field, schema) in fields {
                match collect_field_refs(schema, &mut in_fields) {
                    Ok(()) => {}
                    Err(e) if allow_errors => {
                        log::warn!("{}.{field}: {e}", definition.key());
                        diagnostics.push(Diagnostic::UnresolvedName {
                            reference: format!("{}.{field}", definition.key()),
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        let mut updates = Vec::with_capacity(self.arena.len());
        for handles in self.by_kind.values() {
            let groups: HashSet<&str> = handles.iter().map(|h| self.arena[h.0].group()).collect();
            let show_group = groups.len() > 1;
            for &handle in handles {
                let current = &self.arena[handle.0];
                let is_old_version = handles.iter().any(|other| {
                    let other = &self.arena[other.0];
                    other.group() == current.group()
                        && order.compare(other.version(), current.version()).is_gt()
                });
                updates.push((handle, show_group, is_old_version));
            }
        }

        for (handle, show_group, is_old_version) in updates {
            let definition = &mut self.arena[handle.0];
            definition.show_group = show_group;
            definition.is_old_version = is_old_version;
            definition.found_in_operation = linked.contains(&definition.gvk);
            definition.found_in_field = in_fields.contains(&definition.gvk);
            definition.is_inlined =
                definition.found_in_field && !definition.found_in_operation && !definition.in_toc;
        }
        Ok(diagnostics)
    }
}

/// Identities referenced by a property, looking through arrays and maps.
///
/// Only the field itself is inspected: the `properties` of an inline object field
/// are not walked, so a reference nested there does not count as a field use.
fn collect_field_refs(
    schema: &Schema,
    out: &mut HashSet<GroupVersionKind>,
) -> Result<(), ResolveError> {
    let gvk = name_resolver::resolve(schema)?;
    if !gvk.is_empty() {
        out.insert(gvk);
        return Ok(());
    }
    if let Some(AdditionalProperties::Schema(values)) = &schema.additional_properties {
        collect_field_refs(values, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::version::KubeVersionOrder;

    fn def(group: &str, version: &str, kind: &str) -> Definition {
        Definition::new(GroupVersionKind::new(group, version, kind), Schema::default())
    }

    #[test]
    fn test_put_reachable_by_both_keys() {
        let mut index = DefinitionIndex::new();
        index.put(def("apps", "v1", "Deployment"));
        let got = index.get("apps", "v1", "Deployment").unwrap();
        assert_eq!(got.key(), "apps.v1.Deployment");
        let versions = index.all_versions("Deployment");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].gvk, got.gvk);
    }

    #[test]
    fn test_put_same_identity_twice_does_not_duplicate() {
        let mut index = DefinitionIndex::new();
        let first = index.put(def("apps", "v1", "Deployment"));
        let mut replacement = def("apps", "v1", "Deployment");
        replacement.description = Some("replaced".to_string());
        let second = index.put(replacement);

        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
        assert_eq!(index.all_versions("Deployment").len(), 1);
        assert_eq!(
            index.get("apps", "v1", "Deployment").unwrap().description.as_deref(),
            Some("replaced")
        );
    }

    #[test]
    fn test_all_versions_sorted_newest_first() {
        let mut index = DefinitionIndex::new();
        index.put(def("apps", "v1beta1", "Deployment"));
        index.put(def("apps", "v1", "Deployment"));
        index.put(def("extensions", "v1beta1", "Deployment"));
        index.put(def("apps", "v1beta2", "Deployment"));

        let keys: Vec<String> = index
            .all_versions_sorted("Deployment", &KubeVersionOrder)
            .iter()
            .map(|d| d.key())
            .collect();
        assert_eq!(
            keys,
            vec![
                "apps.v1.Deployment",
                "apps.v1beta2.Deployment",
                "apps.v1beta1.Deployment",
                "extensions.v1beta1.Deployment",
            ]
        );
    }

    #[test]
    fn test_missing_kind_is_empty() {
        let index = DefinitionIndex::new();
        assert!(index.all_versions("Nope").is_empty());
        assert!(index.get("core", "v1", "Nope").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_settle_flags() {
        let mut index = DefinitionIndex::new();
        let mut pod = def("core", "v1", "Pod");
        pod.in_toc = true;
        pod.schema.properties.insert(
            "spec".to_string(),
            Schema::reference("io.k8s.api.core.v1.PodSpec"),
        );
        index.put(pod);
        index.put(def("core", "v1", "PodSpec"));
        index.put(def("apps", "v1", "Deployment"));
        index.put(def("apps", "v1beta1", "Deployment"));
        index.put(def("extensions", "v1beta1", "Deployment"));

        let linked: HashSet<_> = [GroupVersionKind::new("core", "v1", "Pod")].into();
        assert!(index.settle(&linked, &KubeVersionOrder, false).unwrap().is_empty());

        let pod = index.get("core", "v1", "Pod").unwrap();
        assert!(pod.found_in_operation);
        assert!(!pod.is_inlined);
        assert!(!pod.show_group);

        let spec = index.get("core", "v1", "PodSpec").unwrap();
        assert!(spec.found_in_field);
        assert!(spec.is_inlined);

        let old = index.get("apps", "v1beta1", "Deployment").unwrap();
        assert!(old.is_old_version);
        assert!(old.show_group);
        assert!(!index.get("apps", "v1", "Deployment").unwrap().is_old_version);
        // only version in its own group
        assert!(
            !index
                .get("extensions", "v1beta1", "Deployment")
                .unwrap()
                .is_old_version
        );
    }

    #[test]
    fn test_settle_rejects_unrecognized_field_reference() {
        let mut outer = def("core", "v1", "Outer");
        outer
            .schema
            .properties
            .insert("w".to_string(), Schema::reference("com.example.Widget"));
        let mut index = DefinitionIndex::new();
        index.put(outer);

        let err = index
            .clone()
            .settle(&HashSet::new(), &KubeVersionOrder, false)
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnrecognizedName(ref n) if n == "com.example.Widget"));

        let diagnostics = index.settle(&HashSet::new(), &KubeVersionOrder, true).unwrap();
        assert!(matches!(
            &diagnostics[..],
            [Diagnostic::UnresolvedName { reference, .. }] if reference == "core.v1.Outer.w"
        ));
    }

    #[test]
    fn test_nested_inline_properties_are_not_walked() {
        let mut inline = Schema::default();
        inline.properties.insert(
            "spec".to_string(),
            Schema::reference("io.k8s.api.core.v1.PodSpec"),
        );
        let mut holder = def("core", "v1", "Holder");
        holder.schema.properties.insert("inline".to_string(), inline);

        let mut index = DefinitionIndex::new();
        index.put(holder);
        index.put(def("core", "v1", "PodSpec"));
        index.settle(&HashSet::new(), &KubeVersionOrder, false).unwrap();

        assert!(!index.get("core", "v1", "PodSpec").unwrap().found_in_field);
    }
}
