use std::collections::HashSet;

use crate::error::{BuildError, ResolveError};
use crate::index::{
    CategoryTable, DefinitionIndex, FriendlyOperationNames, OperationStore, VersionOrder, classify,
    name_resolver,
};
use crate::model::{Diagnostic, GroupVersionKind, Operation, OperationCategory};
use crate::parse::spec::SwaggerSpec;

/// Options controlling one documentation build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub allow_errors: bool,
    pub munge_groups: bool,
    pub version_order: VersionOrder,
    pub categories: CategoryTable,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            allow_errors: false,
            munge_groups: true,
            version_order: VersionOrder::default(),
            categories: CategoryTable::default(),
        }
    }
}

/// The documentation model: indexed definitions, operations, and their categories.
#[derive(Debug, Clone)]
pub struct DocModel {
    pub definitions: DefinitionIndex,
    pub operations: OperationStore,
    pub categories: Vec<OperationCategory>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts for the build report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub definitions: usize,
    pub operations: usize,
    pub classified: usize,
    pub unclassified: usize,
    pub unmatched: usize,
}

impl DocModel {
    /// Ids of operations with no friendly name.
    pub fn unclassified(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::Unclassified { operation_id } => Some(operation_id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `(operation id, friendly name)` pairs whose name matches no slot.
    pub fn unmatched(&self) -> Vec<(&str, &str)> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::UnmatchedFriendlyName {
                    operation_id,
                    friendly_name,
                } => Some((operation_id.as_str(), friendly_name.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Operations in one slot, in classification order.
    pub fn slot_operations(&self, category: &str, slot: &str) -> Vec<&Operation> {
        self.categories
            .iter()
            .filter(|c| c.name == category)
            .flat_map(|c| c.friendly_names.iter().filter(|f| f.name == slot))
            .flat_map(|f| f.operations.iter())
            .filter_map(|&h| self.operations.get_index(h))
            .collect()
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            definitions: self.definitions.len(),
            operations: self.operations.len(),
            classified: self.operations.iter().filter(|o| o.is_classified()).count(),
            unclassified: self.unclassified().len(),
            unmatched: self.unmatched().len(),
        }
    }
}

/// Run the whole pipeline: index definitions, collect operations, link them,
/// settle definition flags, and classify.
///
/// Empty input yields an empty model. Only naming errors (without `allow_errors`)
/// abort; every other problem is returned in `DocModel::diagnostics`.
pub fn build(
    specs: &[SwaggerSpec],
    friendly_names: &FriendlyOperationNames,
    options: &BuildOptions,
) -> Result<DocModel, BuildError> {
    // Phase 1: Index definitions
    let (mut definitions, mut diagnostics) = DefinitionIndex::build(specs, options.allow_errors)?;

    // Phase 2: Collect operations
    let (mut operations, op_diagnostics) = OperationStore::build(specs);
    diagnostics.extend(op_diagnostics);

    // Phase 3: Link operations to definitions
    let linked = link_operations(&mut operations, &definitions, options, &mut diagnostics)?;

    // Phase 4: Settle definition flags
    let settle_diagnostics = definitions.settle(
        &linked,
        options.version_order.ordering(),
        options.allow_errors,
    )?;
    diagnostics.extend(settle_diagnostics);

    // Phase 5: Classify
    let classification = classify(&mut operations, &options.categories, friendly_names);
    diagnostics.extend(classification.diagnostics);

    log::debug!(
        "built model: {} definitions, {} operations, {} diagnostics",
        definitions.len(),
        operations.len(),
        diagnostics.len()
    );

    Ok(DocModel {
        definitions,
        operations,
        categories: classification.categories,
        diagnostics,
    })
}

fn link_operations(
    operations: &mut OperationStore,
    definitions: &DefinitionIndex,
    options: &BuildOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<HashSet<GroupVersionKind>, BuildError> {
    let mut linked = HashSet::new();
    for handle in 0..operations.len() {
        let Some(operation) = operations.get_index_mut(handle) else {
            continue;
        };
        let target = match operation_target(operation, definitions, options.munge_groups) {
            Ok(target) => target,
            Err(e) if options.allow_errors => {
                log::warn!("{}: {e}", operation.id);
                diagnostics.push(Diagnostic::UnresolvedName {
                    reference: operation.id.clone(),
                    reason: e.to_string(),
                });
                None
            }
            Err(e) => return Err(e.into()),
        };
        if let Some(gvk) = &target {
            linked.insert(gvk.clone());
        }
        operation.definition = target;
    }
    Ok(linked)
}

/// The indexed definition an operation acts on: its GVK extension first, then its
/// request body, then its response body.
fn operation_target(
    operation: &Operation,
    definitions: &DefinitionIndex,
    munge_groups: bool,
) -> Result<Option<GroupVersionKind>, ResolveError> {
    if let Some(ext) = &operation.extension_gvk {
        let gvk = GroupVersionKind::new(
            normalize_group(&ext.group, munge_groups),
            ext.version.clone(),
            ext.kind.clone(),
        );
        if definitions.contains(&gvk) {
            return Ok(Some(gvk));
        }
    }
    for schema in [&operation.request_schema, &operation.response_schema]
        .into_iter()
        .flatten()
    {
        let gvk = name_resolver::resolve(schema)?;
        if !gvk.is_empty() && definitions.contains(&gvk) {
            return Ok(Some(gvk));
        }
    }
    Ok(None)
}

/// Map an extension group onto the definition naming: the empty group is `core`,
/// and with munging `rbac.authorization.k8s.io` becomes `rbac`.
fn normalize_group(group: &str, munge_groups: bool) -> String {
    if group.is_empty() {
        return "core".to_string();
    }
    if munge_groups {
        return group.split('.').next().unwrap_or(group).to_string();
    }
    group.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_group() {
        assert_eq!(normalize_group("", true), "core");
        assert_eq!(normalize_group("", false), "core");
        assert_eq!(normalize_group("apps", true), "apps");
        assert_eq!(normalize_group("rbac.authorization.k8s.io", true), "rbac");
        assert_eq!(
            normalize_group("rbac.authorization.k8s.io", false),
            "rbac.authorization.k8s.io"
        );
    }

    #[test]
    fn test_empty_input_builds_empty_model() {
        let model = build(&[], &FriendlyOperationNames::new(), &BuildOptions::default()).unwrap();
        assert!(model.definitions.is_empty());
        assert!(model.operations.is_empty());
        assert!(model.diagnostics.is_empty());
        assert_eq!(model.categories.len(), 5);
        assert_eq!(
            model.summary(),
            BuildSummary {
                definitions: 0,
                operations: 0,
                classified: 0,
                unclassified: 0,
                unmatched: 0,
            }
        );
    }
}
