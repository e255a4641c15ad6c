use std::collections::BTreeSet;

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::name_resolver::extension_gvk;
use crate::model::{Diagnostic, HttpMethod, Operation};
use crate::parse::operation::{Operation as SpecOperation, PathItem};
use crate::parse::parameter::ParameterLocation;
use crate::parse::spec::SwaggerSpec;

/// Operation friendly names keyed by operation id.
pub type FriendlyOperationNames = IndexMap<String, String>;

/// Operations keyed by operation id. Handles are stable insertion indices.
#[derive(Debug, Clone, Default)]
pub struct OperationStore {
    operations: IndexMap<String, Operation>,
}

/// Call `visitor` once for every path × method entry of every spec.
///
/// Entries without an `operationId` cannot be keyed and are skipped.
pub fn visit_operations<F>(specs: &[SwaggerSpec], mut visitor: F)
where
    F: FnMut(Operation),
{
    for spec in specs {
        for (path, item) in &spec.paths {
            for (method, op) in methods(item) {
                match build_operation(spec, item, path, method, op) {
                    Some(operation) => visitor(operation),
                    None => log::warn!("{} {} has no operationId, skipping", method.as_str(), path),
                }
            }
        }
    }
}

/// Ids of operations with no entry in `names`, sorted and deduplicated.
pub fn missing_friendly_names(specs: &[SwaggerSpec], names: &FriendlyOperationNames) -> Vec<String> {
    let mut missing = BTreeSet::new();
    visit_operations(specs, |operation| {
        if !names.contains_key(&operation.id) {
            missing.insert(operation.id);
        }
    });
    missing.into_iter().collect()
}

impl OperationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every operation in the specs.
    ///
    /// Specs are expected, not guaranteed, to use unique ids. On a collision the
    /// later entry replaces the earlier one at the same handle and the collision
    /// is reported.
    pub fn build(specs: &[SwaggerSpec]) -> (Self, Vec<Diagnostic>) {
        let mut store = Self::new();
        let mut diagnostics = Vec::new();
        visit_operations(specs, |operation| {
            let id = operation.id.clone();
            if store.insert(operation).is_some() {
                log::warn!("duplicate operation id {id}");
                diagnostics.push(Diagnostic::DuplicateOperationId { operation_id: id });
            }
        });
        log::debug!("collected {} operations", store.len());
        (store, diagnostics)
    }

    /// Insert or replace, returning the replaced operation.
    pub fn insert(&mut self, operation: Operation) -> Option<Operation> {
        match self.operations.entry(operation.id.clone()) {
            Entry::Occupied(mut slot) => Some(slot.insert(operation)),
            Entry::Vacant(slot) => {
                slot.insert(operation);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn handle_of(&self, id: &str) -> Option<usize> {
        self.operations.get_index_of(id)
    }

    pub fn get_index(&self, handle: usize) -> Option<&Operation> {
        self.operations.get_index(handle).map(|(_, op)| op)
    }

    pub(crate) fn get_index_mut(&mut self, handle: usize) -> Option<&mut Operation> {
        self.operations.get_index_mut(handle).map(|(_, op)| op)
    }

    /// Handles ordered by operation id, for reproducible iteration.
    pub fn sorted_handles(&self) -> Vec<usize> {
        let mut keyed: Vec<(&String, usize)> = self
            .operations
            .keys()
            .enumerate()
            .map(|(handle, id)| (id, handle))
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, handle)| handle).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

fn methods(item: &PathItem) -> impl Iterator<Item = (HttpMethod, &SpecOperation)> {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
        (HttpMethod::Options, item.options.as_ref()),
        (HttpMethod::Head, item.head.as_ref()),
        (HttpMethod::Patch, item.patch.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.map(|op| (method, op)))
}

fn build_operation(
    spec: &SwaggerSpec,
    item: &PathItem,
    path: &str,
    method: HttpMethod,
    op: &SpecOperation,
) -> Option<Operation> {
    let id = op.operation_id.as_deref()?;
    let mut operation = Operation::new(id, method, path);
    operation.description = op.description.clone().or_else(|| op.summary.clone());
    operation.tags = op.tags.clone();
    operation.extension_gvk = extension_gvk(&op.extensions);

    // Operation-level parameters override path-level ones; only the body matters here.
    operation.request_schema = op
        .parameters
        .iter()
        .chain(item.parameters.iter())
        .filter_map(|p| spec.resolve_parameter(p))
        .find(|p| p.location == ParameterLocation::Body)
        .and_then(|p| p.schema.clone());

    operation.response_schema = ["200", "201"]
        .iter()
        .filter_map(|code| op.responses.get(*code))
        .find_map(|r| r.schema.clone());

    Some(operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SPEC: &str = r##"
swagger: "2.0"
info:
  title: Test
  version: v1
parameters:
  body-pod:
    name: body
    in: body
    required: true
    schema:
      $ref: "#/definitions/io.k8s.api.core.v1.Pod"
paths:
  /api/v1/namespaces/{namespace}/pods:
    get:
      operationId: listNamespacedPod
      responses:
        "200":
          description: OK
          schema:
            $ref: "#/definitions/io.k8s.api.core.v1.PodList"
    post:
      operationId: createNamespacedPod
      parameters:
        - $ref: "#/parameters/body-pod"
      responses:
        "201":
          description: Created
          schema:
            $ref: "#/definitions/io.k8s.api.core.v1.Pod"
  /api/v1/pods:
    get:
      operationId: listNamespacedPod
    delete:
      description: no id here
"##;

    #[test]
    fn test_build_and_collision() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let (store, diagnostics) = OperationStore::build(&[spec]);

        assert_eq!(store.len(), 2);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::DuplicateOperationId {
                operation_id: "listNamespacedPod".to_string()
            }]
        );
        // later entry wins but keeps the first handle
        let list = store.get("listNamespacedPod").unwrap();
        assert_eq!(list.path, "/api/v1/pods");
        assert_eq!(store.handle_of("listNamespacedPod"), Some(0));
    }

    #[test]
    fn test_body_parameter_through_ref() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let (store, _) = OperationStore::build(&[spec]);
        let create = store.get("createNamespacedPod").unwrap();
        assert_eq!(create.http_method, HttpMethod::Post);
        assert_eq!(
            create
                .request_schema
                .as_ref()
                .and_then(|s| s.ref_path.as_deref()),
            Some("#/definitions/io.k8s.api.core.v1.Pod")
        );
        assert!(create.response_schema.is_some());
        assert!(!create.is_classified());
    }

    #[test]
    fn test_sorted_handles() {
        let mut store = OperationStore::new();
        for id in ["watchPod", "createPod", "readPod"] {
            store.insert(Operation::new(id, HttpMethod::Get, "/"));
        }
        let ids: Vec<&str> = store
            .sorted_handles()
            .into_iter()
            .map(|h| store.get_index(h).unwrap().id.as_str())
            .collect();
        assert_eq!(ids, vec!["createPod", "readPod", "watchPod"]);
    }

    #[test]
    fn test_missing_friendly_names() {
        let spec = parse::from_yaml(SPEC).unwrap();
        let mut names = FriendlyOperationNames::new();
        names.insert("createNamespacedPod".to_string(), "Create".to_string());
        assert_eq!(
            missing_friendly_names(&[spec], &names),
            vec!["listNamespacedPod".to_string()]
        );
    }

    #[test]
    fn test_empty_input() {
        let (store, diagnostics) = OperationStore::build(&[]);
        assert!(store.is_empty());
        assert!(diagnostics.is_empty());
    }
}
