use refdocs_core::index::name_resolver::{resolve, resolve_reference};
use refdocs_core::index::{
    CategoryTable, DefinitionIndex, FriendlyOperationNames, OperationStore, classify,
};
use refdocs_core::model::{Definition, Diagnostic, GroupVersionKind, HttpMethod, Operation};
use refdocs_core::parse::schema::{Schema, SchemaType};

#[test]
fn resolves_core_pod() {
    assert_eq!(
        resolve_reference("io.k8s.api.core.v1.Pod").unwrap(),
        GroupVersionKind::new("core", "v1", "Pod")
    );
}

#[test]
fn resolves_quantity_by_three_segment_api_rule() {
    assert_eq!(
        resolve_reference("io.k8s.apimachinery.pkg.api.resource.Quantity").unwrap(),
        GroupVersionKind::new("core", "resource", "Quantity")
    );
}

#[test]
fn skips_int_or_string() {
    assert_eq!(
        resolve_reference("io.k8s.apimachinery.pkg.util.intstr.IntOrString").unwrap(),
        GroupVersionKind::empty()
    );
}

#[test]
fn array_resolves_as_its_items() {
    for name in [
        "io.k8s.api.core.v1.Pod",
        "io.k8s.api.batch.v1.Job",
        "io.k8s.apimachinery.pkg.runtime.RawExtension",
    ] {
        let item = Schema::reference(name);
        let array = Schema {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(item.clone())),
            ..Default::default()
        };
        assert_eq!(resolve(&array).unwrap(), resolve(&item).unwrap());
    }
}

#[test]
fn primitives_resolve_empty() {
    for t in [
        SchemaType::String,
        SchemaType::Integer,
        SchemaType::Number,
        SchemaType::Boolean,
        SchemaType::Object,
    ] {
        let s = Schema {
            schema_type: Some(t),
            ..Default::default()
        };
        assert!(resolve(&s).unwrap().is_empty());
    }
}

#[test]
fn put_then_get_by_both_keys() {
    let mut index = DefinitionIndex::new();
    let gvks = [
        GroupVersionKind::new("core", "v1", "Pod"),
        GroupVersionKind::new("batch", "v1", "Job"),
        GroupVersionKind::new("batch", "v1beta1", "Job"),
    ];
    for gvk in &gvks {
        index.put(Definition::new(gvk.clone(), Schema::default()));
    }
    for gvk in &gvks {
        let d = index.get(&gvk.group, &gvk.version, &gvk.kind).unwrap();
        assert_eq!(&d.gvk, gvk);
        assert!(index.all_versions(&gvk.kind).iter().any(|v| &v.gvk == gvk));
    }
    assert_eq!(index.all_versions("Job").len(), 2);
}

#[test]
fn put_is_idempotent_per_identity() {
    let mut index = DefinitionIndex::new();
    let gvk = GroupVersionKind::new("batch", "v1", "Job");
    index.put(Definition::new(gvk.clone(), Schema::default()));
    let before = index.all_versions("Job").len();
    index.put(Definition::new(gvk, Schema::default()));
    assert_eq!(index.all_versions("Job").len(), before);
}

#[test]
fn create_pod_is_classified() {
    let mut store = OperationStore::new();
    store.insert(Operation::new("createPod", HttpMethod::Post, "/api/v1/pods"));
    let mut names = FriendlyOperationNames::new();
    names.insert("createPod".to_string(), "Create".to_string());

    let result = classify(&mut store, &CategoryTable::default(), &names);

    let write = &result.categories[0];
    assert_eq!(write.name, "Write Operations");
    let create = write
        .friendly_names
        .iter()
        .find(|f| f.name == "Create")
        .unwrap();
    assert_eq!(create.operations.len(), 1);
    let op = store.get_index(create.operations[0]).unwrap();
    assert_eq!(op.id, "createPod");
    assert_eq!(op.friendly_name, "Create");
}

#[test]
fn weird_op_is_unclassified() {
    let mut store = OperationStore::new();
    store.insert(Operation::new("weirdOp", HttpMethod::Get, "/weird"));

    let result = classify(
        &mut store,
        &CategoryTable::default(),
        &FriendlyOperationNames::new(),
    );

    assert!(result.diagnostics.contains(&Diagnostic::Unclassified {
        operation_id: "weirdOp".to_string()
    }));
    assert!(
        result
            .categories
            .iter()
            .flat_map(|c| &c.friendly_names)
            .all(|f| f.operations.is_empty())
    );
}
