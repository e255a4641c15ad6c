use refdocs_core::parse;
use refdocs_core::parse::parameter::{ParameterLocation, ParameterOrRef};
use refdocs_core::parse::schema::SchemaType;

const K8S_MINI: &str = include_str!("fixtures/k8s-mini.json");

#[test]
fn parse_k8s_mini_json() {
    let spec = parse::from_json(K8S_MINI).expect("should parse k8s-mini.json");
    assert_eq!(spec.swagger, "2.0");
    assert_eq!(spec.info.title, "Kubernetes");
    assert_eq!(spec.paths.len(), 8);
    assert_eq!(spec.definitions.len(), 12);
    assert_eq!(spec.parameters.len(), 1);

    let pods = spec
        .paths
        .get("/api/v1/namespaces/{namespace}/pods")
        .expect("should have pods path");
    assert!(matches!(pods.parameters[0], ParameterOrRef::Ref { .. }));
    let post = pods.post.as_ref().expect("should have POST");
    assert_eq!(post.operation_id.as_deref(), Some("createCoreV1NamespacedPod"));
    assert!(post.extensions.contains_key("x-kubernetes-group-version-kind"));
    assert!(post.extensions.contains_key("x-kubernetes-action"));

    let shared = spec.resolve_parameter(&pods.parameters[0]).unwrap();
    assert_eq!(shared.name, "namespace");
    assert_eq!(shared.location, ParameterLocation::Path);
}

#[test]
fn parse_definition_schemas() {
    let spec = parse::from_json(K8S_MINI).unwrap();

    let pod_list = spec.definitions.get("io.k8s.api.core.v1.PodList").unwrap();
    let items = pod_list.properties.get("items").unwrap();
    assert!(items.is_array());
    assert_eq!(
        items.items.as_ref().and_then(|i| i.ref_path.as_deref()),
        Some("#/definitions/io.k8s.api.core.v1.Pod")
    );

    let quantity = spec
        .definitions
        .get("io.k8s.apimachinery.pkg.api.resource.Quantity")
        .unwrap();
    assert_eq!(quantity.schema_type, Some(SchemaType::String));
    assert!(!quantity.is_definition());
}

#[test]
fn parse_yaml_spec() {
    let yaml = r##"
swagger: "2.0"
info:
  title: Test
  version: v1
definitions:
  io.k8s.api.core.v1.Node:
    description: Node is a worker node.
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    assert!(spec.paths.is_empty());
    assert_eq!(spec.definitions.len(), 1);
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
swagger: "3.0.0"
info:
  title: Test
  version: "1.0"
"#;
    let result = parse::from_yaml(yaml);
    assert!(matches!(
        result,
        Err(refdocs_core::error::ParseError::UnsupportedVersion(ref v)) if v == "3.0.0"
    ));
}

#[test]
fn parse_malformed_json() {
    assert!(matches!(
        parse::from_json("{ not json"),
        Err(refdocs_core::error::ParseError::Json(_))
    ));
}
