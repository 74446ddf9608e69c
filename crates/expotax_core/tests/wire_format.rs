use expotax_core::{Node, NodeDraft, RemoteNode};
use serde_json::json;

#[test]
fn remote_node_deserializes_camel_case_payload() {
    let payload = json!({
        "code": "L1",
        "name": "IA",
        "parentCode": null,
        "createdAt": "2024-03-01T10:00:00Z"
    });

    let node: RemoteNode = serde_json::from_value(payload).expect("payload should parse");
    assert_eq!(node.code, "L1");
    assert_eq!(node.parent_code, None);
    assert_eq!(node.created_at.as_deref(), Some("2024-03-01T10:00:00Z"));
}

#[test]
fn remote_node_tolerates_missing_optional_fields() {
    let payload = json!({ "code": "S1", "name": "Deep Learning", "parentCode": "L1" });
    let node: RemoteNode = serde_json::from_value(payload).expect("payload should parse");
    assert_eq!(node.parent_code.as_deref(), Some("L1"));
    assert_eq!(node.created_at, None);

    let bare = json!({ "code": "L1", "name": "IA" });
    let node: RemoteNode = serde_json::from_value(bare).expect("bare payload should parse");
    assert_eq!(node.parent_code, None);
}

#[test]
fn draft_serializes_camel_case_and_omits_absent_parent() {
    let root_draft = NodeDraft::new("IA", None);
    let value = serde_json::to_value(&root_draft).expect("serialize");
    assert_eq!(value, json!({ "name": "IA" }));

    let child_draft = NodeDraft::new("Deep Learning", Some("L1".to_string()));
    let value = serde_json::to_value(&child_draft).expect("serialize");
    assert_eq!(value, json!({ "name": "Deep Learning", "parentCode": "L1" }));
}

#[test]
fn node_round_trips_with_level_tag() {
    let node = RemoteNode {
        code: "A1".to_string(),
        name: "Redes Neuronales".to_string(),
        parent_code: Some("S1".to_string()),
        created_at: None,
    }
    .into_node(2);
    assert_eq!(node.level, 2);

    let value = serde_json::to_value(&node).expect("serialize");
    assert_eq!(value["parentCode"], json!("S1"));

    let back: Node = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, node);
}
