//! Tests for the structural validator, through the parsers and directly.
mod common;
use keiro::error::{FlowError, FlowValidationError};
use keiro::prelude::*;

fn expect_validation(err: FlowError) -> FlowValidationError {
    match err {
        FlowError::Validation(validation) => validation,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_reachable_decision_requires_edge_labels() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B{Pick}\n\
         B --> C([END])",
    )
    .unwrap_err();

    assert_eq!(
        expect_validation(err),
        FlowValidationError::UnlabeledDecisionEdge("B".to_string())
    );
}

#[test]
fn test_duplicate_decision_labels_fail() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> C{Pick}\n\
         C -->|yes| D([END])\n\
         C -->|yes| B[alt]\n\
         B --> D",
    )
    .unwrap_err();

    assert_eq!(
        expect_validation(err),
        FlowValidationError::DuplicateDecisionLabels {
            node_id: "C".to_string(),
            label: "yes".to_string(),
        }
    );
}

#[test]
fn test_two_begin_nodes_fail() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> X[do]\n\
         B([BEGIN]) --> X\n\
         X --> E([END])",
    )
    .unwrap_err();

    assert_eq!(expect_validation(err), FlowValidationError::BeginCount(2));
}

#[test]
fn test_missing_end_node_fails() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B[work]\n\
         B --> C[more]\n\
         C --> B",
    )
    .unwrap_err();

    assert_eq!(expect_validation(err), FlowValidationError::EndCount(0));
}

#[test]
fn test_begin_must_have_exactly_one_edge() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B[x]\n\
         A --> C[y]\n\
         B --> D([END])\n\
         C --> D",
    )
    .unwrap_err();

    assert_eq!(expect_validation(err), FlowValidationError::BeginArity);
}

#[test]
fn test_end_must_have_no_edges() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B([END])\n\
         B --> C[t]\n\
         C --> B",
    )
    .unwrap_err();

    assert_eq!(expect_validation(err), FlowValidationError::EndHasEdges);
}

#[test]
fn test_task_must_have_exactly_one_edge() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B[fork]\n\
         B --> C([END])\n\
         B --> D[x]\n\
         D --> C",
    )
    .unwrap_err();

    assert_eq!(
        expect_validation(err),
        FlowValidationError::TaskArity("B".to_string())
    );
}

#[test]
fn test_reachable_decision_needs_edges() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> C{Pick}\n\
         X[side] --> E([END])",
    )
    .unwrap_err();

    assert_eq!(
        expect_validation(err),
        FlowValidationError::DecisionWithoutEdges("C".to_string())
    );
}

#[test]
fn test_end_must_be_reachable() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B[loop]\n\
         B --> B\n\
         C[stub] --> D([END])",
    )
    .unwrap_err();

    assert_eq!(expect_validation(err), FlowValidationError::EndUnreachable);
}

#[test]
fn test_unreachable_nodes_are_exempt_from_arity_rules() {
    // `X` is a task with no outgoing edges, but nothing reaches it.
    let flow = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B([END])\n\
         X[dead code]",
    )
    .unwrap();

    assert!(flow.nodes.contains_key("X"));
    assert!(flow.edges_from("X").is_empty());
}

#[test]
fn test_validator_rejects_whitespace_decision_label() {
    // Direct use of the validator: the parsers reject whitespace edge
    // labels earlier, but the contract holds for hand-built flows too.
    let mut nodes = AHashMap::new();
    nodes.insert("a".to_string(), FlowNode::new("a", "BEGIN", FlowNodeKind::Begin));
    nodes.insert("d".to_string(), FlowNode::new("d", "Pick", FlowNodeKind::Decision));
    nodes.insert("z".to_string(), FlowNode::new("z", "END", FlowNodeKind::End));

    let mut outgoing = AHashMap::new();
    outgoing.insert(
        "a".to_string(),
        vec![FlowEdge::new("a", "d", None)],
    );
    outgoing.insert(
        "d".to_string(),
        vec![FlowEdge::new("d", "z", Some("  ".to_string()))],
    );
    outgoing.insert("z".to_string(), vec![]);

    assert_eq!(
        validate_flow(&nodes, &outgoing),
        Err(FlowValidationError::UnlabeledDecisionEdge("d".to_string()))
    );
}

#[test]
fn test_validator_returns_begin_and_end_ids() {
    let mut nodes = AHashMap::new();
    nodes.insert("a".to_string(), FlowNode::new("a", "BEGIN", FlowNodeKind::Begin));
    nodes.insert("b".to_string(), FlowNode::new("b", "step", FlowNodeKind::Task));
    nodes.insert("z".to_string(), FlowNode::new("z", "END", FlowNodeKind::End));

    let mut outgoing = AHashMap::new();
    outgoing.insert("a".to_string(), vec![FlowEdge::new("a", "b", None)]);
    outgoing.insert("b".to_string(), vec![FlowEdge::new("b", "z", None)]);
    outgoing.insert("z".to_string(), vec![]);

    assert_eq!(
        validate_flow(&nodes, &outgoing),
        Ok(("a".to_string(), "z".to_string()))
    );
}

#[test]
fn test_nested_dialect_shares_the_validator() {
    let err = parse_nested(
        "a: \"BEGIN\"\n\
         a -> b\n\
         b -> c: go\n\
         b -> c: go\n\
         c: \"END\"",
    )
    .unwrap_err();

    assert_eq!(
        expect_validation(err),
        FlowValidationError::DuplicateDecisionLabels {
            node_id: "b".to_string(),
            label: "go".to_string(),
        }
    );
}
