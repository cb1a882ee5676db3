//! Tests for the flowchart (Dialect A) parser.
mod common;
use common::{branching_flowchart, edge_labels, edge_targets};
use keiro::error::{FlowError, FlowParseError};
use keiro::prelude::*;

#[test]
fn test_parse_basic_flow() {
    let flow = parse_flowchart(branching_flowchart()).unwrap();

    assert_eq!(flow.begin_id, "A");
    assert_eq!(flow.end_id, "D");
    assert_eq!(flow.nodes["A"].kind, FlowNodeKind::Begin);
    assert_eq!(flow.nodes["B"].kind, FlowNodeKind::Task);
    assert_eq!(flow.nodes["C"].kind, FlowNodeKind::Decision);
    assert_eq!(flow.nodes["D"].kind, FlowNodeKind::End);
    assert_eq!(edge_labels(&flow, "C"), vec![Some("yes"), Some("no")]);
    assert_eq!(edge_targets(&flow, "C"), vec!["D", "B"]);
}

#[test]
fn test_implicit_nodes_reuse_id_as_label() {
    let flow = parse_flowchart("flowchart TD\nBEGIN --> TASK\nTASK --> END").unwrap();

    assert_eq!(flow.begin_id, "BEGIN");
    assert_eq!(flow.end_id, "END");
    assert_eq!(flow.nodes["TASK"].label, NodeLabel::text("TASK"));
    assert_eq!(flow.nodes["TASK"].kind, FlowNodeKind::Task);
}

#[test]
fn test_quoted_label_keeps_embedded_pipe() {
    let flow = parse_flowchart(
        "flowchart TD\n\
         A([\"BEGIN\"]) --> B[\"hello | world\"]\n\
         B --> C([END])",
    )
    .unwrap();

    assert_eq!(flow.nodes["B"].label, NodeLabel::text("hello | world"));
}

#[test]
fn test_quoted_label_backslash_escapes() {
    let flow = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B[\"say \\\"hi\\\"\"]\n\
         B --> C([END])",
    )
    .unwrap();

    assert_eq!(flow.nodes["B"].label, NodeLabel::text("say \"hi\""));
}

#[test]
fn test_dash_run_edge_label_spelling() {
    let flow = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> C{Q}\n\
         C --yes--> D([END])\n\
         C --no--> B[retry]\n\
         B --> C",
    )
    .unwrap();

    assert_eq!(edge_labels(&flow, "C"), vec![Some("yes"), Some("no")]);
}

#[test]
fn test_label_text_overrides_shape_kind() {
    // A curly (decision-shaped) node labeled BEGIN is still the begin node.
    let flow = parse_flowchart(
        "flowchart TD\n\
         S{BEGIN} --> T[work]\n\
         T --> E(end)",
    )
    .unwrap();

    assert_eq!(flow.nodes["S"].kind, FlowNodeKind::Begin);
    assert_eq!(flow.nodes["E"].kind, FlowNodeKind::End);
}

#[test]
fn test_comments_header_and_blank_lines_skipped() {
    let flow = parse_flowchart(
        "%% a comment\n\
         graph LR\n\
         \n\
         BEGIN --> END\n\
         %% trailing comment",
    )
    .unwrap();

    assert_eq!(flow.nodes.len(), 2);
}

#[test]
fn test_explicit_label_upgrades_implicit_mention() {
    let flow = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B\n\
         B[Fetch page] --> C([END])",
    )
    .unwrap();

    assert_eq!(flow.nodes["B"].label, NodeLabel::text("Fetch page"));
}

#[test]
fn test_conflicting_explicit_labels_fail() {
    let err = parse_flowchart(
        "flowchart TD\n\
         A([BEGIN]) --> B[First]\n\
         B[Second] --> C([END])",
    )
    .unwrap_err();

    match err {
        FlowError::Parse(FlowParseError::ConflictingNode { line, node_id }) => {
            assert_eq!(line, 3);
            assert_eq!(node_id, "B");
        }
        other => panic!("expected conflicting node error, got {other:?}"),
    }
}

#[test]
fn test_trailing_content_is_rejected() {
    let err = parse_flowchart("flowchart TD\nA[x] stray\nA --> B").unwrap_err();
    assert_eq!(
        err,
        FlowError::Parse(FlowParseError::TrailingContent { line: 2 })
    );
}

#[test]
fn test_unclosed_node_label() {
    let err = parse_flowchart("flowchart TD\nA[oops --> B").unwrap_err();
    assert_eq!(
        err,
        FlowError::Parse(FlowParseError::UnclosedNodeLabel { line: 2 })
    );
}

#[test]
fn test_empty_node_label() {
    let err = parse_flowchart("flowchart TD\nA[] --> B").unwrap_err();
    assert_eq!(
        err,
        FlowError::Parse(FlowParseError::EmptyNodeLabel { line: 2 })
    );
}

#[test]
fn test_empty_pipe_edge_label() {
    let err = parse_flowchart("flowchart TD\nA([BEGIN]) -->|  | B([END])").unwrap_err();
    assert_eq!(
        err,
        FlowError::Parse(FlowParseError::EmptyEdgeLabel { line: 2 })
    );
}

#[test]
fn test_dash_run_without_closing_arrow() {
    // The node label contains the only `-->`, so the dash-run label that
    // follows never finds its closing arrow.
    let err = parse_flowchart("flowchart TD\nX[a-->b] --c-- Y").unwrap_err();
    assert_eq!(
        err,
        FlowError::Parse(FlowParseError::UnterminatedEdgeLabel { line: 2 })
    );
}

#[test]
fn test_arrow_requires_surrounding_whitespace() {
    // Identifiers may contain dashes, so `A-->` scans as the id `A--` with
    // no arrow left to find.
    let err = parse_flowchart("flowchart TD\nA--> B").unwrap_err();
    assert_eq!(
        err,
        FlowError::Parse(FlowParseError::ExpectedArrow { line: 2 })
    );
}

#[test]
fn test_parse_error_reports_line_number() {
    let err = parse_flowchart("flowchart TD\nA([BEGIN]) --> B[ok]\nB[] --> C").unwrap_err();
    match err {
        FlowError::Parse(parse_err) => {
            assert_eq!(parse_err.line(), 3);
            assert!(parse_err.to_string().starts_with("Line 3:"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}
