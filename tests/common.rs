//! Common test utilities for building flow sources and inspecting flows.
use keiro::prelude::*;

/// A small valid flowchart with one decision loop.
///
/// `A(begin) -> B(task) -> C(decision) -> {yes: D(end), no: B}`
#[allow(dead_code)]
pub fn branching_flowchart() -> &'static str {
    "flowchart TD\n\
     A([BEGIN]) --> B[Search stdrc]\n\
     B --> C{Enough?}\n\
     C -->|yes| D([END])\n\
     C -->|no| B"
}

/// The same logical flow as [`branching_flowchart`], in the nested dialect.
#[allow(dead_code)]
pub fn branching_nested() -> &'static str {
    "A: \"BEGIN\"\n\
     A -> B\n\
     B: \"Search stdrc\"\n\
     B -> C\n\
     C: \"Enough?\"\n\
     C -> D: yes\n\
     C -> B: no\n\
     D: \"END\""
}

/// Labels of a node's outgoing edges, in source order.
#[allow(dead_code)]
pub fn edge_labels<'a>(flow: &'a PromptFlow, id: &str) -> Vec<Option<&'a str>> {
    flow.edges_from(id)
        .iter()
        .map(|edge| edge.label.as_deref())
        .collect()
}

/// Destinations of a node's outgoing edges, in source order.
#[allow(dead_code)]
pub fn edge_targets<'a>(flow: &'a PromptFlow, id: &str) -> Vec<&'a str> {
    flow.edges_from(id)
        .iter()
        .map(|edge| edge.dst.as_str())
        .collect()
}
