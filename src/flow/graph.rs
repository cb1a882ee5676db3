use crate::error::FlowValidationError;
use crate::flow::validate::validate_flow;
use crate::flow::{FlowEdge, FlowNode};
use ahash::AHashMap;
use serde::Serialize;

/// The compiled artifact: a validated, immutable execution graph.
///
/// Every node id keys both maps; a node with no successors has an empty
/// `outgoing` entry, never a missing one. Edge lists preserve the order the
/// edges appeared in the source. A `PromptFlow` is produced atomically by a
/// parse-and-validate call and is read-only afterwards, so it can be shared
/// freely across threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptFlow {
    pub nodes: AHashMap<String, FlowNode>,
    pub outgoing: AHashMap<String, Vec<FlowEdge>>,
    pub begin_id: String,
    pub end_id: String,
}

impl PromptFlow {
    /// Validates raw nodes and edges and assembles them into a flow.
    ///
    /// This is the only way to construct a `PromptFlow`; both dialect
    /// parsers funnel through it. Missing `outgoing` entries are filled with
    /// empty lists before validation.
    pub fn assemble(
        nodes: AHashMap<String, FlowNode>,
        mut outgoing: AHashMap<String, Vec<FlowEdge>>,
    ) -> Result<Self, FlowValidationError> {
        for node_id in nodes.keys() {
            outgoing.entry(node_id.clone()).or_default();
        }
        let (begin_id, end_id) = validate_flow(&nodes, &outgoing)?;
        Ok(Self {
            nodes,
            outgoing,
            begin_id,
            end_id,
        })
    }

    pub fn begin(&self) -> &FlowNode {
        &self.nodes[&self.begin_id]
    }

    pub fn end(&self) -> &FlowNode {
        &self.nodes[&self.end_id]
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    /// The ordered outgoing edges of a node; empty for unknown ids.
    pub fn edges_from(&self, id: &str) -> &[FlowEdge] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }
}
