use crate::error::FlowValidationError;
use crate::flow::{FlowEdge, FlowNode, FlowNodeKind};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// Checks the structural invariants of a flow and returns the begin and end
/// node ids on success.
///
/// The rules, applied after finding the unique begin/end pair:
/// - the begin node has exactly one outgoing edge,
/// - the end node has none,
/// - a decision node has at least one outgoing edge, all labeled with
///   pairwise-distinct non-empty labels,
/// - every other node has exactly one outgoing edge.
///
/// Only nodes reachable from begin are subject to the per-kind rules;
/// unreachable nodes are retained but exempt. The end node must itself be
/// reachable. Pure function, no side effects.
pub fn validate_flow(
    nodes: &AHashMap<String, FlowNode>,
    outgoing: &AHashMap<String, Vec<FlowEdge>>,
) -> Result<(String, String), FlowValidationError> {
    let begin_ids: Vec<&str> = nodes
        .values()
        .filter(|node| node.kind == FlowNodeKind::Begin)
        .map(|node| node.id.as_str())
        .collect();
    let end_ids: Vec<&str> = nodes
        .values()
        .filter(|node| node.kind == FlowNodeKind::End)
        .map(|node| node.id.as_str())
        .collect();

    if begin_ids.len() != 1 {
        return Err(FlowValidationError::BeginCount(begin_ids.len()));
    }
    if end_ids.len() != 1 {
        return Err(FlowValidationError::EndCount(end_ids.len()));
    }

    let begin_id = begin_ids[0];
    let end_id = end_ids[0];
    let reachable = reachable_from(begin_id, outgoing);

    for node in nodes.values() {
        if !reachable.contains(node.id.as_str()) {
            continue;
        }
        let edges = outgoing.get(&node.id).map_or(&[][..], Vec::as_slice);
        match node.kind {
            FlowNodeKind::Begin => {
                if edges.len() != 1 {
                    return Err(FlowValidationError::BeginArity);
                }
            }
            FlowNodeKind::End => {
                if !edges.is_empty() {
                    return Err(FlowValidationError::EndHasEdges);
                }
            }
            FlowNodeKind::Decision => check_decision_edges(node, edges)?,
            FlowNodeKind::Task => {
                if edges.len() != 1 {
                    return Err(FlowValidationError::TaskArity(node.id.clone()));
                }
            }
        }
    }

    if !reachable.contains(end_id) {
        return Err(FlowValidationError::EndUnreachable);
    }

    tracing::debug!(
        begin_id,
        end_id,
        reachable = reachable.len(),
        total = nodes.len(),
        "flow validated"
    );
    Ok((begin_id.to_string(), end_id.to_string()))
}

/// Worklist traversal over the outgoing map. Only set membership matters, so
/// the visit order is irrelevant.
fn reachable_from<'a>(
    begin_id: &'a str,
    outgoing: &'a AHashMap<String, Vec<FlowEdge>>,
) -> AHashSet<&'a str> {
    let mut reachable: AHashSet<&str> = AHashSet::new();
    let mut queue: Vec<&str> = vec![begin_id];
    while let Some(node_id) = queue.pop() {
        if !reachable.insert(node_id) {
            continue;
        }
        if let Some(edges) = outgoing.get(node_id) {
            for edge in edges {
                if !reachable.contains(edge.dst.as_str()) {
                    queue.push(&edge.dst);
                }
            }
        }
    }
    reachable
}

fn check_decision_edges(node: &FlowNode, edges: &[FlowEdge]) -> Result<(), FlowValidationError> {
    if edges.is_empty() {
        return Err(FlowValidationError::DecisionWithoutEdges(node.id.clone()));
    }
    let mut labels: Vec<&str> = Vec::with_capacity(edges.len());
    for edge in edges {
        match edge.label.as_deref() {
            Some(label) if !label.trim().is_empty() => labels.push(label),
            _ => {
                return Err(FlowValidationError::UnlabeledDecisionEdge(node.id.clone()));
            }
        }
    }
    if let Some(duplicate) = labels.iter().duplicates().next() {
        return Err(FlowValidationError::DuplicateDecisionLabels {
            node_id: node.id.clone(),
            label: duplicate.to_string(),
        });
    }
    Ok(())
}
