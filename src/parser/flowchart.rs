//! Dialect A: Mermaid-like flowchart notation.
//!
//! Line-oriented recursive descent. A line is either an edge
//! (`NodeToken --> NodeToken`, with an optional label in one of two
//! spellings) or a lone node declaration. Blank lines, `%%` comments and the
//! `flowchart`/`graph` header carry no semantic content.

use crate::error::{FlowError, FlowParseError};
use crate::flow::{FlowEdge, FlowNode, FlowNodeKind, PromptFlow};
use crate::parser::{NodeTable, kind_from_label, match_ident, parse_quoted, skip_ws};
use ahash::AHashMap;
use regex::Regex;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(flowchart|graph)\b").unwrap());

/// The shape of a node token's label delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `[label]`
    Square,
    /// `(label)`, or the stadium form `([label])`
    Paren,
    /// `{label}`
    Curly,
}

/// A node token as written on one line, before identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSpec {
    node_id: String,
    label: Option<String>,
    shape: Option<Shape>,
}

/// Parses Mermaid-like flowchart text into a validated [`PromptFlow`].
///
/// # Example
///
/// ```rust
/// use keiro::{FlowNodeKind, parse_flowchart};
///
/// let flow = parse_flowchart(
///     "flowchart TD\n\
///      A([BEGIN]) --> B[Search the docs]\n\
///      B --> C{Enough?}\n\
///      C -->|yes| D([END])\n\
///      C -->|no| B",
/// )?;
///
/// assert_eq!(flow.begin_id, "A");
/// assert_eq!(flow.nodes["C"].kind, FlowNodeKind::Decision);
/// # Ok::<(), keiro::FlowError>(())
/// ```
pub fn parse_flowchart(text: &str) -> Result<PromptFlow, FlowError> {
    let mut nodes: NodeTable<FlowNode> = NodeTable::new();
    let mut outgoing: AHashMap<String, Vec<FlowEdge>> = AHashMap::new();
    let mut edge_count = 0usize;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }
        if HEADER_RE.is_match(line) {
            continue;
        }

        if line.contains("-->") {
            let (src_spec, label, dst_spec) = parse_edge_line(line, line_no)?;
            let src_id = add_node(&mut nodes, src_spec, line_no)?;
            let dst_id = add_node(&mut nodes, dst_spec, line_no)?;
            outgoing
                .entry(src_id.clone())
                .or_default()
                .push(FlowEdge::new(src_id, dst_id.clone(), label));
            outgoing.entry(dst_id).or_default();
            edge_count += 1;
            continue;
        }

        let (node_spec, end) = parse_node_token(line, 0, line_no)?;
        let end = skip_ws(line, end);
        if end != line.len() {
            return Err(FlowParseError::TrailingContent { line: line_no }.into());
        }
        add_node(&mut nodes, node_spec, line_no)?;
    }

    let flow_nodes: AHashMap<String, FlowNode> = nodes
        .into_defs()
        .into_iter()
        .map(|(node_id, def)| (node_id, def.value))
        .collect();

    tracing::debug!(
        nodes = flow_nodes.len(),
        edges = edge_count,
        "flowchart dialect parsed"
    );
    Ok(PromptFlow::assemble(flow_nodes, outgoing)?)
}

/// `NodeToken Arrow [Label] NodeToken`, in either label spelling:
/// `A -->|label| B` or `A --label--> B`.
fn parse_edge_line(
    line: &str,
    line_no: usize,
) -> Result<(NodeSpec, Option<String>, NodeSpec), FlowParseError> {
    let (src_spec, idx) = parse_node_token(line, 0, line_no)?;
    let idx = skip_ws(line, idx);

    if line[idx..].starts_with("-->") {
        let mut idx = skip_ws(line, idx + 3);
        let mut label = None;
        if line.as_bytes().get(idx) == Some(&b'|') {
            let (text, end) = parse_pipe_label(line, idx, line_no)?;
            label = Some(text);
            idx = skip_ws(line, end);
        }
        let (dst_spec, end) = parse_node_token(line, idx, line_no)?;
        expect_line_end(line, end, line_no)?;
        return Ok((src_spec, label, dst_spec));
    }

    if line[idx..].starts_with("--") {
        let idx = idx + 2;
        let arrow = line[idx..]
            .find("-->")
            .ok_or(FlowParseError::UnterminatedEdgeLabel { line: line_no })?;
        let label = line[idx..idx + arrow].trim();
        if label.is_empty() {
            return Err(FlowParseError::EmptyEdgeLabel { line: line_no });
        }
        let after = skip_ws(line, idx + arrow + 3);
        let (dst_spec, end) = parse_node_token(line, after, line_no)?;
        expect_line_end(line, end, line_no)?;
        return Ok((src_spec, Some(label.to_string()), dst_spec));
    }

    Err(FlowParseError::ExpectedArrow { line: line_no })
}

fn expect_line_end(line: &str, idx: usize, line_no: usize) -> Result<(), FlowParseError> {
    if skip_ws(line, idx) != line.len() {
        return Err(FlowParseError::TrailingContent { line: line_no });
    }
    Ok(())
}

/// An identifier, optionally followed by a shape-delimited label.
fn parse_node_token(
    line: &str,
    idx: usize,
    line_no: usize,
) -> Result<(NodeSpec, usize), FlowParseError> {
    let end = match_ident(line, idx).ok_or(FlowParseError::ExpectedNodeId { line: line_no })?;
    let node_id = line[idx..end].to_string();

    let (shape, close) = match line.as_bytes().get(end) {
        Some(b'[') => (Shape::Square, ']'),
        Some(b'(') => (Shape::Paren, ')'),
        Some(b'{') => (Shape::Curly, '}'),
        _ => {
            return Ok((
                NodeSpec {
                    node_id,
                    label: None,
                    shape: None,
                },
                end,
            ));
        }
    };

    let (label, end) = parse_label(line, end + 1, close, line_no)?;
    Ok((
        NodeSpec {
            node_id,
            label: Some(label),
            shape: Some(shape),
        },
        end,
    ))
}

/// Label content between shape delimiters: a quoted string, a bare run up to
/// the close delimiter, or (inside parens) a nested square-bracket label
/// forming the stadium shape.
fn parse_label(
    line: &str,
    idx: usize,
    close: char,
    line_no: usize,
) -> Result<(String, usize), FlowParseError> {
    if idx >= line.len() {
        return Err(FlowParseError::ExpectedNodeLabel { line: line_no });
    }

    // Stadium: `([ ... ])`
    if close == ')' && line.as_bytes()[idx] == b'[' {
        let (label, end) = parse_label(line, idx + 1, ']', line_no)?;
        let end = skip_ws(line, end);
        if line.as_bytes().get(end) != Some(&b')') {
            return Err(FlowParseError::UnclosedNodeLabel { line: line_no });
        }
        return Ok((label, end + 1));
    }

    if line.as_bytes()[idx] == b'"' {
        let (label, end) = parse_quoted(line, idx, line_no)?;
        let end = skip_ws(line, end);
        if line[end..].chars().next() != Some(close) {
            return Err(FlowParseError::UnclosedNodeLabel { line: line_no });
        }
        return Ok((label, end + close.len_utf8()));
    }

    let found = line[idx..]
        .find(close)
        .ok_or(FlowParseError::UnclosedNodeLabel { line: line_no })?;
    let label = line[idx..idx + found].trim();
    if label.is_empty() {
        return Err(FlowParseError::EmptyNodeLabel { line: line_no });
    }
    Ok((label.to_string(), idx + found + close.len_utf8()))
}

/// `|label|` immediately after the arrow.
fn parse_pipe_label(
    line: &str,
    idx: usize,
    line_no: usize,
) -> Result<(String, usize), FlowParseError> {
    debug_assert_eq!(line.as_bytes().get(idx), Some(&b'|'));
    let end = line[idx + 1..]
        .find('|')
        .ok_or(FlowParseError::UnclosedEdgeLabel { line: line_no })?;
    let label = line[idx + 1..idx + 1 + end].trim();
    if label.is_empty() {
        return Err(FlowParseError::EmptyEdgeLabel { line: line_no });
    }
    Ok((label.to_string(), idx + 1 + end + 1))
}

/// Builds the [`FlowNode`] a spec describes and resolves it against earlier
/// mentions of the same identifier.
fn add_node(
    nodes: &mut NodeTable<FlowNode>,
    spec: NodeSpec,
    line_no: usize,
) -> Result<String, FlowParseError> {
    let explicit = spec.label.is_some();
    let label = spec.label.unwrap_or_else(|| spec.node_id.clone());
    if label.is_empty() {
        return Err(FlowParseError::EmptyNodeLabel { line: line_no });
    }

    // Shape gives the default kind; a begin/end label overrides it.
    let mut kind = match spec.shape {
        Some(Shape::Curly) => FlowNodeKind::Decision,
        _ => FlowNodeKind::Task,
    };
    if let Some(forced) = kind_from_label(&label) {
        kind = forced;
    }

    let node = FlowNode::new(spec.node_id.clone(), label, kind);
    nodes.define(&spec.node_id, node, explicit, line_no)?;
    Ok(spec.node_id)
}
