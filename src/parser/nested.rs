//! Dialect B: D2-like nested notation.
//!
//! Statements are one per line: arrow chains (`a -> b -> c`, optionally
//! labeled with a `: label` suffix), node declarations (`a: "Some label"` or
//! a bare identifier), and brace blocks (`a { ... }`) that scope the
//! statements inside under `a.`-prefixed identifiers. Identifiers are dotted
//! paths, so a nested node can be addressed from anywhere as `a.b`.
//!
//! Unlike the flowchart dialect there is no token shape to infer a kind
//! from. A node whose label is not `BEGIN`/`END` is a decision exactly when
//! it has more than one outgoing edge and every one of them is labeled;
//! otherwise it is a task.

use crate::error::{FlowError, FlowParseError};
use crate::flow::{FlowEdge, FlowNode, FlowNodeKind, PromptFlow};
use crate::parser::{NodeTable, kind_from_label, match_ident, parse_quoted, skip_ws};
use ahash::AHashMap;
use itertools::Itertools;

/// Keys that attach to the enclosing block's node instead of declaring a
/// node of their own. Only `label` carries flow semantics; the rest are
/// layout hints and are parsed but discarded.
const ATTRIBUTE_KEYS: &[&str] = &["shape", "style", "direction", "near", "label"];

/// One open brace block: the dotted prefix it scopes and the line it was
/// opened on.
struct Scope {
    prefix: String,
    opened_at: usize,
}

/// Parses D2-like nested text into a validated [`PromptFlow`].
///
/// # Example
///
/// ```rust
/// use keiro::{FlowNodeKind, parse_nested};
///
/// let flow = parse_nested(
///     "start: \"BEGIN\"\n\
///      start -> search\n\
///      search -> check\n\
///      check -> done: yes\n\
///      check -> search: no\n\
///      done: \"END\"",
/// )?;
///
/// assert_eq!(flow.begin_id, "start");
/// assert_eq!(flow.nodes["check"].kind, FlowNodeKind::Decision);
/// # Ok::<(), keiro::FlowError>(())
/// ```
pub fn parse_nested(text: &str) -> Result<PromptFlow, FlowError> {
    let mut parser = NestedParser::new();
    for (idx, raw_line) in text.lines().enumerate() {
        parser.parse_line(raw_line, idx + 1)?;
    }
    parser.finish()
}

struct NestedParser {
    nodes: NodeTable<String>,
    outgoing: AHashMap<String, Vec<FlowEdge>>,
    scopes: Vec<Scope>,
}

impl NestedParser {
    fn new() -> Self {
        Self {
            nodes: NodeTable::new(),
            outgoing: AHashMap::new(),
            scopes: Vec::new(),
        }
    }

    fn parse_line(&mut self, raw_line: &str, line_no: usize) -> Result<(), FlowParseError> {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if line == "}" {
            return match self.scopes.pop() {
                Some(_) => Ok(()),
                None => Err(FlowParseError::UnbalancedBlockClose { line: line_no }),
            };
        }

        if let Some(stmt) = line.strip_suffix('{') {
            let path = self.parse_declaration(stmt.trim_end(), line_no)?;
            self.scopes.push(Scope {
                prefix: path,
                opened_at: line_no,
            });
            return Ok(());
        }

        self.parse_statement(line, line_no)
    }

    /// The statement before an opening brace: `ident` or `ident: label`.
    /// Declares the node and returns its full id for the new scope.
    fn parse_declaration(&mut self, stmt: &str, line_no: usize) -> Result<String, FlowParseError> {
        let (path, end) = self.parse_path(stmt, 0, line_no)?;
        let end = skip_ws(stmt, end);

        if stmt.as_bytes().get(end) == Some(&b':') {
            let (value, end) = self.parse_value(stmt, skip_ws(stmt, end + 1), line_no)?;
            if skip_ws(stmt, end) != stmt.len() {
                return Err(FlowParseError::TrailingContent { line: line_no });
            }
            if value.is_empty() {
                return Err(FlowParseError::EmptyNodeLabel { line: line_no });
            }
            self.declare(&path, Some(value), line_no)?;
        } else if end != stmt.len() {
            return Err(FlowParseError::TrailingContent { line: line_no });
        } else {
            self.declare(&path, None, line_no)?;
        }
        Ok(path)
    }

    /// A statement without block braces: an arrow chain, a `key: value`
    /// declaration or attribute, or a bare identifier.
    fn parse_statement(&mut self, line: &str, line_no: usize) -> Result<(), FlowParseError> {
        let (first, idx) = self.parse_path(line, 0, line_no)?;
        let idx = skip_ws(line, idx);

        if line[idx..].starts_with("->") {
            return self.parse_chain_tail(line, idx, first, line_no);
        }

        if line.as_bytes().get(idx) == Some(&b':') {
            return self.parse_keyed(line, idx + 1, first, line_no);
        }

        if idx != line.len() {
            return Err(FlowParseError::TrailingContent { line: line_no });
        }

        // Bare identifier: registers the node even if nothing references it.
        self.declare(&first, None, line_no)
    }

    /// The `-> b -> c[: label]` remainder of an arrow chain.
    fn parse_chain_tail(
        &mut self,
        line: &str,
        mut idx: usize,
        first: String,
        line_no: usize,
    ) -> Result<(), FlowParseError> {
        let mut chain = vec![first];
        while line[idx..].starts_with("->") {
            idx = skip_ws(line, idx + 2);
            let (path, end) = self.parse_path(line, idx, line_no)?;
            chain.push(path);
            idx = skip_ws(line, end);
        }

        let mut label = None;
        if line.as_bytes().get(idx) == Some(&b':') {
            let (text, end) = self.parse_value(line, skip_ws(line, idx + 1), line_no)?;
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(FlowParseError::EmptyEdgeLabel { line: line_no });
            }
            label = Some(text);
            idx = end;
        }
        if skip_ws(line, idx) != line.len() {
            return Err(FlowParseError::TrailingContent { line: line_no });
        }

        for path in &chain {
            self.declare(path, None, line_no)?;
        }
        // The chain label belongs to its final edge only.
        let last_pair = chain.len() - 2;
        for (pair_idx, (src, dst)) in chain.iter().tuple_windows().enumerate() {
            let edge_label = if pair_idx == last_pair {
                label.take()
            } else {
                None
            };
            self.outgoing
                .entry(src.clone())
                .or_default()
                .push(FlowEdge::new(src.clone(), dst.clone(), edge_label));
            self.outgoing.entry(dst.clone()).or_default();
        }
        Ok(())
    }

    /// A `key: value` statement. Reserved keys are attributes of the
    /// enclosing block's node; anything else declares a node with an
    /// explicit label.
    fn parse_keyed(
        &mut self,
        line: &str,
        idx: usize,
        path: String,
        line_no: usize,
    ) -> Result<(), FlowParseError> {
        let (value, end) = self.parse_value(line, skip_ws(line, idx), line_no)?;
        if skip_ws(line, end) != line.len() {
            return Err(FlowParseError::TrailingContent { line: line_no });
        }

        if let Some(key) = self.attribute_key(&path) {
            if key != "label" {
                return Ok(());
            }
            let Some(scope) = self.scopes.last() else {
                // A label attribute outside any block has nothing to
                // attach to.
                return Ok(());
            };
            let node_id = scope.prefix.clone();
            if value.is_empty() {
                return Err(FlowParseError::EmptyNodeLabel { line: line_no });
            }
            return self.nodes.define(&node_id, value, true, line_no);
        }

        if value.is_empty() {
            return Err(FlowParseError::EmptyNodeLabel { line: line_no });
        }
        self.declare(&path, Some(value), line_no)
    }

    /// `path` is already scope-resolved; an attribute key is a single bare
    /// reserved segment as written.
    fn attribute_key(&self, path: &str) -> Option<&'static str> {
        let written = match self.scopes.last() {
            Some(scope) => path.strip_prefix(scope.prefix.as_str())?.strip_prefix('.')?,
            None => path,
        };
        ATTRIBUTE_KEYS
            .iter()
            .find(|key| **key == written)
            .copied()
    }

    /// A dotted identifier path at `idx`, resolved against the current
    /// scope. Returns the full node id and the index past the path.
    fn parse_path(
        &self,
        line: &str,
        idx: usize,
        line_no: usize,
    ) -> Result<(String, usize), FlowParseError> {
        let mut end =
            match_ident(line, idx).ok_or(FlowParseError::ExpectedNodeId { line: line_no })?;
        while line.as_bytes().get(end) == Some(&b'.') {
            end = match_ident(line, end + 1)
                .ok_or(FlowParseError::ExpectedNodeId { line: line_no })?;
        }
        let path = &line[idx..end];
        let full = match self.scopes.last() {
            Some(scope) => format!("{}.{}", scope.prefix, path),
            None => path.to_string(),
        };
        Ok((full, end))
    }

    /// A declaration or attribute value: a quoted string (verbatim) or the
    /// bare rest of the line (trimmed).
    fn parse_value(
        &self,
        line: &str,
        idx: usize,
        line_no: usize,
    ) -> Result<(String, usize), FlowParseError> {
        if line.as_bytes().get(idx) == Some(&b'"') {
            return parse_quoted(line, idx, line_no);
        }
        Ok((line[idx..].trim().to_string(), line.len()))
    }

    /// Registers a node, implicitly (label defaults to the full id) or with
    /// an explicit label.
    fn declare(
        &mut self,
        node_id: &str,
        label: Option<String>,
        line_no: usize,
    ) -> Result<(), FlowParseError> {
        let explicit = label.is_some();
        let label = label.unwrap_or_else(|| node_id.to_string());
        self.nodes.define(node_id, label, explicit, line_no)
    }

    /// Resolves node kinds from the accumulated edge shapes and hands the
    /// result to the shared validator.
    fn finish(self) -> Result<PromptFlow, FlowError> {
        if let Some(scope) = self.scopes.last() {
            return Err(FlowParseError::UnclosedBlock {
                line: scope.opened_at,
            }
            .into());
        }

        let mut edge_count = 0usize;
        let mut flow_nodes: AHashMap<String, FlowNode> = AHashMap::new();
        for (node_id, def) in self.nodes.into_defs() {
            let kind = kind_from_label(&def.value)
                .unwrap_or_else(|| infer_kind(self.outgoing.get(&node_id)));
            flow_nodes.insert(node_id.clone(), FlowNode::new(node_id, def.value, kind));
        }
        for edges in self.outgoing.values() {
            edge_count += edges.len();
        }

        tracing::debug!(
            nodes = flow_nodes.len(),
            edges = edge_count,
            "nested dialect parsed"
        );
        Ok(PromptFlow::assemble(flow_nodes, self.outgoing)?)
    }
}

/// Edge-shape-driven kind inference: more than one outgoing edge, all of
/// them labeled, makes a decision; anything else is a task.
fn infer_kind(edges: Option<&Vec<FlowEdge>>) -> FlowNodeKind {
    let edges = edges.map_or(&[][..], Vec::as_slice);
    let all_labeled = edges
        .iter()
        .all(|edge| edge.label.as_deref().is_some_and(|l| !l.trim().is_empty()));
    if edges.len() > 1 && all_labeled {
        FlowNodeKind::Decision
    } else {
        FlowNodeKind::Task
    }
}
