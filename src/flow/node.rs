use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of node kinds a flow can contain.
///
/// Every consumption site matches exhaustively, so adding a kind is a
/// compile-time event rather than a runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowNodeKind {
    /// The unique entry point of a flow.
    Begin,
    /// The unique exit point of a flow.
    End,
    /// A non-branching step with exactly one successor.
    Task,
    /// A branch point whose outgoing edges are labeled alternatives.
    Decision,
}

impl fmt::Display for FlowNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowNodeKind::Begin => "begin",
            FlowNodeKind::End => "end",
            FlowNodeKind::Task => "task",
            FlowNodeKind::Decision => "decision",
        };
        write!(f, "{}", name)
    }
}

/// A node's display label.
///
/// Both dialect parsers only ever produce `Text`. `Rich` carries structured
/// content blocks for embedding callers that build flows programmatically
/// with non-textual labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeLabel {
    Text(String),
    Rich(Vec<serde_json::Value>),
}

impl NodeLabel {
    pub fn text(label: impl Into<String>) -> Self {
        NodeLabel::Text(label.into())
    }

    /// The textual form of the label, if it has one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeLabel::Text(s) => Some(s),
            NodeLabel::Rich(_) => None,
        }
    }
}

impl From<&str> for NodeLabel {
    fn from(label: &str) -> Self {
        NodeLabel::Text(label.to_string())
    }
}

impl From<String> for NodeLabel {
    fn from(label: String) -> Self {
        NodeLabel::Text(label)
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLabel::Text(s) => write!(f, "{}", s),
            // Rich labels render as compact JSON
            NodeLabel::Rich(parts) => {
                let json = serde_json::to_string(parts).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

/// A single step in a flow. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Stable identifier, unique within a flow.
    pub id: String,
    pub label: NodeLabel,
    pub kind: FlowNodeKind,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, label: impl Into<NodeLabel>, kind: FlowNodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// A directed connection between two nodes. Immutable once constructed.
///
/// The label is required (and non-empty) for edges leaving a decision node
/// and absent everywhere else; the validator enforces this, not the
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub src: String,
    pub dst: String,
    pub label: Option<String>,
}

impl FlowEdge {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, label: Option<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            label,
        }
    }
}
