use thiserror::Error;

/// Errors that can occur while parsing flow source text, in either dialect.
///
/// Every variant carries the 1-indexed line number of the offending line.
/// Parse errors are always fatal to the current parse call; no partial flow
/// is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowParseError {
    #[error("Line {line}: Expected node id")]
    ExpectedNodeId { line: usize },

    #[error("Line {line}: Expected edge arrow")]
    ExpectedArrow { line: usize },

    #[error("Line {line}: Expected '-->' to end edge label")]
    UnterminatedEdgeLabel { line: usize },

    #[error("Line {line}: Unclosed edge label")]
    UnclosedEdgeLabel { line: usize },

    #[error("Line {line}: Edge label cannot be empty")]
    EmptyEdgeLabel { line: usize },

    #[error("Line {line}: Expected node label")]
    ExpectedNodeLabel { line: usize },

    #[error("Line {line}: Unclosed node label")]
    UnclosedNodeLabel { line: usize },

    #[error("Line {line}: Unclosed quoted label")]
    UnclosedQuotedLabel { line: usize },

    #[error("Line {line}: Node label cannot be empty")]
    EmptyNodeLabel { line: usize },

    #[error("Line {line}: Unexpected trailing content")]
    TrailingContent { line: usize },

    #[error("Line {line}: Conflicting definition for node \"{node_id}\"")]
    ConflictingNode { line: usize, node_id: String },

    #[error("Line {line}: Unexpected '}}' without an open block")]
    UnbalancedBlockClose { line: usize },

    #[error("Line {line}: Block opened here is never closed")]
    UnclosedBlock { line: usize },
}

impl FlowParseError {
    /// The 1-indexed source line the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            Self::ExpectedNodeId { line }
            | Self::ExpectedArrow { line }
            | Self::UnterminatedEdgeLabel { line }
            | Self::UnclosedEdgeLabel { line }
            | Self::EmptyEdgeLabel { line }
            | Self::ExpectedNodeLabel { line }
            | Self::UnclosedNodeLabel { line }
            | Self::UnclosedQuotedLabel { line }
            | Self::EmptyNodeLabel { line }
            | Self::TrailingContent { line }
            | Self::ConflictingNode { line, .. }
            | Self::UnbalancedBlockClose { line }
            | Self::UnclosedBlock { line } => *line,
        }
    }
}

/// Errors raised by the structural validator after a syntactically complete
/// parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowValidationError {
    #[error("Expected exactly one BEGIN node, found {0}")]
    BeginCount(usize),

    #[error("Expected exactly one END node, found {0}")]
    EndCount(usize),

    #[error("BEGIN node must have exactly one outgoing edge")]
    BeginArity,

    #[error("END node must not have outgoing edges")]
    EndHasEdges,

    #[error("Decision node \"{0}\" must have outgoing edges")]
    DecisionWithoutEdges(String),

    #[error("Decision node \"{0}\" has an unlabeled edge")]
    UnlabeledDecisionEdge(String),

    #[error("Decision node \"{node_id}\" has duplicate edge labels")]
    DuplicateDecisionLabels { node_id: String, label: String },

    #[error("Node \"{0}\" must have exactly one outgoing edge")]
    TaskArity(String),

    #[error("END node is not reachable from BEGIN")]
    EndUnreachable,
}

/// Umbrella error for the parse-and-validate entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Parse(#[from] FlowParseError),

    #[error(transparent)]
    Validation(#[from] FlowValidationError),
}
