//! The graph model: node, edge and flow value types plus the shared
//! structural validator both dialect parsers defer to.

mod graph;
mod node;
mod validate;

pub use graph::PromptFlow;
pub use node::{FlowEdge, FlowNode, FlowNodeKind, NodeLabel};
pub use validate::validate_flow;
