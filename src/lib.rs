//! # Keiro - Prompt-Flow Compiler
//!
//! **Keiro** compiles a small graph-description language into a validated,
//! immutable execution graph for an autonomous agent: a sequence of task and
//! decision steps bounded by a single entry and a single exit. Two surface
//! syntaxes are supported — a Mermaid-like flowchart dialect and a D2-like
//! nested dialect — and both compile to the same [`PromptFlow`] artifact.
//!
//! ## Core Workflow
//!
//! 1.  **Pick a dialect**: choose [`parse_flowchart`], [`parse_nested`], or
//!     go through [`FlowDialect::parse`] when the dialect is a runtime value.
//! 2.  **Parse and validate**: feed raw text in; either a fully validated
//!     [`PromptFlow`] comes back, or a typed [`FlowError`] explaining the
//!     first parse or structural fault. There are no partial results.
//! 3.  **Execute elsewhere**: an executor (outside this crate) walks
//!     `outgoing` starting at `begin_id`. At a decision node it prompts a
//!     model, runs the reply through [`extract_choice`], and matches the
//!     returned label against the node's outgoing edges.
//!
//! A compiled flow guarantees exactly one `begin` and one `end` node, a
//! reachable exit, and per-kind edge arity: the begin node and every task
//! node have exactly one successor, the end node has none, and every
//! reachable decision node has at least one outgoing edge with distinct,
//! non-empty labels. Nodes the begin node cannot reach are kept but exempt.
//!
//! ## Quick Start
//!
//! ```rust
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let flow = parse_flowchart(
//!         "flowchart TD\n\
//!          A([BEGIN]) --> B[Gather context]\n\
//!          B --> C{Enough to answer?}\n\
//!          C -->|yes| D([END])\n\
//!          C -->|no| B",
//!     )?;
//!
//!     assert_eq!(flow.begin_id, "A");
//!     assert_eq!(flow.nodes["B"].kind, FlowNodeKind::Task);
//!
//!     // The executor side: pull the chosen branch out of model output.
//!     let reply = "Context looks sufficient. <choice>yes</choice>";
//!     assert_eq!(extract_choice(reply).as_deref(), Some("yes"));
//!
//!     Ok(())
//! }
//! ```

pub mod choice;
pub mod error;
pub mod flow;
pub mod parser;
pub mod prelude;

pub use choice::extract_choice;
pub use error::{FlowError, FlowParseError, FlowValidationError};
pub use flow::{FlowEdge, FlowNode, FlowNodeKind, NodeLabel, PromptFlow, validate_flow};
pub use parser::{FlowDialect, parse_flowchart, parse_nested};
