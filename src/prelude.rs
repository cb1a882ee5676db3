//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and functions from the keiro
//! crate. Import this module to get access to the core functionality without
//! having to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let source = std::fs::read_to_string("path/to/flow.mmd")?;
//! let flow = parse_flowchart(&source)?;
//!
//! println!("Flow starts at: {}", flow.begin_id);
//! # Ok(())
//! # }
//! ```

// Dialect parsers and dialect selection
pub use crate::parser::{FlowDialect, parse_flowchart, parse_nested};

// The compiled flow and its value types
pub use crate::flow::{FlowEdge, FlowNode, FlowNodeKind, NodeLabel, PromptFlow, validate_flow};

// Choice extraction
pub use crate::choice::extract_choice;

// Error types
pub use crate::error::{FlowError, FlowParseError, FlowValidationError};

// Standard library re-exports commonly used with this crate
pub use ahash::AHashMap;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
