//! The two dialect parsers and the scanning primitives they share.
//!
//! Both dialects are hand-written line-oriented recursive descent over the
//! same raw shape (nodes keyed by identifier plus ordered outgoing edge
//! lists) and both defer structural checking to the shared validator via
//! [`PromptFlow::assemble`](crate::flow::PromptFlow::assemble).

use crate::error::{FlowError, FlowParseError};
use crate::flow::{FlowNodeKind, PromptFlow};
use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

mod flowchart;
mod nested;

pub use flowchart::parse_flowchart;
pub use nested::parse_nested;

/// The surface syntax a flow is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDialect {
    /// Mermaid-like flowchart notation (`A --> B`, shape-delimited labels).
    Flowchart,
    /// D2-like nested notation (`a -> b: label`, dotted ids, brace blocks).
    Nested,
}

impl FlowDialect {
    /// Parses `text` in this dialect into a validated flow.
    pub fn parse(&self, text: &str) -> Result<PromptFlow, FlowError> {
        match self {
            FlowDialect::Flowchart => parse_flowchart(text),
            FlowDialect::Nested => parse_nested(text),
        }
    }
}

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*").unwrap());

/// Matches a node identifier segment at `idx`, returning the index past its
/// end.
pub(crate) fn match_ident(line: &str, idx: usize) -> Option<usize> {
    IDENT_RE.find(&line[idx..]).map(|m| idx + m.end())
}

pub(crate) fn skip_ws(line: &str, mut idx: usize) -> usize {
    while let Some(ch) = line[idx..].chars().next() {
        if !ch.is_whitespace() {
            break;
        }
        idx += ch.len_utf8();
    }
    idx
}

/// Scans a double-quoted string starting at the opening quote.
///
/// A backslash escapes the following character. Returns the unescaped
/// content verbatim (no trimming) and the index past the closing quote.
pub(crate) fn parse_quoted(
    line: &str,
    idx: usize,
    line_no: usize,
) -> Result<(String, usize), FlowParseError> {
    debug_assert_eq!(line.as_bytes().get(idx), Some(&b'"'));
    let mut buf = String::new();
    let mut idx = idx + 1;
    while let Some(ch) = line[idx..].chars().next() {
        match ch {
            '"' => return Ok((buf, idx + 1)),
            '\\' => {
                idx += 1;
                match line[idx..].chars().next() {
                    Some(escaped) => {
                        buf.push(escaped);
                        idx += escaped.len_utf8();
                    }
                    None => break,
                }
            }
            _ => {
                buf.push(ch);
                idx += ch.len_utf8();
            }
        }
    }
    Err(FlowParseError::UnclosedQuotedLabel { line: line_no })
}

/// Node kind forced by label text, when any.
///
/// Both dialects share this rule: a label reading `begin` or `end` (trimmed,
/// compared case-insensitively) overrides any shape- or edge-derived kind.
pub(crate) fn kind_from_label(label: &str) -> Option<FlowNodeKind> {
    let norm = label.trim();
    if norm.eq_ignore_ascii_case("begin") {
        Some(FlowNodeKind::Begin)
    } else if norm.eq_ignore_ascii_case("end") {
        Some(FlowNodeKind::End)
    } else {
        None
    }
}

pub(crate) struct NodeDef<T> {
    pub value: T,
    pub explicit: bool,
}

/// Accumulates node definitions during a parse and resolves repeated
/// references to the same identifier.
///
/// A node may be mentioned on several lines, sometimes bare and sometimes
/// with an explicit label. The merge rules: identical redefinitions are
/// no-ops, an implicit mention never downgrades an explicit definition, an
/// explicit definition upgrades an implicit one, and two disagreeing
/// explicit definitions are a parse error.
pub(crate) struct NodeTable<T> {
    defs: AHashMap<String, NodeDef<T>>,
}

impl<T: PartialEq> NodeTable<T> {
    pub fn new() -> Self {
        Self {
            defs: AHashMap::new(),
        }
    }

    pub fn define(
        &mut self,
        node_id: &str,
        value: T,
        explicit: bool,
        line_no: usize,
    ) -> Result<(), FlowParseError> {
        if let Some(existing) = self.defs.get_mut(node_id) {
            if existing.value == value {
                return Ok(());
            }
            if !explicit && existing.explicit {
                return Ok(());
            }
            if explicit && !existing.explicit {
                *existing = NodeDef { value, explicit };
                return Ok(());
            }
            return Err(FlowParseError::ConflictingNode {
                line: line_no,
                node_id: node_id.to_string(),
            });
        }
        self.defs
            .insert(node_id.to_string(), NodeDef { value, explicit });
        Ok(())
    }

    pub fn into_defs(self) -> AHashMap<String, NodeDef<T>> {
        self.defs
    }
}
