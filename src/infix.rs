use std::fmt::Display;

use crate::ast::{Leaf, Node};

impl Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer { token, .. } => write!(f, "{token}"),
            Self::Symbol(name) => write!(f, "{name}"),
        }
    }
}

/// Nodes display as fully parenthesised infix.
impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "{leaf}"),
            Self::Interior { op, left, right } => write!(f, "({left} {} {right})", op.token()),
        }
    }
}

/// Render a tree as infix text, e.g. `(5 + 3)`.
pub fn render(node: &Node) -> String {
    node.to_string()
}
