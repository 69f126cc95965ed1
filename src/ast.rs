use crate::environment::Int;

// AST NODES

/// A boxed Node to allow recursive type structure.
pub type BoxNode = Box<Node>;

/// An expression tree. Every interior node owns exactly two children.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Node {
    Leaf(Leaf),
    Interior {
        op: Operator,
        left: BoxNode,
        right: BoxNode,
    },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Leaf {
    /// An integer literal, keeping the text it was written as.
    Integer { value: Int, token: String },
    /// A reference to a variable in the environment.
    Symbol(String),
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Assign,
    /// `?`: left child is the condition, right child an `Alternative`.
    Condition,
    /// `:`: left child is the true branch, right child the false branch.
    Alternative,
}

impl Operator {
    /// The token this operator is written as.
    pub fn token(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Assign => "=",
            Self::Condition => "?",
            Self::Alternative => ":",
        }
    }
}

/// Convenience macro for creating a `BoxNode` holding an interior node.
macro_rules! interior {
    ($op:ident, $left:expr, $right:expr) => {
        Box::new($crate::ast::Node::Interior {
            op: $crate::ast::Operator::$op,
            left: $left,
            right: $right,
        })
    };
}

// NODE BUILDERS

impl Node {
    pub fn integer(value: Int, token: impl Into<String>) -> BoxNode {
        Box::new(Self::Leaf(Leaf::Integer {
            value,
            token: token.into(),
        }))
    }

    pub fn symbol(name: impl Into<String>) -> BoxNode {
        Box::new(Self::Leaf(Leaf::Symbol(name.into())))
    }

    /// Build the two-level ternary structure: `cond ? (yes : no)`.
    pub fn ternary(condition: BoxNode, yes: BoxNode, no: BoxNode) -> BoxNode {
        interior!(Condition, condition, interior!(Alternative, yes, no))
    }
}
