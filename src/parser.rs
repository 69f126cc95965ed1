use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::{BoxNode, Node, Operator};
use crate::environment::Int;
use crate::error::ParseError;
use crate::tokeniser::Token;

type Result<T> = std::result::Result<T, ParseError>;

/// Default ceiling on how deeply expressions may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

lazy_static! {
    /// Tokens that build a binary interior node.
    static ref OPERATOR_TABLE: HashMap<&'static str, Operator> = HashMap::from([
        ("+", Operator::Add),
        ("-", Operator::Subtract),
        ("*", Operator::Multiply),
        ("/", Operator::Divide),
        ("%", Operator::Modulo),
        ("=", Operator::Assign),
    ]);
}

/// What a token turned out to be once the parser looked at it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum TokenKind {
    Integer(Int),
    Symbol,
    Binary(Operator),
    Condition,
    Alternative,
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn classify(token: Token<'_>) -> Result<TokenKind> {
    let text = token.text();

    if is_integer(text) {
        // Out of range literals can't be represented, so they aren't valid tokens.
        return text
            .parse::<Int>()
            .map(TokenKind::Integer)
            .map_err(|_| ParseError::InvalidToken(text.to_string()));
    }

    if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Ok(TokenKind::Symbol);
    }

    if let Some(op) = OPERATOR_TABLE.get(text) {
        return Ok(TokenKind::Binary(*op));
    }

    match text {
        "?" => Ok(TokenKind::Condition),
        ":" => Ok(TokenKind::Alternative),
        _ if text.chars().all(|c| c.is_ascii_punctuation()) => {
            Err(ParseError::UnknownOperator(text.to_string()))
        }
        _ => Err(ParseError::InvalidToken(text.to_string())),
    }
}

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest tree the parser will build before giving up with `TooDeep`.
    /// Zero rejects every expression, so the command line only accepts 1 and up.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive descent over a stack of postfix tokens.
///
/// The stack is filled in input order, so every pop yields the rightmost
/// token that is left. That fixes the order sub-expressions are read in:
///
/// - binary operators read their **right** operand first, then the left;
/// - `?` reads the condition, then the true branch, then the false branch;
/// - `:` reads the true branch, then the false branch.
///
/// So `a b -` is `(a - b)` and `20 10 c ?` is `(c ? (10 : 20))`.
struct Parser<'src> {
    stack: Vec<Token<'src>>,
    config: ParserConfig,
}

impl<'src> Parser<'src> {
    fn new(tokens: Vec<Token<'src>>, config: ParserConfig) -> Self {
        // Input order is push order; the last token ends up on top.
        Self {
            stack: tokens,
            config,
        }
    }

    /// Make sure `needed` tokens are left for the operator just popped.
    fn expect_operands(&self, operator: &str, needed: usize) -> Result<()> {
        if self.stack.len() < needed {
            return Err(ParseError::ArityMismatch(operator.to_string()));
        }
        Ok(())
    }

    /// Parse one complete construct off the top of the stack.
    ///
    /// `parent` is the operator waiting on this construct, if any; running out
    /// of tokens blames it.
    fn parse_node(&mut self, parent: Option<&str>, depth: usize) -> Result<BoxNode> {
        if depth >= self.config.max_depth {
            return Err(ParseError::TooDeep(self.config.max_depth));
        }

        let Some(token) = self.stack.pop() else {
            return Err(match parent {
                Some(operator) => ParseError::ArityMismatch(operator.to_string()),
                None => ParseError::EmptyExpression,
            });
        };
        log::debug!("Popped token '{token}' at depth {depth}");

        let node = match classify(token)? {
            TokenKind::Integer(value) => Node::integer(value, token.text()),
            TokenKind::Symbol => Node::symbol(token.text()),
            TokenKind::Binary(op) => {
                self.expect_operands(op.token(), 2)?;
                let right = self.parse_node(Some(op.token()), depth + 1)?;
                let left = self.parse_node(Some(op.token()), depth + 1)?;
                Box::new(Node::Interior { op, left, right })
            }
            TokenKind::Condition => {
                let op = Operator::Condition.token();
                self.expect_operands(op, 3)?;
                let condition = self.parse_node(Some(op), depth + 1)?;
                // The alternative sits one level below the condition node.
                let yes = self.parse_node(Some(op), depth + 2)?;
                let no = self.parse_node(Some(op), depth + 2)?;
                Node::ternary(condition, yes, no)
            }
            TokenKind::Alternative => {
                let op = Operator::Alternative.token();
                self.expect_operands(op, 2)?;
                let yes = self.parse_node(Some(op), depth + 1)?;
                let no = self.parse_node(Some(op), depth + 1)?;
                interior!(Alternative, yes, no)
            }
        };

        log::debug!("Built node {node}");
        Ok(node)
    }
}

/// Parse a list of tokens in postfix order and return an AST - a single expression.
pub fn parse(tokens: Vec<Token<'_>>) -> Result<BoxNode> {
    parse_with(tokens, ParserConfig::default())
}

/// Parse with explicit limits.
pub fn parse_with(tokens: Vec<Token<'_>>, config: ParserConfig) -> Result<BoxNode> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut parser = Parser::new(tokens, config);
    let root = parser.parse_node(None, 0)?;

    if !parser.stack.is_empty() {
        let leftover = parser.stack.len();
        // Whatever is left can't join the tree. If it doesn't even parse on its
        // own, that error says more than a bare count does.
        parser.parse_node(None, 0)?;
        return Err(ParseError::TrailingTokens(leftover));
    }

    Ok(root)
}
