use thiserror::Error;

/// Errors raised while turning a token sequence into a tree.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParseError {
    #[error("empty expression")]
    EmptyExpression,
    #[error("invalid token '{0}'")]
    InvalidToken(String),
    #[error("not enough operands for operator '{0}'")]
    ArityMismatch(String),
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("invalid expression, {0} token(s) left over")]
    TrailingTokens(usize),
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Errors raised while evaluating a tree or touching the environment.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum EvalError {
    #[error("undefined symbol '{0}'")]
    UndefinedVariable(String),
    #[error("invalid left-hand side for assignment: {0}")]
    InvalidAssignTarget(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid symbol name '{0}'")]
    InvalidSymbolName(String),
    #[error("':' used outside of a '?' expression")]
    DanglingAlternative,
    #[error("'?' expression has no ':' alternative")]
    MissingAlternative,
}

/// Either stage failing while a whole line goes through the pipeline.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
