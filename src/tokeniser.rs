use std::fmt::Display;

/// A single whitespace-delimited piece of an expression.
///
/// Tokens carry no meaning of their own; the parser decides what they are.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'src>(&'src str);

impl<'src> Token<'src> {
    pub fn new(text: &'src str) -> Self {
        Self(text)
    }

    pub fn text(&self) -> &'src str {
        self.0
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drop everything from the first `#` to the end of the line.
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Tokenise an expression string, preserving left-to-right order.
/// Comments are stripped from every line before splitting.
pub fn tokenise(program_string: &str) -> Vec<Token<'_>> {
    program_string
        .lines()
        .flat_map(|line| strip_comment(line).split_whitespace())
        .map(Token::new)
        .collect()
}
