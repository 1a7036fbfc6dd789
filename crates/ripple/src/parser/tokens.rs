//! Token types for the lexer

/// Byte-offset range of a token in the input line.
///
/// Adjacency gluing in the parser compares `end` of one token against `start`
/// of the next, so spans must cover the raw text including quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Token classes produced by the lexer.
///
/// Word-like tokens carry their *decoded* text (quotes stripped, escapes
/// collapsed); the raw extent is recoverable from the span.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word - subject to variable expansion
    Word(String),

    /// A single-quoted string - literal, no variable expansion
    SingleQuoted(String),

    /// A double-quoted string - subject to variable expansion
    DoubleQuoted(String),

    /// An assignment left-hand side (`NAME` immediately followed by `=`)
    Name(String),

    /// The `=` of an assignment
    Equals,

    /// Pipe (|)
    Pipe,
}

impl Token {
    /// Whether this token contributes word material that glues by adjacency.
    pub fn is_word_like(&self) -> bool {
        matches!(
            self,
            Token::Word(_)
                | Token::SingleQuoted(_)
                | Token::DoubleQuoted(_)
                | Token::Name(_)
                | Token::Equals
        )
    }
}

/// A token with its source location span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}
